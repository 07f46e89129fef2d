use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hash carried by the genesis block. A protocol marker, not a digest.
pub const GENESIS_HASH: &str = "GENESIS_BLOCK";
/// Previous-hash carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
/// Payload of every genesis block.
pub const GENESIS_DATA: &str = "Cortex Blockchain Genesis Block";

/// Domain separator prepended to the canonical block encoding.
const BLOCK_DIGEST_TAG: &[u8] = b"cortex-block-v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub previous_hash: String,
    pub hash: String,
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

impl Block {
    /// Builds the genesis block stamped with `timestamp`.
    pub fn genesis(timestamp: DateTime<Utc>) -> Self {
        Block {
            index: 0,
            timestamp,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            hash: GENESIS_HASH.to_string(),
            data: GENESIS_DATA.as_bytes().to_vec(),
        }
    }

    /// Builds the block that follows `self`.
    ///
    /// The timestamp is clamped to `self.timestamp` so that a wall clock stepping
    /// backwards never produces a regression along the chain.
    pub fn successor(&self, data: Vec<u8>, now: DateTime<Utc>) -> Self {
        let data_digest = payload_digest(&data);
        self.successor_prehashed(data, &data_digest, now)
    }

    /// As [`Block::successor`], with `data_digest` already equal to
    /// `payload_digest(&data)`. Only fixed-size header bytes are hashed here.
    pub(crate) fn successor_prehashed(
        &self,
        data: Vec<u8>,
        data_digest: &PayloadDigest,
        now: DateTime<Utc>,
    ) -> Self {
        let index = self.index + 1;
        let timestamp = now.max(self.timestamp);
        let hash = hash_header(index, &timestamp, &self.hash, data.len() as u64, data_digest);

        Block {
            index,
            timestamp,
            previous_hash: self.hash.clone(),
            hash,
            data,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Recomputes the digest from the block's own fields, ignoring `hash`.
    pub fn compute_hash(&self) -> String {
        compute_hash(self.index, &self.timestamp, &self.previous_hash, &self.data)
    }

    /// The payload as text, when it is valid UTF-8.
    pub fn data_as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

pub type PayloadDigest = [u8; 32];

/// SHA-256 of a block payload; the block digest commits to this value.
pub fn payload_digest(data: &[u8]) -> PayloadDigest {
    Sha256::digest(data).into()
}

/// Canonical pre-image of a block digest.
///
/// Numeric fields are fixed-width big-endian, the previous hash carries a u64
/// length prefix, and the payload enters as its u64 length plus its fixed-width
/// SHA-256, so no two distinct field tuples share an encoding.
pub fn canonical_bytes(
    index: u64,
    timestamp: &DateTime<Utc>,
    previous_hash: &str,
    data_len: u64,
    data_digest: &PayloadDigest,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        BLOCK_DIGEST_TAG.len() + 8 + 12 + 8 + previous_hash.len() + 8 + data_digest.len(),
    );
    buf.extend_from_slice(BLOCK_DIGEST_TAG);
    buf.extend_from_slice(&index.to_be_bytes());
    buf.extend_from_slice(&timestamp.timestamp().to_be_bytes());
    buf.extend_from_slice(&timestamp.timestamp_subsec_nanos().to_be_bytes());
    buf.extend_from_slice(&(previous_hash.len() as u64).to_be_bytes());
    buf.extend_from_slice(previous_hash.as_bytes());
    buf.extend_from_slice(&data_len.to_be_bytes());
    buf.extend_from_slice(data_digest);
    buf
}

fn hash_header(
    index: u64,
    timestamp: &DateTime<Utc>,
    previous_hash: &str,
    data_len: u64,
    data_digest: &PayloadDigest,
) -> String {
    let digest = Sha256::digest(canonical_bytes(index, timestamp, previous_hash, data_len, data_digest));
    hex::encode(digest)
}

/// SHA-256 of the canonical encoding, as 64 lowercase hex characters.
pub fn compute_hash(
    index: u64,
    timestamp: &DateTime<Utc>,
    previous_hash: &str,
    data: &[u8],
) -> String {
    hash_header(index, timestamp, previous_hash, data.len() as u64, &payload_digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_genesis_fields() {
        let genesis = Block::genesis(fixed_time());
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.hash, "GENESIS_BLOCK");
        assert_eq!(genesis.data_as_str(), Some(GENESIS_DATA));
        assert!(genesis.is_genesis());
    }

    #[test]
    fn test_genesis_sentinel_is_not_a_digest() {
        let genesis = Block::genesis(fixed_time());
        assert_ne!(genesis.hash, genesis.compute_hash());
        assert_eq!(genesis.compute_hash().len(), 64);
    }

    #[test]
    fn test_successor_links_to_parent() {
        let genesis = Block::genesis(fixed_time());
        let next = genesis.successor(b"hello".to_vec(), fixed_time() + Duration::seconds(1));

        assert_eq!(next.index, 1);
        assert_eq!(next.previous_hash, GENESIS_HASH);
        assert_eq!(next.hash, next.compute_hash());
        assert!(next.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_successor_clamps_clock_regression() {
        let genesis = Block::genesis(fixed_time());
        let next = genesis.successor(b"late".to_vec(), fixed_time() - Duration::minutes(5));
        assert_eq!(next.timestamp, genesis.timestamp);
    }

    #[test]
    fn test_length_prefix_disambiguates_boundaries() {
        let ts = fixed_time();
        // "ab" + "c" and "a" + "bc" concatenate identically without prefixes.
        let left = compute_hash(1, &ts, "ab", b"c");
        let right = compute_hash(1, &ts, "a", b"bc");
        assert_ne!(left, right);

        // Index 11 with "1..." vs index 1 with "11..." is the classic decimal clash.
        assert_ne!(compute_hash(11, &ts, "1x", b""), compute_hash(1, &ts, "11x", b""));
    }

    #[test]
    fn test_prehashed_successor_matches_full_digest() {
        let genesis = Block::genesis(fixed_time());
        let data = vec![7u8; 4096];
        let digest = payload_digest(&data);

        let fast = genesis.successor_prehashed(data.clone(), &digest, fixed_time());
        let slow = genesis.successor(data, fixed_time());
        assert_eq!(fast, slow);
        assert_eq!(fast.hash, compute_hash(1, &fixed_time(), GENESIS_HASH, &fast.data));
    }

    #[test]
    fn test_subsecond_precision_is_hashed() {
        let ts = fixed_time();
        let nudged = ts + Duration::nanoseconds(1);
        assert_ne!(compute_hash(1, &ts, "p", b"d"), compute_hash(1, &nudged, "p", b"d"));
    }

    #[test]
    fn test_json_payload_is_hex() {
        let block = Block::genesis(fixed_time()).successor(b"hi".to_vec(), fixed_time());
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["data"], "6869");

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }
}
