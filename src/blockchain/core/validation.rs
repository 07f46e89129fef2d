use std::borrow::Borrow;

use crate::error::ChainError;

use super::chain::{Block, GENESIS_DATA, GENESIS_HASH, GENESIS_PREVIOUS_HASH};

/// Checks that `blocks` is a well-formed chain: a genesis block followed by
/// contiguous, hash-linked, timestamp-ordered successors whose digests match
/// their fields.
///
/// Genesis is a protocol constant and is not re-hashed.
pub fn verify_chain<B: Borrow<Block>>(blocks: &[B]) -> Result<(), ChainError> {
    let genesis: &Block = blocks
        .first()
        .ok_or_else(|| ChainError::InvalidBlock("Chain is empty; a genesis block is required.".to_string()))?
        .borrow();
    verify_genesis(genesis)?;

    for pair in blocks.windows(2) {
        let parent: &Block = pair[0].borrow();
        let block: &Block = pair[1].borrow();
        verify_link(parent, block)?;
    }
    Ok(())
}

pub fn verify_genesis(block: &Block) -> Result<(), ChainError> {
    if block.index != 0 {
        return Err(ChainError::InvalidBlock(format!(
            "Genesis block must have index 0, got {}.",
            block.index
        )));
    }
    if block.previous_hash != GENESIS_PREVIOUS_HASH || block.hash != GENESIS_HASH {
        return Err(ChainError::InvalidBlock(format!(
            "Genesis block carries unexpected sentinels (previous_hash = {}, hash = {}).",
            block.previous_hash, block.hash
        )));
    }
    if block.data != GENESIS_DATA.as_bytes() {
        return Err(ChainError::InvalidBlock(
            "Genesis block payload differs from the fixed genesis label.".to_string(),
        ));
    }
    Ok(())
}

/// Checks that `block` is a valid direct successor of `parent`.
pub fn verify_link(parent: &Block, block: &Block) -> Result<(), ChainError> {
    if block.index != parent.index + 1 {
        return Err(ChainError::InvalidBlock(format!(
            "Invalid block index. Expected {}, but got {}.",
            parent.index + 1,
            block.index
        )));
    }

    if block.previous_hash != parent.hash {
        return Err(ChainError::InvalidBlockLinkage {
            index: block.index,
            expected: parent.hash.clone(),
            found: block.previous_hash.clone(),
        });
    }

    if block.timestamp < parent.timestamp {
        return Err(ChainError::InvalidBlock(format!(
            "Timestamp of block {} ({}) precedes its parent ({}).",
            block.index,
            block.timestamp.to_rfc3339(),
            parent.timestamp.to_rfc3339()
        )));
    }

    let expected = block.compute_hash();
    if block.hash != expected {
        return Err(ChainError::InvalidBlock(format!(
            "Hash mismatch at block {}. Expected {}, but got {}.",
            block.index, expected, block.hash
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_chain() -> Vec<Block> {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let genesis = Block::genesis(t0);
        let b1 = genesis.successor(b"hello".to_vec(), t0 + Duration::seconds(1));
        let b2 = b1.successor(b"world".to_vec(), t0 + Duration::seconds(2));
        vec![genesis, b1, b2]
    }

    #[test]
    fn test_valid_chain_passes() {
        assert!(verify_chain(&sample_chain()).is_ok());
    }

    #[test]
    fn test_empty_chain_rejected() {
        let empty: Vec<Block> = Vec::new();
        assert!(matches!(verify_chain(&empty), Err(ChainError::InvalidBlock(_))));
    }

    #[test]
    fn test_tampered_data_detected() {
        let mut chain = sample_chain();
        chain[1].data = b"HELLO".to_vec();
        let err = verify_chain(&chain).unwrap_err();
        assert!(err.to_string().contains("Hash mismatch at block 1"));
    }

    #[test]
    fn test_broken_link_detected() {
        let mut chain = sample_chain();
        chain[2].previous_hash = "f".repeat(64);
        let err = verify_chain(&chain).unwrap_err();
        assert!(matches!(err, ChainError::InvalidBlockLinkage { index: 2, .. }));
    }

    #[test]
    fn test_index_gap_detected() {
        let mut chain = sample_chain();
        chain.remove(1);
        assert!(verify_chain(&chain).is_err());
    }

    #[test]
    fn test_forged_genesis_detected() {
        let mut chain = sample_chain();
        chain[0].hash = chain[0].compute_hash();
        assert!(verify_chain(&chain).is_err());
    }

    #[test]
    fn test_forged_genesis_payload_detected() {
        let mut chain = sample_chain();
        chain[0].data = b"forged genesis".to_vec();
        let err = verify_chain(&chain).unwrap_err();
        assert!(matches!(err, ChainError::InvalidBlock(ref m) if m.contains("genesis label")));
    }

    #[test]
    fn test_timestamp_regression_detected() {
        let mut chain = sample_chain();
        let earlier = chain[1].timestamp - Duration::seconds(10);
        chain[2] = Block {
            index: 2,
            timestamp: earlier,
            previous_hash: chain[1].hash.clone(),
            hash: String::new(),
            data: b"world".to_vec(),
        };
        chain[2].hash = chain[2].compute_hash();
        let err = verify_chain(&chain).unwrap_err();
        assert!(err.to_string().contains("precedes its parent"));
    }
}
