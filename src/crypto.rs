//! Cryptographic primitives for CortexChain: participant keypairs and addresses

use crate::error::ChainError;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Size of a public key encoding: X then Y, 32 big-endian bytes each.
pub const PUBLIC_KEY_ENCODING_SIZE: usize = 64;

/// Number of hex characters kept from the public key digest.
pub const ADDRESS_LENGTH: usize = 20;

/// Upper bound on redraws when the RNG yields an out-of-range scalar.
const MAX_KEYGEN_ATTEMPTS: usize = 8;

pub type PublicKeyEncoding = [u8; PUBLIC_KEY_ENCODING_SIZE];

/// Derives a participant address from a public key encoding.
///
/// SHA-256 of the bytes, lowercase hex, truncated to [`ADDRESS_LENGTH`] characters.
/// Any input is accepted, the empty slice included.
pub fn derive_address(public_key: &[u8]) -> String {
    let mut address = hex::encode(Sha256::digest(public_key));
    address.truncate(ADDRESS_LENGTH);
    address
}

/// Returns true if `s` has the shape of a derived address.
pub fn is_valid_address(s: &str) -> bool {
    s.len() == ADDRESS_LENGTH && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Generates a fresh keypair and returns the private key with its public key encoding.
pub fn generate_keypair() -> Result<(SecretKey, PublicKeyEncoding), ChainError> {
    let keypair = KeyPair::generate()?;
    let encoding = keypair.public_key_encoding();
    Ok((keypair.secret_key, encoding))
}

/// Encodes a public key as fixed-width, zero-padded X || Y.
pub fn encode_public_key(public_key: &PublicKey) -> PublicKeyEncoding {
    let uncompressed: [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE] = public_key.serialize_uncompressed();
    let mut encoding = [0u8; PUBLIC_KEY_ENCODING_SIZE];
    // Skip the SEC1 0x04 tag.
    encoding.copy_from_slice(&uncompressed[1..]);
    encoding
}

/// Parses a public key from its X || Y encoding.
pub fn public_key_from_encoding(encoding: &[u8]) -> Result<PublicKey, ChainError> {
    if encoding.len() != PUBLIC_KEY_ENCODING_SIZE {
        return Err(ChainError::CryptoError(format!(
            "Public key encoding must be exactly {} bytes, got {}",
            PUBLIC_KEY_ENCODING_SIZE,
            encoding.len()
        )));
    }
    let mut uncompressed = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
    uncompressed[0] = 0x04;
    uncompressed[1..].copy_from_slice(encoding);

    PublicKey::from_slice(&uncompressed)
        .map_err(|e| ChainError::CryptoError(format!("Invalid public key: {}", e)))
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    ///
    /// Fails with [`ChainError::KeyGeneration`] if the OS source cannot supply bytes.
    pub fn generate() -> Result<Self, ChainError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a KeyPair from the supplied cryptographically secure RNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, ChainError> {
        let mut seed = [0u8; SECRET_KEY_SIZE];
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            rng.try_fill_bytes(&mut seed)
                .map_err(|e| ChainError::KeyGeneration(format!("secure random source failed: {}", e)))?;

            // Zero or >= the curve order; draw again.
            if let Ok(secret_key) = SecretKey::from_slice(&seed) {
                return Ok(Self::from_secret_key(secret_key));
            }
        }
        Err(ChainError::KeyGeneration(format!(
            "no valid secret scalar after {} draws",
            MAX_KEYGEN_ATTEMPTS
        )))
    }

    /// Creates a KeyPair from an existing SecretKey.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                ChainError::CryptoError(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                ChainError::CryptoError(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_SIZE] {
        self.secret_key.secret_bytes()
    }

    pub fn public_key_encoding(&self) -> PublicKeyEncoding {
        encode_public_key(&self.public_key)
    }

    /// The participant address for this keypair.
    pub fn address(&self) -> String {
        derive_address(&self.public_key_encoding())
    }

    /// Signs SHA-256(message) and returns the compact signature bytes.
    pub fn sign(&self, message: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], ChainError> {
        let digest = Sha256::digest(message);
        let message = Message::from_digest_slice(&digest)
            .map_err(|e| ChainError::CryptoError(format!("Failed to create message: {}", e)))?;

        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);
        Ok(signature.serialize_compact())
    }
}

/// Verifies a compact ECDSA signature against a public key encoding.
pub fn verify_signature(
    public_key_encoding: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<(), ChainError> {
    if signature_bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(ChainError::CryptoError(format!(
            "Signature must be exactly {} bytes (compact), got {}",
            COMPACT_SIGNATURE_SIZE,
            signature_bytes.len()
        )));
    }
    let public_key = public_key_from_encoding(public_key_encoding)?;

    let digest = Sha256::digest(message);
    let message = Message::from_digest_slice(&digest)
        .map_err(|e| ChainError::CryptoError(format!("Failed to create message: {}", e)))?;

    let signature = Signature::from_compact(signature_bytes)
        .map_err(|e| ChainError::CryptoError(format!("Invalid signature: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| ChainError::CryptoError("Signature verification failed".to_string()))
}
