//! Participant identity: a keypair together with its derived address

use crate::crypto::{derive_address, KeyPair};
use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    pub name: Option<String>,
    /// Hex of the 64-byte public key encoding.
    pub public_key: String,
    pub address: String,
    pub secret_key_hex: String,
    /// RFC3339 creation time
    pub created: String,
}

// The secret scalar never appears in `{:?}` output or structured logs.
impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("name", &self.name)
            .field("public_key", &self.public_key)
            .field("address", &self.address)
            .field("secret_key_hex", &"<redacted>")
            .field("created", &self.created)
            .finish()
    }
}

impl Wallet {
    /// Creates a wallet around a freshly generated keypair.
    pub fn new(name: Option<String>) -> Result<Self, ChainError> {
        let keypair = KeyPair::generate()?;
        Ok(Self::from_keypair(&keypair, name))
    }

    pub fn from_keypair(keypair: &KeyPair, name: Option<String>) -> Self {
        let encoding = keypair.public_key_encoding();
        Wallet {
            name,
            public_key: hex::encode(encoding),
            address: derive_address(&encoding),
            secret_key_hex: hex::encode(keypair.secret_bytes()),
            created: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuilds the keypair and checks it still matches the stored public key and address.
    pub fn keypair(&self) -> Result<KeyPair, ChainError> {
        let secret = hex::decode(&self.secret_key_hex)
            .map_err(|e| ChainError::WalletError(format!("Invalid secret key hex: {}", e)))?;
        let keypair = KeyPair::from_secret_bytes(&secret)?;

        if hex::encode(keypair.public_key_encoding()) != self.public_key {
            return Err(ChainError::WalletError(
                "Stored public key does not match the secret key".to_string(),
            ));
        }
        if keypair.address() != self.address {
            return Err(ChainError::WalletError(format!(
                "Stored address {} does not match the derived address {}",
                self.address,
                keypair.address()
            )));
        }
        Ok(keypair)
    }

    pub fn save(&self, path: &Path) -> Result<(), ChainError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(address = %self.address, path = %path.display(), "saved wallet");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ChainError> {
        let json = fs::read_to_string(path)?;
        let wallet: Wallet = serde_json::from_str(&json)?;
        wallet.keypair()?;
        Ok(wallet)
    }
}
