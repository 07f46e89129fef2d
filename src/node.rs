use crate::blockchain::{Block, ChainSnapshot, Ledger};
use crate::config::Config;
use crate::error::ChainError;
use crate::wallet::Wallet;
use std::sync::Arc;
use tracing::info;

/// Everything a node's outer layers need, built once and passed down explicitly.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub config: Config,
    pub identity: Wallet,
    pub ledger: Arc<Ledger>,
}

impl NodeContext {
    /// Builds a context with a freshly generated identity and a new ledger.
    pub fn new(config: Config) -> Result<Self, ChainError> {
        let identity = Wallet::new(Some(config.node.name.clone()))?;
        Ok(Self::with_identity(config, identity))
    }

    pub fn with_identity(config: Config, identity: Wallet) -> Self {
        let ledger = Arc::new(Ledger::new());
        info!(
            node = %config.node.name,
            network_id = %config.node.network_id,
            address = %identity.address,
            "node context initialized"
        );
        Self {
            config,
            identity,
            ledger,
        }
    }

    pub fn address(&self) -> &str {
        &self.identity.address
    }

    /// Appends `data` to the node's ledger.
    pub fn submit(&self, data: impl Into<Vec<u8>>) -> Arc<Block> {
        let block = self.ledger.append(data);
        info!(index = block.index, hash = %block.hash, "block appended");
        block
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        self.ledger.snapshot()
    }
}
