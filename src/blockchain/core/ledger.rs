use std::ops::Index;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::error::ChainError;

use super::chain::{payload_digest, Block};
use super::validation::verify_chain;

/// Append-only chain of blocks, safe to share between threads.
///
/// Writers serialize on an internal lock, so every append observes the tail left
/// by the previous one. Readers take a [`ChainSnapshot`], which copies block
/// handles rather than blocks.
#[derive(Debug)]
pub struct Ledger {
    blocks: RwLock<Vec<Arc<Block>>>,
}

impl Ledger {
    /// Creates a ledger holding only a freshly stamped genesis block.
    pub fn new() -> Self {
        let genesis = Block::genesis(Utc::now());
        Ledger {
            blocks: RwLock::new(vec![Arc::new(genesis)]),
        }
    }

    /// Appends `data` as a new block linked to the current tail and returns it.
    ///
    /// The payload is hashed before the write lock is taken; inside it only the
    /// fixed-size header is digested.
    pub fn append(&self, data: impl Into<Vec<u8>>) -> Arc<Block> {
        let data = data.into();
        let data_digest = payload_digest(&data);
        let mut blocks = self.blocks.write();

        // The genesis block is installed at construction and never removed.
        let tail = &blocks[blocks.len() - 1];
        let block = Arc::new(tail.successor_prehashed(data, &data_digest, Utc::now()));

        debug_assert_eq!(block.index, tail.index + 1);
        debug_assert_eq!(block.previous_hash, tail.hash);
        debug_assert!(block.timestamp >= tail.timestamp);

        blocks.push(Arc::clone(&block));
        drop(blocks);

        debug!(index = block.index, hash = %block.hash, bytes = block.data.len(), "appended block");
        block
    }

    /// Returns the whole chain as of a single point in the append order.
    pub fn snapshot(&self) -> ChainSnapshot {
        let blocks = self.blocks.read().clone();
        ChainSnapshot { blocks }
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn tip(&self) -> Arc<Block> {
        let blocks = self.blocks.read();
        Arc::clone(&blocks[blocks.len() - 1])
    }

    pub fn get(&self, index: u64) -> Option<Arc<Block>> {
        let index = usize::try_from(index).ok()?;
        self.blocks.read().get(index).cloned()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of a ledger taken by [`Ledger::snapshot`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ChainSnapshot {
    blocks: Vec<Arc<Block>>,
}

impl ChainSnapshot {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// A snapshot always contains at least the genesis block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index).map(Arc::as_ref)
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn tip(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().map(Arc::as_ref)
    }

    pub fn blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    /// Re-checks linkage, ordering, and digests of every block in the view.
    pub fn verify(&self) -> Result<(), ChainError> {
        let blocks: Vec<&Block> = self.iter().collect();
        verify_chain(&blocks)
    }

    pub fn to_json(&self) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Index<usize> for ChainSnapshot {
    type Output = Block;

    fn index(&self, index: usize) -> &Block {
        &self.blocks[index]
    }
}
