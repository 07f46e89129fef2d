//! CortexChain - an append-only, hash-linked ledger with keypair-derived addresses
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Ledger
//! - [`blockchain`] - Blocks, the digest function, the shared ledger and chain verification
//!
//! ## Identity
//! - [`crypto`] - secp256k1 keypairs and address derivation
//! - [`wallet`] - Keypair plus address bundle with JSON storage
//!
//! ## Node wiring
//! - [`node`] - Explicit per-node context handed to outer layers
//! - [`config`] - Configuration management
//! - [`cli`] - Logging setup and chain rendering for the binaries
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Ledger
// ============================================================================
pub mod blockchain;

// ============================================================================
// Identity
// ============================================================================
pub mod crypto;
pub mod wallet;

// ============================================================================
// Node wiring & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
pub mod node;

pub use blockchain::{Block, ChainSnapshot, Ledger};
pub use crypto::{derive_address, generate_keypair, KeyPair};
pub use error::{ChainError, Result};
pub use node::NodeContext;
