// Thin re-export module: implementation lives under `blockchain/core` so that
// block construction, the shared ledger, and integrity checks stay separate.

pub mod core;
pub use self::core::*;
