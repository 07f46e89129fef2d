// core.rs splits the ledger into block construction, the shared chain owner,
// and integrity checks.
pub mod chain;
pub mod ledger;
pub mod validation;

pub use chain::*;
pub use ledger::*;
pub use validation::*;
