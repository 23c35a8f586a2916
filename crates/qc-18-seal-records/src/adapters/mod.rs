//! # Adapters Layer (Outer Hexagon)
//!
//! Adapters connect the record handler to stores and peer scopes.
//!
//! - `InMemoryLedger` implements `LedgerStore` and `CrossInvoke`
//! - `CrossStoreDelegate` implements `Delegate` over any `CrossInvoke`

pub mod delegate;
pub mod memory_ledger;

pub use delegate::*;
pub use memory_ledger::*;
