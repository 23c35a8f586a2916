//! # QC-18 Seal Records - Key-Addressed Ledger Record Handler
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Accepts named operations over a transactional key/value ledger with an
//! append-only per-key history. Lookups that the local ledger cannot satisfy
//! are delegated to a secondary (legacy) store.
//!
//! ## Operations
//!
//! | Name | Args | Result | Fallback |
//! |------|------|--------|----------|
//! | `seal` | key, value | empty | - |
//! | `querybykey` | key | current value | delegate on absent key |
//! | `history` | key | JSON array of entry lines | - |
//! | `gettxidspec` | key, value | tx id of first matching entry | delegate on no match |
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | Exact arity per operation | `domain/operations.rs` - `Operation::check_arity()` |
//! | One store write per `seal` | `handler.rs` - `RecordHandler::seal()` |
//! | History cursor released on every exit path | `scope.rs` - `HistoryScope` (`Drop`) |
//! | First match in store order wins | `domain/history.rs` - `find_tx_by_value()` |
//! | No partial results alongside an error | `domain/history.rs` - `collect_history()` |
//! | Delegated responses returned verbatim | `handler.rs` |
//!
//! ## Outbound Dependencies
//!
//! | Collaborator | Trait | Purpose |
//! |--------------|-------|---------|
//! | Ledger store | `LedgerStore` | put / get / history |
//! | Peer scope | `CrossInvoke` | Cross-store invocation |
//! | Secondary store | `Delegate` | Fallback lookups |
//!
//! ## Usage Example
//!
//! ```
//! use qc_18_seal_records::prelude::*;
//!
//! let handler = RecordHandler::new(InMemoryLedger::new(), NoDelegate);
//! let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
//!
//! assert!(handler.invoke("seal", &args(&["acct1", "100"])).is_success());
//! assert_eq!(
//!     handler.invoke("querybykey", &args(&["acct1"])),
//!     Response::success("100")
//! );
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handler;
pub mod ports;
pub mod scope;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{HistoryEntry, Response, Timestamp, STATUS_ERROR, STATUS_OK};
    pub use crate::domain::history::{collect_history, encode_history, find_tx_by_value};
    pub use crate::domain::operations::Operation;

    // Ports
    pub use crate::ports::inbound::RecordHandlerApi;
    pub use crate::ports::outbound::{CrossInvoke, Delegate, HistoryIterator, LedgerStore};

    // Errors
    pub use crate::errors::{ConfigError, HandlerError, StoreError};

    // Config
    pub use crate::config::{DelegationTarget, SealConfig};

    // Adapters
    pub use crate::adapters::{
        CrossCall, CrossStoreDelegate, DelegatedCall, InMemoryLedger, NoDelegate,
        RecordingDelegate,
    };

    // Handler
    pub use crate::handler::RecordHandler;
    pub use crate::scope::HistoryScope;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Seal Records";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_id() {
        assert_eq!(SUBSYSTEM_ID, 18);
    }

    #[test]
    fn test_prelude_exports() {
        // Verify prelude exports compile
        use prelude::*;
        let _ = SealConfig::default();
        let _ = RecordHandler::new(InMemoryLedger::new(), NoDelegate);
        assert_eq!(Operation::ALL.len(), 4);
    }
}
