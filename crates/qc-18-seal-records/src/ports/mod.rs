//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for record handling.
//!
//! - **Driving Port (Inbound)**: `RecordHandlerApi`
//! - **Driven Ports (Outbound)**: `LedgerStore`, `HistoryIterator`, `CrossInvoke`, `Delegate`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
