//! # Domain Layer (Inner Hexagon)
//!
//! Pure types and scans. No I/O and no knowledge of the store.

pub mod entities;
pub mod history;
pub mod operations;

pub use entities::*;
pub use history::*;
pub use operations::*;
