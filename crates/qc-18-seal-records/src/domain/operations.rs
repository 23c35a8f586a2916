//! # Operation Table
//!
//! The fixed set of operations accepted by the handler. Wire names are
//! case-sensitive and part of the public contract.

use crate::errors::HandlerError;
use std::fmt;
use std::str::FromStr;

/// Wire names.
#[allow(missing_docs)]
pub mod names {
    pub const SEAL: &str = "seal";
    pub const QUERY_BY_KEY: &str = "querybykey";
    pub const HISTORY: &str = "history";
    pub const GET_TX_ID_SPEC: &str = "gettxidspec";
}

/// An operation from the dispatch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Write a value under a key.
    Seal,
    /// Read the current value for a key, delegating on miss.
    QueryByKey,
    /// Full change history for a key.
    History,
    /// Transaction id that produced a given value, delegating on miss.
    GetTxIdSpec,
}

impl Operation {
    /// Every operation, in table order.
    pub const ALL: [Operation; 4] = [
        Operation::Seal,
        Operation::QueryByKey,
        Operation::History,
        Operation::GetTxIdSpec,
    ];

    /// Wire name of this operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seal => names::SEAL,
            Self::QueryByKey => names::QUERY_BY_KEY,
            Self::History => names::HISTORY,
            Self::GetTxIdSpec => names::GET_TX_ID_SPEC,
        }
    }

    /// Exact number of arguments the operation accepts.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Seal | Self::GetTxIdSpec => 2,
            Self::QueryByKey | Self::History => 1,
        }
    }

    /// Reject `args` unless it has exactly [`arity`](Self::arity) elements.
    pub fn check_arity<T>(self, args: &[T]) -> Result<(), HandlerError> {
        if args.len() == self.arity() {
            Ok(())
        } else {
            Err(HandlerError::ArgumentCount {
                expected: self.arity(),
                actual: args.len(),
            })
        }
    }
}

impl FromStr for Operation {
    type Err = HandlerError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            names::SEAL => Ok(Self::Seal),
            names::QUERY_BY_KEY => Ok(Self::QueryByKey),
            names::HISTORY => Ok(Self::History),
            names::GET_TX_ID_SPEC => Ok(Self::GetTxIdSpec),
            other => Err(HandlerError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
