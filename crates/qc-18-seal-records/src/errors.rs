//! # Error Types
//!
//! All error types for record handling. Every [`HandlerError`] is terminal for
//! the invocation that produced it and is surfaced to the caller as a
//! [`Response::Error`].

use crate::domain::entities::Response;
use thiserror::Error;

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors reported by the underlying ledger store.
///
/// The handler treats these as opaque and only wraps them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store connection is unavailable.
    #[error("state store unavailable")]
    Unavailable,

    /// Stored data failed integrity checks.
    #[error("state corruption detected")]
    Corrupted,

    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),

    /// A history cursor failed to produce its next entry.
    #[error("history cursor failure: {0}")]
    Iterator(String),
}

// =============================================================================
// HANDLER ERRORS
// =============================================================================

/// Errors produced while handling an invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Wrong number of arguments for the operation.
    #[error("Incorrect number of arguments. Expecting {expected}, received {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    /// A raw argument was not valid UTF-8.
    #[error("argument {index} is not valid UTF-8")]
    ArgumentEncoding { index: usize },

    /// `put_state` failed.
    #[error("{0}")]
    StoreWrite(StoreError),

    /// `get_state` failed.
    #[error("Querybykey Err: {0}")]
    StoreRead(StoreError),

    /// The history cursor could not be opened.
    #[error("get iter fail {0}")]
    HistoryIterator(StoreError),

    /// The history cursor failed mid-scan.
    #[error("iterator history fail: {0}")]
    HistoryIteration(StoreError),

    /// The result could not be encoded.
    #[error("json marshal fail: {0}")]
    Serialization(String),

    /// Function name is not in the dispatch table.
    #[error("unsupported function name: {0}")]
    UnsupportedOperation(String),
}

impl HandlerError {
    /// Returns true if the caller can fix the request and try again.
    #[must_use]
    pub fn is_caller_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ArgumentCount { .. } | Self::ArgumentEncoding { .. } | Self::UnsupportedOperation(_)
        )
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Serialization(err.to_string())
    }
}

impl From<HandlerError> for Response {
    fn from(err: HandlerError) -> Self {
        Response::error(err.to_string())
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Delegation target name is empty.
    #[error("delegation target name must not be empty (set SEAL_DELEGATE_NAME)")]
    EmptyDelegateName,

    /// Delegation channel is empty.
    #[error("delegation channel must not be empty (set SEAL_DELEGATE_CHANNEL)")]
    EmptyDelegateChannel,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_display() {
        let err = HandlerError::ArgumentCount {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Incorrect number of arguments. Expecting 2, received 1"
        );
    }

    #[test]
    fn test_unsupported_operation_display() {
        let err = HandlerError::UnsupportedOperation("bogus".to_string());
        assert_eq!(err.to_string(), "unsupported function name: bogus");
    }

    #[test]
    fn test_store_errors_are_wrapped() {
        let err = HandlerError::StoreRead(StoreError::Unavailable);
        assert_eq!(err.to_string(), "Querybykey Err: state store unavailable");

        let err = HandlerError::HistoryIteration(StoreError::Iterator("eof".to_string()));
        assert!(err.to_string().starts_with("iterator history fail"));
        assert!(err.to_string().contains("eof"));
    }

    #[test]
    fn test_caller_recoverable() {
        assert!(HandlerError::ArgumentCount {
            expected: 1,
            actual: 0
        }
        .is_caller_recoverable());
        assert!(HandlerError::UnsupportedOperation(String::new()).is_caller_recoverable());
        assert!(!HandlerError::StoreWrite(StoreError::Corrupted).is_caller_recoverable());
        assert!(!HandlerError::Serialization("x".to_string()).is_caller_recoverable());
    }

    #[test]
    fn test_into_response() {
        let response: Response = HandlerError::StoreWrite(StoreError::Backend("disk full".into())).into();
        assert!(response.is_error());
        assert_eq!(response.message(), Some("disk full"));
    }
}
