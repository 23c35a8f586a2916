//! # Domain Entities
//!
//! Core data types exchanged between the handler, the ledger store and the
//! caller. Records themselves are owned by the store and never cached here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

// =============================================================================
// TIMESTAMP
// =============================================================================

/// Ledger commit timestamp (seconds + nanos since the Unix epoch).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: i32,
}

impl Timestamp {
    /// Create a timestamp from raw parts.
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Current wall-clock time. Clocks before the epoch collapse to zero.
    #[must_use]
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert from a [`SystemTime`].
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_system_time(time: SystemTime) -> Self {
        let elapsed = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            seconds: elapsed.as_secs() as i64,
            nanos: elapsed.subsec_nanos() as i32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seconds:{} nanos:{}", self.seconds, self.nanos)
    }
}

// =============================================================================
// HISTORY ENTRY
// =============================================================================

/// One past write to a key, as reported by the store's history feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Transaction that performed the write.
    pub tx_id: String,
    /// Raw value written.
    pub value: Vec<u8>,
    /// Commit time of the transaction.
    pub timestamp: Timestamp,
}

impl HistoryEntry {
    /// Create a new history entry.
    pub fn new(tx_id: impl Into<String>, value: impl Into<Vec<u8>>, timestamp: Timestamp) -> Self {
        Self {
            tx_id: tx_id.into(),
            value: value.into(),
            timestamp,
        }
    }

    /// True if this entry recorded exactly `value`.
    #[must_use]
    pub fn holds(&self, value: &[u8]) -> bool {
        self.value == value
    }
}

/// Human-readable line used in `history` payloads:
/// `TxId:[<tx>]Value:[<value>]TimeStamp:[<ts>]`.
impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TxId:[{}]Value:[{}]TimeStamp:[{}]",
            self.tx_id,
            String::from_utf8_lossy(&self.value),
            self.timestamp
        )
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Status code for a successful response.
pub const STATUS_OK: u16 = 200;

/// Status code for an error response.
pub const STATUS_ERROR: u16 = 500;

/// Structured result of every invocation. There is no partial-success state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum Response {
    /// Operation succeeded with the given payload.
    Success(Vec<u8>),
    /// Operation failed with the given message.
    Error(String),
}

impl Response {
    /// Successful response carrying `payload`.
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self::Success(payload.into())
    }

    /// Successful response with no payload.
    #[must_use]
    pub fn empty() -> Self {
        Self::Success(Vec::new())
    }

    /// Error response carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Host-facing status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(_) => STATUS_OK,
            Self::Error(_) => STATUS_ERROR,
        }
    }

    /// True for [`Response::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True for [`Response::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Payload bytes, if successful.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Error(_) => None,
        }
    }

    /// Error message, if failed.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error(message) => Some(message),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
