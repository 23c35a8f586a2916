//! # Driving Port (API - Inbound)
//!
//! The invocation boundary. The host runtime unpacks the transport framing
//! and calls into this trait; session lifecycle stays on the host side.

use crate::domain::entities::Response;

/// Entry point for record operations.
pub trait RecordHandlerApi: Send + Sync {
    /// Instantiate hook called once by the host. Always succeeds.
    fn init(&self) -> Response;

    /// Dispatch `function` with `args`.
    ///
    /// Never panics on bad input; every failure is an error [`Response`].
    fn invoke(&self, function: &str, args: &[String]) -> Response;
}
