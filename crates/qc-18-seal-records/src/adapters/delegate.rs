//! # Delegation Adapters
//!
//! Implementations of the [`Delegate`] port.

use crate::config::DelegationTarget;
use crate::domain::entities::Response;
use crate::ports::outbound::{CrossInvoke, Delegate};
use parking_lot::Mutex;
use tracing::debug;

// =============================================================================
// CROSS-STORE DELEGATE
// =============================================================================

/// Forwards delegated calls to a configured peer scope via [`CrossInvoke`].
///
/// The peer receives `[function, args...]` as raw bytes.
#[derive(Debug, Clone)]
pub struct CrossStoreDelegate<C> {
    invoker: C,
    target: DelegationTarget,
}

impl<C: CrossInvoke> CrossStoreDelegate<C> {
    /// Bind `invoker` to `target`.
    pub fn new(invoker: C, target: DelegationTarget) -> Self {
        Self { invoker, target }
    }

    /// Configured peer scope.
    pub fn target(&self) -> &DelegationTarget {
        &self.target
    }
}

impl<C: CrossInvoke> Delegate for CrossStoreDelegate<C> {
    fn invoke(&self, function: &str, args: &[String]) -> Response {
        let mut call = Vec::with_capacity(args.len() + 1);
        call.push(function.as_bytes().to_vec());
        call.extend(args.iter().map(|arg| arg.as_bytes().to_vec()));

        debug!(
            delegate = %self.target.name,
            channel = %self.target.channel,
            function,
            "cross-store invocation"
        );
        self.invoker
            .cross_invoke(&self.target.name, &call, &self.target.channel)
    }
}

// =============================================================================
// NO DELEGATE
// =============================================================================

/// Terminal delegate for a store with no secondary behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelegate;

impl Delegate for NoDelegate {
    fn invoke(&self, function: &str, _args: &[String]) -> Response {
        Response::error(format!("no delegation target for {function}"))
    }
}

// =============================================================================
// RECORDING DELEGATE
// =============================================================================

/// A delegated call captured by [`RecordingDelegate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedCall {
    /// Function forwarded.
    pub function: String,
    /// Arguments forwarded.
    pub args: Vec<String>,
}

/// Test double that records every delegated call and answers with a fixed response.
#[derive(Debug)]
pub struct RecordingDelegate {
    answer: Response,
    calls: Mutex<Vec<DelegatedCall>>,
}

impl RecordingDelegate {
    /// Answer every call with `answer`.
    #[must_use]
    pub fn answering(answer: Response) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<DelegatedCall> {
        self.calls.lock().clone()
    }
}

impl Delegate for RecordingDelegate {
    fn invoke(&self, function: &str, args: &[String]) -> Response {
        self.calls.lock().push(DelegatedCall {
            function: function.to_string(),
            args: args.to_vec(),
        });
        self.answer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CapturingInvoker {
        seen: Mutex<Vec<(String, Vec<Vec<u8>>, String)>>,
    }

    impl CrossInvoke for CapturingInvoker {
        fn cross_invoke(&self, target: &str, args: &[Vec<u8>], channel: &str) -> Response {
            self.seen
                .lock()
                .push((target.to_string(), args.to_vec(), channel.to_string()));
            Response::success("tx-legacy")
        }
    }

    #[test]
    fn test_cross_store_call_shape() {
        let delegate = CrossStoreDelegate::new(
            CapturingInvoker {
                seen: Mutex::new(Vec::new()),
            },
            DelegationTarget::default(),
        );

        let response = delegate.invoke("gettxidspec", &["acct1".to_string(), "100".to_string()]);
        assert_eq!(response, Response::success("tx-legacy"));

        let seen = delegate.invoker.seen.lock();
        assert_eq!(seen.len(), 1);
        let (target, args, channel) = &seen[0];
        assert_eq!(target, "sealtx");
        assert_eq!(channel, "tradechannel");
        assert_eq!(
            args,
            &vec![b"gettxidspec".to_vec(), b"acct1".to_vec(), b"100".to_vec()]
        );
    }

    #[test]
    fn test_no_delegate_errors() {
        let response = NoDelegate.invoke("querybykey", &["k".to_string()]);
        assert_eq!(response, Response::error("no delegation target for querybykey"));
    }

    #[test]
    fn test_recording_delegate() {
        let delegate = RecordingDelegate::answering(Response::error("legacy miss"));
        assert_eq!(
            delegate.invoke("querybykey", &["k".to_string()]),
            Response::error("legacy miss")
        );
        assert_eq!(
            delegate.calls(),
            vec![DelegatedCall {
                function: "querybykey".to_string(),
                args: vec!["k".to_string()],
            }]
        );
    }
}
