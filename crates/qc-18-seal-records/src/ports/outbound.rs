//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the record handler depends on:
//! - the ledger state store (put / get / history)
//! - cross-store invocation of a peer scope
//! - the delegation capability used for fallback lookups
//!
//! The store engine itself, its consensus and its persistence are external.

use crate::domain::entities::{HistoryEntry, Response};
use crate::errors::StoreError;
use std::sync::Arc;

// =============================================================================
// LEDGER STORE
// =============================================================================

/// Transactional key/value store with an append-only per-key history.
///
/// ## Implementation Notes
///
/// - Atomicity of a single key's read/write is the store's responsibility.
/// - `get_state` distinguishes "absent" (`Ok(None)`) from a present empty value
///   (`Ok(Some(vec![]))`).
pub trait LedgerStore: Send + Sync {
    /// Write `value` under `key`, overwriting any prior value.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Read the current value for `key`.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - If a value was ever written for this key
    /// * `None` - If the key is absent from this store
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Open a cursor over every write ever made to `key`.
    ///
    /// The caller must [`close`](HistoryIterator::close) the cursor once done.
    fn history_for_key<'a>(&'a self, key: &str)
        -> Result<Box<dyn HistoryIterator + 'a>, StoreError>;
}

/// Cursor over a key's history feed.
///
/// Finite and not restartable. Order is store-determined.
pub trait HistoryIterator: Send {
    /// Next entry, `None` once exhausted.
    fn next_entry(&mut self) -> Option<Result<HistoryEntry, StoreError>>;

    /// Release the cursor. Called exactly once by the owner.
    fn close(&mut self) -> Result<(), StoreError>;
}

// =============================================================================
// CROSS-STORE INVOCATION
// =============================================================================

/// Invoke a full `invoke`-shaped call against a named peer scope.
///
/// `args[0]` is the function name; the rest are its arguments.
pub trait CrossInvoke: Send + Sync {
    /// Run the call on `target` over `channel` and return its response.
    fn cross_invoke(&self, target: &str, args: &[Vec<u8>], channel: &str) -> Response;
}

// =============================================================================
// DELEGATE
// =============================================================================

/// Capability used to forward unresolved lookups to the secondary store.
///
/// Responses are surfaced verbatim; no retry happens at this layer.
pub trait Delegate: Send + Sync {
    /// Forward `function` with `args`.
    fn invoke(&self, function: &str, args: &[String]) -> Response;
}

// =============================================================================
// SHARED HANDLES
// =============================================================================

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put_state(key, value)
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_state(key)
    }

    fn history_for_key<'a>(
        &'a self,
        key: &str,
    ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError> {
        (**self).history_for_key(key)
    }
}

impl<T: CrossInvoke + ?Sized> CrossInvoke for Arc<T> {
    fn cross_invoke(&self, target: &str, args: &[Vec<u8>], channel: &str) -> Response {
        (**self).cross_invoke(target, args, channel)
    }
}

impl<T: Delegate + ?Sized> Delegate for Arc<T> {
    fn invoke(&self, function: &str, args: &[String]) -> Response {
        (**self).invoke(function, args)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Timestamp;

    // Mock implementation for testing
    struct FixedHistory {
        entries: std::vec::IntoIter<HistoryEntry>,
    }

    impl HistoryIterator for FixedHistory {
        fn next_entry(&mut self) -> Option<Result<HistoryEntry, StoreError>> {
            self.entries.next().map(Ok)
        }

        fn close(&mut self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct MockStore;

    impl LedgerStore for MockStore {
        fn put_state(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
            Ok(())
        }

        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok((key == "known").then(|| b"v".to_vec()))
        }

        fn history_for_key<'a>(
            &'a self,
            key: &str,
        ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError> {
            let entries = vec![HistoryEntry::new("tx", key, Timestamp::default())];
            Ok(Box::new(FixedHistory {
                entries: entries.into_iter(),
            }))
        }
    }

    #[test]
    fn test_arc_store_forwards() {
        let store = Arc::new(MockStore);
        assert_eq!(store.get_state("known").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get_state("other").unwrap(), None);

        let mut iter = store.history_for_key("k").unwrap();
        let first = iter.next_entry().unwrap().unwrap();
        assert_eq!(first.value, b"k".to_vec());
        assert!(iter.next_entry().is_none());
        iter.close().unwrap();
    }

    struct EchoDelegate;

    impl Delegate for EchoDelegate {
        fn invoke(&self, function: &str, args: &[String]) -> Response {
            Response::success(format!("{function}:{}", args.join(",")))
        }
    }

    #[test]
    fn test_arc_delegate_forwards() {
        let delegate: Arc<dyn Delegate> = Arc::new(EchoDelegate);
        let response = delegate.invoke("querybykey", &["k".to_string()]);
        assert_eq!(response.payload(), Some(&b"querybykey:k"[..]));
    }
}
