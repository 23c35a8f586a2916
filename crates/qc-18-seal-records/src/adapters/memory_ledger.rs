//! # In-Memory Ledger
//!
//! In-memory state store for testing and the dev runtime.
//! Production deployments plug the host ledger in through the same ports.
//!
//! History is kept oldest-first and can be served newest-first to exercise
//! order-dependent callers. Fault injection and cursor accounting let tests
//! observe failure paths and cursor release.

use crate::domain::entities::{HistoryEntry, Response, Timestamp};
use crate::errors::StoreError;
use crate::ports::inbound::RecordHandlerApi;
use crate::ports::outbound::{CrossInvoke, HistoryIterator, LedgerStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Injected failures. Each stays active until cleared.
#[derive(Debug, Clone, Default)]
struct Faults {
    writes: Option<StoreError>,
    reads: Option<StoreError>,
    history_open: Option<StoreError>,
    /// Fail when the cursor reaches this position.
    history_at: Option<(usize, StoreError)>,
}

#[derive(Debug, Default)]
struct LedgerState {
    current: HashMap<String, Vec<u8>>,
    history: HashMap<String, Vec<HistoryEntry>>,
}

/// A cross-store call observed by [`InMemoryLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossCall {
    /// Peer name.
    pub target: String,
    /// Peer channel.
    pub channel: String,
    /// `[function, args...]` as sent.
    pub args: Vec<Vec<u8>>,
}

/// In-memory ledger implementing [`LedgerStore`] and [`CrossInvoke`].
#[derive(Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    faults: RwLock<Faults>,
    peers: RwLock<HashMap<(String, String), Arc<dyn RecordHandlerApi>>>,
    cross_calls: RwLock<Vec<CrossCall>>,
    newest_first: AtomicBool,
    iterators_opened: AtomicUsize,
    iterators_closed: AtomicUsize,
    entries_read: AtomicUsize,
}

impl InMemoryLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` under `key` recording `tx_id` as the committing transaction.
    pub fn put_state_with_tx(&self, key: &str, value: &[u8], tx_id: &str) {
        let entry = HistoryEntry::new(tx_id, value, Timestamp::now());
        let mut state = self.state.write();
        state.current.insert(key.to_string(), value.to_vec());
        state.history.entry(key.to_string()).or_default().push(entry);
    }

    /// Serve history newest-first instead of oldest-first.
    pub fn set_newest_first(&self, newest_first: bool) {
        self.newest_first.store(newest_first, Ordering::SeqCst);
    }

    /// Make every `put_state` fail with `err`.
    pub fn fail_writes(&self, err: StoreError) {
        self.faults.write().writes = Some(err);
    }

    /// Make every `get_state` fail with `err`.
    pub fn fail_reads(&self, err: StoreError) {
        self.faults.write().reads = Some(err);
    }

    /// Make every `history_for_key` fail with `err`.
    pub fn fail_history_open(&self, err: StoreError) {
        self.faults.write().history_open = Some(err);
    }

    /// Make cursors fail with `err` when reaching `position` (0-based).
    pub fn fail_history_at(&self, position: usize, err: StoreError) {
        self.faults.write().history_at = Some((position, err));
    }

    /// Remove every injected failure.
    pub fn clear_faults(&self) {
        *self.faults.write() = Faults::default();
    }

    /// Register a peer scope reachable through [`CrossInvoke`].
    pub fn register_peer(
        &self,
        name: impl Into<String>,
        channel: impl Into<String>,
        handler: Arc<dyn RecordHandlerApi>,
    ) {
        self.peers
            .write()
            .insert((name.into(), channel.into()), handler);
    }

    /// Cross-store calls made so far, in order.
    pub fn cross_calls(&self) -> Vec<CrossCall> {
        self.cross_calls.read().clone()
    }

    /// Cursors opened so far.
    pub fn iterators_opened(&self) -> usize {
        self.iterators_opened.load(Ordering::SeqCst)
    }

    /// Cursors opened but not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.iterators_opened() - self.iterators_closed.load(Ordering::SeqCst)
    }

    /// Entries pulled from cursors so far.
    pub fn entries_read(&self) -> usize {
        self.entries_read.load(Ordering::SeqCst)
    }

    /// Stored history for `key` in write order.
    pub fn history_snapshot(&self, key: &str) -> Vec<HistoryEntry> {
        self.state
            .read()
            .history
            .get(key)
            .cloned()
            .unwrap_or_default()
    }
}

impl LedgerStore for InMemoryLedger {
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if let Some(err) = self.faults.read().writes.clone() {
            return Err(err);
        }
        let tx_id = Uuid::new_v4().simple().to_string();
        self.put_state_with_tx(key, value, &tx_id);
        Ok(())
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(err) = self.faults.read().reads.clone() {
            return Err(err);
        }
        Ok(self.state.read().current.get(key).cloned())
    }

    fn history_for_key<'a>(
        &'a self,
        key: &str,
    ) -> Result<Box<dyn HistoryIterator + 'a>, StoreError> {
        let faults = self.faults.read().clone();
        if let Some(err) = faults.history_open {
            return Err(err);
        }

        let mut entries = self.history_snapshot(key);
        if self.newest_first.load(Ordering::SeqCst) {
            entries.reverse();
        }

        self.iterators_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryHistoryCursor {
            entries: entries.into_iter(),
            position: 0,
            fail_at: faults.history_at,
            failed: false,
            closed: false,
            ledger: self,
        }))
    }
}

impl CrossInvoke for InMemoryLedger {
    fn cross_invoke(&self, target: &str, args: &[Vec<u8>], channel: &str) -> Response {
        self.cross_calls.write().push(CrossCall {
            target: target.to_string(),
            channel: channel.to_string(),
            args: args.to_vec(),
        });

        let peer = self
            .peers
            .read()
            .get(&(target.to_string(), channel.to_string()))
            .cloned();
        let Some(peer) = peer else {
            return Response::error(format!(
                "chaincode {target} not found on channel {channel}"
            ));
        };

        let Some((function, rest)) = args.split_first() else {
            return Response::error("empty cross-store invocation");
        };
        let function = String::from_utf8_lossy(function);
        let rest: Vec<String> = rest
            .iter()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect();

        debug!(target_name = target, channel, function = %function, "routing cross-store call");
        peer.invoke(&function, &rest)
    }
}

/// Cursor over a snapshot of one key's history.
struct MemoryHistoryCursor<'a> {
    entries: std::vec::IntoIter<HistoryEntry>,
    position: usize,
    fail_at: Option<(usize, StoreError)>,
    failed: bool,
    closed: bool,
    ledger: &'a InMemoryLedger,
}

impl HistoryIterator for MemoryHistoryCursor<'_> {
    fn next_entry(&mut self) -> Option<Result<HistoryEntry, StoreError>> {
        if self.closed || self.failed {
            return None;
        }
        if let Some((at, err)) = &self.fail_at {
            if *at == self.position {
                self.failed = true;
                return Some(Err(err.clone()));
            }
        }
        let entry = self.entries.next()?;
        self.position += 1;
        self.ledger.entries_read.fetch_add(1, Ordering::SeqCst);
        Some(Ok(entry))
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.ledger.iterators_closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_put_state() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.get_state("k").unwrap(), None);

        ledger.put_state("k", b"1").unwrap();
        ledger.put_state("k", b"2").unwrap();
        assert_eq!(ledger.get_state("k").unwrap(), Some(b"2".to_vec()));

        let history = ledger.history_snapshot("k");
        assert_eq!(history.len(), 2);
        assert_ne!(history[0].tx_id, history[1].tx_id);
        assert_eq!(history[0].tx_id.len(), 32);
    }

    #[test]
    fn test_history_order() {
        let ledger = InMemoryLedger::new();
        ledger.put_state_with_tx("k", b"a", "t1");
        ledger.put_state_with_tx("k", b"b", "t2");

        let mut cursor = ledger.history_for_key("k").unwrap();
        assert_eq!(cursor.next_entry().unwrap().unwrap().tx_id, "t1");
        cursor.close().unwrap();

        ledger.set_newest_first(true);
        let mut cursor = ledger.history_for_key("k").unwrap();
        assert_eq!(cursor.next_entry().unwrap().unwrap().tx_id, "t2");
        cursor.close().unwrap();
    }

    #[test]
    fn test_cursor_accounting() {
        let ledger = InMemoryLedger::new();
        ledger.put_state_with_tx("k", b"a", "t1");

        let mut cursor = ledger.history_for_key("k").unwrap();
        assert_eq!(ledger.open_iterators(), 1);
        assert!(cursor.next_entry().is_some());
        assert!(cursor.next_entry().is_none());
        cursor.close().unwrap();
        cursor.close().unwrap();
        assert_eq!(ledger.open_iterators(), 0);
        assert_eq!(ledger.iterators_opened(), 1);
        assert_eq!(ledger.entries_read(), 1);
    }

    #[test]
    fn test_fault_injection() {
        let ledger = InMemoryLedger::new();
        ledger.put_state_with_tx("k", b"a", "t1");
        ledger.put_state_with_tx("k", b"b", "t2");

        ledger.fail_history_at(1, StoreError::Iterator("bad entry".to_string()));
        let mut cursor = ledger.history_for_key("k").unwrap();
        assert!(cursor.next_entry().unwrap().is_ok());
        assert!(cursor.next_entry().unwrap().is_err());
        assert!(cursor.next_entry().is_none());
        cursor.close().unwrap();

        ledger.fail_writes(StoreError::Unavailable);
        assert_eq!(ledger.put_state("k", b"c"), Err(StoreError::Unavailable));

        ledger.fail_history_open(StoreError::Corrupted);
        assert!(ledger.history_for_key("k").is_err());
        assert_eq!(ledger.iterators_opened(), 1);

        ledger.clear_faults();
        assert!(ledger.put_state("k", b"c").is_ok());
    }

    #[test]
    fn test_cross_invoke_unknown_peer() {
        let ledger = InMemoryLedger::new();
        let response = ledger.cross_invoke("sealtx", &[b"querybykey".to_vec()], "tradechannel");
        assert_eq!(
            response.message(),
            Some("chaincode sealtx not found on channel tradechannel")
        );
        assert_eq!(ledger.cross_calls().len(), 1);
    }
}
