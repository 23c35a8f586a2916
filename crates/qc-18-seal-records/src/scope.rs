//! # Scoped History Cursor
//!
//! RAII guard around a [`HistoryIterator`]. The cursor is released exactly once
//! on every exit path: normal completion, early return on a match, or `?` on a
//! mid-scan failure.

use crate::domain::entities::HistoryEntry;
use crate::errors::{HandlerError, StoreError};
use crate::ports::outbound::{HistoryIterator, LedgerStore};
use tracing::warn;

/// Owned history cursor that closes itself on drop.
pub struct HistoryScope<'a> {
    cursor: Box<dyn HistoryIterator + 'a>,
    closed: bool,
}

impl<'a> HistoryScope<'a> {
    /// Open the history feed for `key`.
    ///
    /// # Errors
    ///
    /// [`HandlerError::HistoryIterator`] if the store cannot open the feed.
    /// Nothing is acquired in that case, so nothing needs releasing.
    pub fn open<S>(store: &'a S, key: &str) -> Result<Self, HandlerError>
    where
        S: LedgerStore + ?Sized,
    {
        let cursor = store
            .history_for_key(key)
            .map_err(HandlerError::HistoryIterator)?;
        Ok(Self::new(cursor))
    }

    /// Take ownership of an already-open cursor.
    #[must_use]
    pub fn new(cursor: Box<dyn HistoryIterator + 'a>) -> Self {
        Self {
            cursor,
            closed: false,
        }
    }

    /// Release the cursor now and report the store's close result.
    ///
    /// # Errors
    ///
    /// Whatever the store reports when closing.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.cursor.close()
    }
}

impl Iterator for HistoryScope<'_> {
    type Item = Result<HistoryEntry, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.cursor.next_entry()
    }
}

impl Drop for HistoryScope<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(error = %err, "failed to close history cursor");
        }
    }
}
