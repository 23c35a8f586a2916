//! # History Scans
//!
//! Pure scans over a key's history feed. Both functions consume entries in
//! store-determined order and never re-sort them. A cursor failure aborts the
//! scan immediately and discards anything collected so far.

use crate::domain::entities::HistoryEntry;
use crate::errors::{HandlerError, StoreError};

/// Collect every entry as its display line, in feed order.
///
/// # Errors
///
/// [`HandlerError::HistoryIteration`] on the first cursor failure.
pub fn collect_history<I>(entries: I) -> Result<Vec<String>, HandlerError>
where
    I: IntoIterator<Item = Result<HistoryEntry, StoreError>>,
{
    entries
        .into_iter()
        .map(|entry| {
            entry
                .map(|entry| entry.to_string())
                .map_err(HandlerError::HistoryIteration)
        })
        .collect()
}

/// Encode collected history lines as a JSON array of strings.
///
/// # Errors
///
/// [`HandlerError::Serialization`] if encoding fails.
pub fn encode_history(lines: &[String]) -> Result<Vec<u8>, HandlerError> {
    Ok(serde_json::to_vec(lines)?)
}

/// Transaction id of the first entry whose value equals `value` byte-for-byte.
///
/// Stops pulling from the feed as soon as a match is found. Returns `Ok(None)`
/// when the feed is exhausted without a match.
///
/// # Errors
///
/// [`HandlerError::HistoryIteration`] on a cursor failure before a match.
pub fn find_tx_by_value<I>(entries: I, value: &[u8]) -> Result<Option<String>, HandlerError>
where
    I: IntoIterator<Item = Result<HistoryEntry, StoreError>>,
{
    for entry in entries {
        let entry = entry.map_err(HandlerError::HistoryIteration)?;
        if entry.holds(value) {
            return Ok(Some(entry.tx_id));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Timestamp;

    fn entry(tx: &str, value: &str) -> Result<HistoryEntry, StoreError> {
        Ok(HistoryEntry::new(tx, value, Timestamp::new(1, 0)))
    }

    #[test]
    fn test_collect_preserves_order() {
        let lines = collect_history(vec![entry("b", "2"), entry("a", "1")]).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("TxId:[b]"));
        assert!(lines[1].starts_with("TxId:[a]"));
    }

    #[test]
    fn test_collect_discards_partial_on_error() {
        let feed = vec![
            entry("a", "1"),
            Err(StoreError::Iterator("decode".to_string())),
            entry("c", "3"),
        ];
        assert_eq!(
            collect_history(feed),
            Err(HandlerError::HistoryIteration(StoreError::Iterator(
                "decode".to_string()
            )))
        );
    }

    #[test]
    fn test_encode_empty_history() {
        assert_eq!(encode_history(&[]).unwrap(), b"[]".to_vec());
    }

    #[test]
    fn test_encode_history_lines() {
        let lines = vec!["x".to_string(), "y\"z".to_string()];
        let decoded: Vec<String> = serde_json::from_slice(&encode_history(&lines).unwrap()).unwrap();
        assert_eq!(decoded, lines);
    }

    #[test]
    fn test_find_first_match_wins() {
        let feed = vec![entry("t1", "100"), entry("t2", "150"), entry("t3", "100")];
        assert_eq!(find_tx_by_value(feed, b"100").unwrap(), Some("t1".to_string()));
    }

    #[test]
    fn test_find_stops_at_match() {
        // An error after the match must never be reached.
        let feed = vec![
            entry("t1", "100"),
            Err(StoreError::Iterator("unreachable".to_string())),
        ];
        assert_eq!(find_tx_by_value(feed, b"100").unwrap(), Some("t1".to_string()));
    }

    #[test]
    fn test_find_no_match() {
        let feed = vec![entry("t1", "100")];
        assert_eq!(find_tx_by_value(feed, b"1000").unwrap(), None);
        assert_eq!(find_tx_by_value(Vec::new(), b"1").unwrap(), None);
    }

    #[test]
    fn test_find_error_before_match() {
        let feed = vec![Err(StoreError::Corrupted), entry("t1", "100")];
        assert_eq!(
            find_tx_by_value(feed, b"100"),
            Err(HandlerError::HistoryIteration(StoreError::Corrupted))
        );
    }
}
