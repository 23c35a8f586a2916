//! # Record Handler
//!
//! Dispatches named operations onto the ledger store and routes unresolved
//! lookups to the secondary store.
//!
//! ## Lookup Priority
//!
//! ```text
//! querybykey(k)      ──→ local get_state ──hit──→ value
//!                                 │
//!                                miss
//!                                 ↓
//!                      delegate querybykey [k]
//!
//! gettxidspec(k, v)  ──→ local history scan ──match──→ tx id
//!                                 │
//!                             no match
//!                                 ↓
//!                      delegate gettxidspec [k, v]
//! ```
//!
//! The local store is authoritative when populated. Results from the two
//! stores are never merged; delegated responses are returned verbatim.

use crate::domain::entities::Response;
use crate::domain::history::{collect_history, encode_history, find_tx_by_value};
use crate::domain::operations::Operation;
use crate::errors::HandlerError;
use crate::ports::inbound::RecordHandlerApi;
use crate::ports::outbound::{Delegate, LedgerStore};
use crate::scope::HistoryScope;
use tracing::{debug, info, instrument};

/// Stateless record handler over a ledger store and a delegation capability.
///
/// Holds no cross-call mutable state. All atomicity for a key is the store's
/// responsibility.
pub struct RecordHandler<S, D> {
    store: S,
    delegate: D,
}

impl<S: LedgerStore, D: Delegate> RecordHandler<S, D> {
    /// Create a handler.
    pub fn new(store: S, delegate: D) -> Self {
        Self { store, delegate }
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Delegation capability.
    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Host-shaped entry: `args[0]` is the function name, the rest its
    /// arguments, all as raw bytes.
    pub fn invoke_raw(&self, args: &[Vec<u8>]) -> Response {
        let Some((function, rest)) = args.split_first() else {
            return HandlerError::UnsupportedOperation(String::new()).into();
        };
        let function = String::from_utf8_lossy(function);
        let decoded = rest
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                String::from_utf8(arg.clone())
                    .map_err(|_| HandlerError::ArgumentEncoding { index })
            })
            .collect::<Result<Vec<_>, _>>();

        match decoded {
            Ok(decoded) => self.invoke(&function, &decoded),
            Err(err) => err.into(),
        }
    }

    /// Route `op` to its implementation.
    ///
    /// `Ok` may still carry an error [`Response`] when it came from the
    /// secondary store.
    ///
    /// # Errors
    ///
    /// Any local [`HandlerError`] raised by the operation.
    pub fn dispatch(&self, op: Operation, args: &[String]) -> Result<Response, HandlerError> {
        op.check_arity(args)?;
        match op {
            Operation::Seal => self.seal(&args[0], &args[1]),
            Operation::QueryByKey => self.query_by_key(&args[0]),
            Operation::History => self.history(&args[0]),
            Operation::GetTxIdSpec => self.find_tx_by_value(&args[0], &args[1]),
        }
    }

    /// Write `value` under `key`. One store write, no read-before-write.
    ///
    /// # Errors
    ///
    /// [`HandlerError::StoreWrite`] if the store rejects the write.
    pub fn seal(&self, key: &str, value: &str) -> Result<Response, HandlerError> {
        self.store
            .put_state(key, value.as_bytes())
            .map_err(HandlerError::StoreWrite)?;
        debug!(key, "successfully put state");
        Ok(Response::empty())
    }

    /// Current value for `key`, delegating if the key is absent locally.
    ///
    /// # Errors
    ///
    /// [`HandlerError::StoreRead`] if the local read fails. Read failures are
    /// never delegated.
    pub fn query_by_key(&self, key: &str) -> Result<Response, HandlerError> {
        match self.store.get_state(key).map_err(HandlerError::StoreRead)? {
            Some(value) => Ok(Response::success(value)),
            None => {
                debug!(key, "key absent locally, delegating");
                Ok(self
                    .delegate
                    .invoke(Operation::QueryByKey.name(), &[key.to_string()]))
            }
        }
    }

    /// Every write to `key` as a JSON array of display lines, in store order.
    ///
    /// An unknown key yields `[]`. No delegation.
    ///
    /// # Errors
    ///
    /// - [`HandlerError::HistoryIterator`] if the feed cannot be opened
    /// - [`HandlerError::HistoryIteration`] on a mid-scan failure
    /// - [`HandlerError::Serialization`] if encoding fails
    pub fn history(&self, key: &str) -> Result<Response, HandlerError> {
        let mut scope = HistoryScope::open(&self.store, key)?;
        let lines = collect_history(&mut scope)?;
        debug!(key, entries = lines.len(), "history collected");
        Ok(Response::success(encode_history(&lines)?))
    }

    /// Transaction id of the first history entry holding `value`, delegating
    /// if no local entry matches.
    ///
    /// # Errors
    ///
    /// - [`HandlerError::HistoryIterator`] if the feed cannot be opened
    /// - [`HandlerError::HistoryIteration`] on a mid-scan failure (no delegation)
    pub fn find_tx_by_value(&self, key: &str, value: &str) -> Result<Response, HandlerError> {
        let found = {
            let mut scope = HistoryScope::open(&self.store, key)?;
            find_tx_by_value(&mut scope, value.as_bytes())?
        };

        match found {
            Some(tx_id) => {
                debug!(key, tx_id = %tx_id, "value found in local history");
                Ok(Response::success(tx_id))
            }
            None => {
                debug!(key, "value not in local history, delegating");
                Ok(self.delegate.invoke(
                    Operation::GetTxIdSpec.name(),
                    &[key.to_string(), value.to_string()],
                ))
            }
        }
    }
}

impl<S: LedgerStore, D: Delegate> RecordHandlerApi for RecordHandler<S, D> {
    fn init(&self) -> Response {
        info!("record handler initialized");
        Response::empty()
    }

    #[instrument(name = "seal_records.invoke", level = "debug", skip(self, args))]
    fn invoke(&self, function: &str, args: &[String]) -> Response {
        debug!(?args, "invoke");
        match function
            .parse::<Operation>()
            .and_then(|op| self.dispatch(op, args))
        {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "invocation failed");
                err.into()
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
