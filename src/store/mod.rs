//! The transactional key-value store boundary.
//!
//! The index does not own a storage engine. It is written against a small
//! capability surface that any ordered, transactional store can provide:
//! point writes, point deletes, point reads, and prefix scans, all executed
//! inside a transaction supplied by the store. Conflict detection, retries,
//! isolation, and durability live entirely on the other side of this
//! boundary; the index sees only terminal failures.
//!
//! [`MemoryStore`] is the in-process reference implementation used by tests,
//! doctests, and benches.

mod memory;

pub use memory::{MemoryStore, MemoryTxn};

use thiserror::Error;

/// A terminal failure reported by a store implementation.
///
/// Stores are expected to retry transient conflicts internally; whatever
/// reaches the index through this type is not retryable at this layer and is
/// propagated to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store failure: {message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Wrap a store-specific failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An ordered, transactional key-value store.
///
/// `transact` runs the closure as one atomic unit: either every write staged
/// through the transaction becomes visible, or none does. The closure is
/// `FnMut` because a store may re-execute it after a conflict; implementations
/// of index operations keep all per-attempt state inside the closure.
pub trait KvStore {
    /// Transaction handle type for this store.
    type Txn<'a>: StoreTxn
    where
        Self: 'a;

    /// Execute `f` as a single transaction.
    ///
    /// The error type is the caller's, as long as store failures can convert
    /// into it. A closure returning `Err` aborts the transaction and discards
    /// its writes.
    fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnMut(&mut Self::Txn<'_>) -> Result<T, E>;
}

/// Operations available inside a transaction.
///
/// Writes are staged and take effect only if the enclosing
/// [`transact`](KvStore::transact) closure returns `Ok`. Reads observe the
/// transaction's own staged writes.
pub trait StoreTxn {
    /// Read the value at `key`, if any.
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stage a write of `value` at `key`.
    fn set(&mut self, key: &[u8], value: &[u8]);

    /// Stage a delete of `key`.
    fn clear(&mut self, key: &[u8]);

    /// All key-value pairs whose key starts with `prefix`, in key order.
    fn scan_prefix(&mut self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}
