//! In-memory reference store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{KvStore, StoreError, StoreTxn};

/// An ordered, transactional store backed by a `BTreeMap`.
///
/// Transactions are serialized through a mutex, which gives the strongest
/// isolation trivially. Writes are buffered in the transaction and applied
/// only when the closure succeeds, so an `Err` return rolls back cleanly.
/// Reads see the transaction's own buffered writes first.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed key-value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Whether the store holds no committed pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    type Txn<'a> = MemoryTxn<'a>;

    fn transact<T, E, F>(&self, mut f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnMut(&mut Self::Txn<'_>) -> Result<T, E>,
    {
        let mut data = self
            .data
            .lock()
            .map_err(|_| StoreError::new("memory store mutex poisoned"))?;

        let (out, writes) = {
            let mut txn = MemoryTxn {
                base: &*data,
                writes: BTreeMap::new(),
            };
            let out = f(&mut txn)?;
            (out, txn.writes)
        };

        for (key, value) in writes {
            match value {
                Some(value) => {
                    data.insert(key, value);
                }
                None => {
                    data.remove(&key);
                }
            }
        }
        Ok(out)
    }
}

/// A transaction over a [`MemoryStore`].
///
/// `writes` maps key to `Some(value)` for staged writes and `None` for staged
/// deletes; it overlays the committed map for all reads.
pub struct MemoryTxn<'a> {
    base: &'a BTreeMap<Vec<u8>, Vec<u8>>,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl StoreTxn for MemoryTxn<'_> {
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(staged) = self.writes.get(key) {
            return Ok(staged.clone());
        }
        Ok(self.base.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn clear(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn scan_prefix(&mut self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .base
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, staged) in self.writes.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(k: &[u8], v: &[u8]) -> (Vec<u8>, Vec<u8>) {
        (k.to_vec(), v.to_vec())
    }

    #[test]
    fn committed_writes_are_visible() {
        let store = MemoryStore::new();
        store
            .transact::<_, StoreError, _>(|txn| {
                txn.set(b"a", b"1");
                txn.set(b"b", b"2");
                Ok(())
            })
            .unwrap();

        let got = store
            .transact::<_, StoreError, _>(|txn| txn.get(b"a"))
            .unwrap();
        assert_eq!(got, Some(b"1".to_vec()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let store = MemoryStore::new();
        let result: Result<(), StoreError> = store.transact(|txn| {
            txn.set(b"doomed", b"x");
            Err(StoreError::new("abort"))
        });
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn reads_observe_staged_writes() {
        let store = MemoryStore::new();
        store
            .transact::<_, StoreError, _>(|txn| {
                txn.set(b"k", b"v");
                assert_eq!(txn.get(b"k")?, Some(b"v".to_vec()));
                txn.clear(b"k");
                assert_eq!(txn.get(b"k")?, None);
                Ok(())
            })
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn scan_prefix_is_exact_and_ordered() {
        let store = MemoryStore::new();
        store
            .transact::<_, StoreError, _>(|txn| {
                txn.set(b"p\x01b", b"2");
                txn.set(b"p\x01a", b"1");
                txn.set(b"p\x02a", b"other subspace");
                txn.set(b"q\x01a", b"other prefix");
                Ok(())
            })
            .unwrap();

        let rows = store
            .transact::<_, StoreError, _>(|txn| txn.scan_prefix(b"p\x01"))
            .unwrap();
        assert_eq!(rows, vec![kv(b"p\x01a", b"1"), kv(b"p\x01b", b"2")]);
    }

    #[test]
    fn scan_prefix_merges_staged_writes() {
        let store = MemoryStore::new();
        store
            .transact::<_, StoreError, _>(|txn| {
                txn.set(b"s/1", b"old");
                txn.set(b"s/2", b"keep");
                Ok(())
            })
            .unwrap();

        store
            .transact::<_, StoreError, _>(|txn| {
                txn.set(b"s/1", b"new");
                txn.set(b"s/3", b"added");
                txn.clear(b"s/2");
                let rows = txn.scan_prefix(b"s/")?;
                assert_eq!(rows, vec![kv(b"s/1", b"new"), kv(b"s/3", b"added")]);
                Ok(())
            })
            .unwrap();
    }
}
