//! The index: configuration, mutation, and approximate search.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::distance::cosine_similarity;
use crate::error::{IndexError, Result};
use crate::hash::{adjacent, bucket, generate_basis, BucketCode};
use crate::keys;
use crate::store::{KvStore, StoreTxn};

/// Default hash width.
const DEFAULT_BITS: u32 = 8;

/// Default key prefix.
const DEFAULT_PREFIX: &[u8] = b"_cosann";

/// Immutable index configuration.
///
/// `bits` controls the partition count (`2^bits` buckets). Higher values give
/// better precision and lower recall per bucket; values much above 20 make
/// the bucket space so sparse that expansion rarely finds anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexParams {
    /// Vector dimensionality.
    pub dims: usize,
    /// Number of projection hyperplanes, and bits in a bucket code.
    pub bits: u32,
    /// Byte prefix scoping every key this index writes.
    pub prefix: Vec<u8>,
}

impl IndexParams {
    /// Parameters for `dims`-dimensional vectors with default hash width and
    /// key prefix.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            bits: DEFAULT_BITS,
            prefix: DEFAULT_PREFIX.to_vec(),
        }
    }

    /// Set the hash width.
    #[must_use]
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.dims == 0 {
            return Err(IndexError::InvalidConfig(
                "dims must be at least 1".into(),
            ));
        }
        if !(1..=32).contains(&self.bits) {
            return Err(IndexError::InvalidConfig(format!(
                "bits must be in 1..=32, got {}",
                self.bits
            )));
        }
        Ok(())
    }
}

/// Counters describing one query's bucket expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryStats {
    /// Distinct buckets scanned.
    pub buckets_scanned: usize,
    /// Candidates scored before ranking and truncation.
    pub candidates_seen: usize,
    /// Deepest traversal depth reached.
    pub max_depth: u32,
}

/// Approximate nearest neighbor index over cosine similarity.
///
/// Vectors are hashed into `2^bits` buckets by random hyperplane projection
/// and persisted through the injected [`KvStore`]. Queries scan the query
/// vector's bucket and widen breadth-first through adjacent buckets until
/// enough candidates are found.
///
/// The configuration and projection basis are immutable after construction,
/// so a single index value can serve any number of concurrent callers; all
/// shared mutable state lives behind the store's transaction boundary. Each
/// public operation executes as exactly one store transaction.
pub struct CosineAnnIndex<S: KvStore> {
    params: IndexParams,
    basis: Vec<Vec<f32>>,
    store: S,
}

impl<S: KvStore> CosineAnnIndex<S> {
    /// Construct an index over `store`.
    ///
    /// The projection basis is regenerated deterministically from
    /// `(params.dims, params.bits)`, so an index built over a store that
    /// already holds entries written with the same parameters sees them under
    /// the same bucket codes.
    pub fn new(store: S, params: IndexParams) -> Result<Self> {
        params.validate()?;
        let basis = generate_basis(params.dims, params.bits);
        Ok(Self {
            params,
            basis,
            store,
        })
    }

    /// The index configuration.
    #[must_use]
    pub fn params(&self) -> &IndexParams {
        &self.params
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Bucket code `vector` hashes to under this index's basis.
    pub fn bucket_of(&self, vector: &[f32]) -> Result<BucketCode> {
        self.check_dims(vector)?;
        Ok(bucket(vector, &self.basis))
    }

    /// Add an item to the index, overwriting any prior entry at the same
    /// (bucket, id).
    ///
    /// There is no update-in-place: re-adding an id whose vector now hashes
    /// to a different bucket leaves the old entry behind. Changing an item's
    /// vector is `remove` followed by `add`.
    pub fn add(&self, id: u64, vector: &[f32]) -> Result<()> {
        self.check_dims(vector)?;
        let code = bucket(vector, &self.basis);
        let entry_key = keys::entry_key(&self.params.prefix, code, id);
        let entry_value = keys::encode_vector(vector)?;
        let id_key = keys::id_key(&self.params.prefix, id);
        let id_value = keys::encode_bucket(code)?;

        self.store.transact(|txn| {
            txn.set(&entry_key, &entry_value);
            txn.set(&id_key, &id_value);
            Ok::<_, IndexError>(())
        })?;
        debug!(id, bucket = code, "added item");
        Ok(())
    }

    /// Remove an item by id.
    ///
    /// The entry's bucket is resolved through the id map written by [`add`],
    /// so the caller does not need the vector. Removing an id that was never
    /// added (or was already removed) is [`IndexError::NotFound`].
    pub fn remove(&self, id: u64) -> Result<()> {
        let id_key = keys::id_key(&self.params.prefix, id);
        let removed = self.store.transact(|txn| {
            let Some(raw) = txn.get(&id_key)? else {
                return Ok::<_, IndexError>(None);
            };
            let code = keys::decode_bucket(&raw)?;
            txn.clear(&keys::entry_key(&self.params.prefix, code, id));
            txn.clear(&id_key);
            Ok(Some(code))
        })?;

        match removed {
            Some(code) => {
                debug!(id, bucket = code, "removed item");
                Ok(())
            }
            None => Err(IndexError::NotFound(id)),
        }
    }

    /// Approximate top-`k` most cosine-similar items to `vector`, excluding
    /// `id` itself, as `(id, similarity)` pairs in non-increasing similarity
    /// order.
    ///
    /// Fewer than `k` results is normal when the reachable buckets hold fewer
    /// eligible entries. Stored or query vectors with zero norm produce `NaN`
    /// similarities, which are returned rather than dropped; `NaN` orders
    /// above every finite similarity in the result.
    ///
    /// `recall_boost` is the number of extra expansion depths searched after
    /// the candidate count first reaches `k`. It widens recall at the cost of
    /// scanning more buckets and probably should not exceed 1 or 2.
    pub fn query(
        &self,
        id: u64,
        vector: &[f32],
        k: usize,
        recall_boost: u32,
    ) -> Result<Vec<(u64, f32)>> {
        Ok(self.query_with_stats(id, vector, k, recall_boost)?.0)
    }

    /// [`query`](Self::query), also returning expansion counters.
    pub fn query_with_stats(
        &self,
        id: u64,
        vector: &[f32],
        k: usize,
        recall_boost: u32,
    ) -> Result<(Vec<(u64, f32)>, QueryStats)> {
        self.check_dims(vector)?;
        if k == 0 {
            return Err(IndexError::InvalidParameter(
                "desired neighbor count must be at least 1".into(),
            ));
        }

        let start = bucket(vector, &self.basis);
        let prefix_len = self.params.prefix.len();

        // The whole read-scan-rank sequence runs in one transaction so the
        // result reflects a single consistent snapshot of the index. All
        // traversal state is rebuilt per attempt in case the store retries.
        let (mut neighbors, stats) = self.store.transact(|txn| {
            let mut frontier: VecDeque<(BucketCode, u32)> = VecDeque::new();
            let mut queued: HashSet<BucketCode> = HashSet::new();
            let mut candidates: Vec<(u64, f32)> = Vec::new();
            let mut depth_bound: Option<u32> = None;
            let mut scanned = 0usize;
            let mut max_depth = 0u32;

            frontier.push_back((start, 0));
            queued.insert(start);

            while let Some((code, depth)) = frontier.pop_front() {
                if depth_bound.is_some_and(|bound| depth > bound) {
                    break;
                }
                max_depth = depth;
                scanned += 1;

                let scan = keys::bucket_scan_prefix(&self.params.prefix, code);
                for (key, raw) in txn.scan_prefix(&scan)? {
                    let entry_id = keys::id_from_entry_key(prefix_len, &key)?;
                    if entry_id == id {
                        continue;
                    }
                    let stored = keys::decode_vector(&raw, self.params.dims)?;
                    candidates.push((entry_id, cosine_similarity(vector, &stored)));
                }

                // The depth bound is fixed the first time the candidate count
                // reaches k; later visits never extend it.
                if depth_bound.is_none() && candidates.len() >= k {
                    depth_bound = Some(depth + recall_boost);
                }

                let next_depth = depth + 1;
                if depth_bound.map_or(true, |bound| next_depth <= bound) {
                    for neighbor in adjacent(code, self.params.bits) {
                        if queued.insert(neighbor) {
                            frontier.push_back((neighbor, next_depth));
                        }
                    }
                }
            }

            let stats = QueryStats {
                buckets_scanned: scanned,
                candidates_seen: candidates.len(),
                max_depth,
            };
            Ok::<_, IndexError>((candidates, stats))
        })?;

        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1));
        neighbors.truncate(k);
        trace!(
            id,
            start_bucket = start,
            buckets = stats.buckets_scanned,
            candidates = stats.candidates_seen,
            returned = neighbors.len(),
            "query finished"
        );
        Ok((neighbors, stats))
    }

    fn check_dims(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.params.dims {
            return Err(IndexError::DimensionMismatch {
                expected: self.params.dims,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}
