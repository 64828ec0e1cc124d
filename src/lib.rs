//! cosann: approximate nearest neighbor search over a transactional
//! key-value store.
//!
//! Vectors are hashed into buckets by random hyperplane projection (LSH for
//! cosine similarity) and persisted as keyed entries in an externally
//! supplied ordered, transactional store. A query hashes its vector, scans
//! the matching bucket, and widens breadth-first through buckets at Hamming
//! distance 1 until enough candidates are collected, then ranks them by exact
//! cosine similarity. No linear scan of the data set ever happens; the cost
//! of a query is proportional to the number of buckets expanded.
//!
//! The store is a capability, not a component: anything that can run a
//! closure of point reads, point writes, and prefix scans as one atomic
//! transaction can back the index. [`MemoryStore`] is the bundled in-process
//! implementation, intended for tests and experiments.
//!
//! # Example
//!
//! ```
//! use cosann::{CosineAnnIndex, IndexParams, MemoryStore};
//!
//! let index = CosineAnnIndex::new(MemoryStore::new(), IndexParams::new(3).with_bits(4))?;
//!
//! index.add(1, &[1.0, 0.0, 0.0])?;
//! index.add(2, &[0.9, 0.1, 0.0])?;
//! index.add(3, &[0.0, 1.0, 0.0])?;
//!
//! // Query with id 1's own vector from a different id: id 1 comes back
//! // first with similarity 1.0.
//! let neighbors = index.query(99, &[1.0, 0.0, 0.0], 1, 0)?;
//! assert_eq!(neighbors[0].0, 1);
//! assert!((neighbors[0].1 - 1.0).abs() < 1e-6);
//! # Ok::<(), cosann::IndexError>(())
//! ```
//!
//! # Determinism
//!
//! The projection basis is a pure function of `(dims, bits)`: basis vector
//! *i* is drawn from a generator seeded with *i*. Two index instances with
//! the same parameters, in the same or different processes, compute identical
//! bucket codes, which is what makes persisted entries findable after a
//! restart.

pub mod distance;
pub mod error;
pub mod hash;
pub mod index;
pub mod store;

mod keys;

pub use error::{IndexError, Result};
pub use hash::{adjacent, bucket, generate_basis, hamming_distance, BucketCode};
pub use index::{CosineAnnIndex, IndexParams, QueryStats};
pub use store::{KvStore, MemoryStore, StoreError, StoreTxn};
