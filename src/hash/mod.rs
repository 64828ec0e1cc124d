//! Random-hyperplane hashing of dense vectors into bucket codes.
//!
//! The hash space is defined by `bits` random hyperplanes through the origin.
//! A vector's bucket code is the sign pattern of its projections: bit *i* is
//! set iff the dot product with hyperplane normal *i* is non-negative. Two
//! vectors with a small angle between them land on the same side of most
//! hyperplanes, so:
//!
//! ```text
//! P[bit_i(a) = bit_i(b)] = 1 - theta(a, b) / pi
//! ```
//!
//! which makes Hamming distance between codes a proxy for angular distance
//! (Charikar 2002). Search widens recall by probing buckets at Hamming
//! distance 1 from the query's bucket, breadth-first.
//!
//! Hash stability is load-bearing: codes computed at query time must equal
//! codes computed at insertion time, across process restarts. The basis is
//! therefore a pure function of `(dims, bits)`, and the sign tie-break
//! (projection exactly zero maps to 1) is fixed.
//!
//! ## References
//!
//! - Charikar (2002). "Similarity estimation techniques from rounding
//!   algorithms"
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards removing
//!   the curse of dimensionality"

mod bucket;
mod projection;

pub use bucket::{adjacent, bucket, hamming_distance, BucketCode};
pub use projection::{generate_basis, projection_vector};
