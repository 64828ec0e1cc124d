//! Deterministic generation of the projection basis.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// The `seq`-th projection vector of length `dims`.
///
/// Samples `dims` independent standard-normal values from a generator seeded
/// with `seq` alone. Each basis vector owns its generator; no state is shared
/// between positions, so regeneration is independent of call order.
///
/// ChaCha8 is used rather than `StdRng` because its output stream is
/// specified and stable across `rand` releases, which keeps persisted bucket
/// codes valid across upgrades.
#[must_use]
pub fn projection_vector(dims: usize, seq: u64) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seq);
    (0..dims).map(|_| rng.sample(StandardNormal)).collect()
}

/// The full basis: `bits` projection vectors, seeded 0..bits.
#[must_use]
pub fn generate_basis(dims: usize, bits: u32) -> Vec<Vec<f32>> {
    (0..u64::from(bits))
        .map(|seq| projection_vector(dims, seq))
        .collect()
}
