//! Bucket codes and bucket adjacency.

use smallvec::SmallVec;

use crate::distance::dot;

/// An LSH bucket code: an unsigned integer in `[0, 2^bits)` identifying one
/// region of the hash space.
pub type BucketCode = u64;

/// Hash a vector to its bucket code under the given basis.
///
/// Bit *i* of the result is set iff `dot(vector, basis[i]) >= 0`. A
/// projection of exactly zero sets the bit; the tie-break is part of the hash
/// definition and must not change, or persisted codes stop matching.
#[must_use]
pub fn bucket(vector: &[f32], basis: &[Vec<f32>]) -> BucketCode {
    basis
        .iter()
        .enumerate()
        .fold(0, |code, (i, projection)| {
            if dot(vector, projection) >= 0.0 {
                code | (1 << i)
            } else {
                code
            }
        })
}

/// Bucket codes at Hamming distance 1 from `code`, in ascending bit position.
///
/// Only bits in positions `[1, bits - 1]` are flipped. Bit 0 is excluded from
/// expansion, so codes differing only in bit 0 are never adjacent and search
/// never crosses that boundary. With `bits == 1` the range is empty and no
/// neighbors exist.
#[must_use]
pub fn adjacent(code: BucketCode, bits: u32) -> SmallVec<[BucketCode; 16]> {
    (1..bits).map(|i| code ^ (1 << i)).collect()
}

/// Number of bit positions in which two bucket codes differ.
#[inline]
#[must_use]
pub fn hamming_distance(a: BucketCode, b: BucketCode) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::generate_basis;

    #[test]
    fn bucket_is_in_range() {
        let bits = 10;
        let basis = generate_basis(8, bits);
        let v: Vec<f32> = (0..8).map(|i| (i as f32 - 3.5) * 0.7).collect();
        assert!(bucket(&v, &basis) < 1 << bits);
    }

    #[test]
    fn bucket_is_deterministic() {
        let basis = generate_basis(16, 12);
        let v: Vec<f32> = (0..16).map(|i| (i as f32).sin()).collect();
        assert_eq!(bucket(&v, &basis), bucket(&v, &basis));
    }

    #[test]
    fn zero_vector_ties_set_every_bit() {
        // All projections are exactly 0, and 0 >= 0 sets the bit.
        let bits = 6;
        let basis = generate_basis(4, bits);
        let zero = [0.0_f32; 4];
        assert_eq!(bucket(&zero, &basis), (1 << bits) - 1);
    }

    #[test]
    fn opposite_vectors_get_complementary_codes() {
        let bits = 8;
        let basis = generate_basis(5, bits);
        let v = [0.3_f32, -1.2, 0.8, 2.1, -0.4];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        let mask = (1u64 << bits) - 1;
        assert_eq!(bucket(&v, &basis) ^ bucket(&neg, &basis), mask);
    }

    #[test]
    fn adjacent_flips_each_bit_above_zero_once() {
        let bits = 8;
        let code = 0b1011_0010;
        let neighbors = adjacent(code, bits);
        assert_eq!(neighbors.len(), (bits - 1) as usize);
        for (i, &n) in neighbors.iter().enumerate() {
            assert_eq!(n ^ code, 1 << (i + 1));
        }
    }

    #[test]
    fn adjacent_codes_are_distinct_and_preserve_bit_zero() {
        let bits = 10;
        let code = 0x2a7;
        let neighbors = adjacent(code, bits);
        let mut seen: Vec<BucketCode> = neighbors.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), neighbors.len());
        for &n in &neighbors {
            assert_ne!(n, code);
            assert_eq!(n & 1, code & 1);
        }
    }

    #[test]
    fn single_bit_space_has_no_neighbors() {
        assert!(adjacent(0, 1).is_empty());
        assert!(adjacent(1, 1).is_empty());
    }

    #[test]
    fn hamming_distance_counts_differing_bits() {
        assert_eq!(hamming_distance(0b1010, 0b0101), 4);
        assert_eq!(hamming_distance(0xff, 0xff), 0);
        assert_eq!(hamming_distance(0, 1 << 63), 1);
    }
}
