//! Key layout and value serialization for persisted entries.
//!
//! All keys live under the index's configured prefix, followed by a one-byte
//! subspace tag:
//!
//! ```text
//! entry:  prefix | 0x01 | bucket (u64 BE) | id (u64 BE)   ->  bincode(Vec<f32>)
//! id map: prefix | 0x02 | id (u64 BE)                     ->  bincode(bucket)
//! ```
//!
//! Integers are fixed-width big-endian so lexicographic key order matches
//! numeric order and "every entry in one bucket" is a pure prefix scan. The
//! id map exists so `remove` can resolve an entry's bucket from the id alone;
//! it is written and cleared in the same transaction as the entry it tracks.

use crate::error::IndexError;
use crate::hash::BucketCode;

const TAG_ENTRY: u8 = 0x01;
const TAG_ID: u8 = 0x02;

/// Key of the entry for `id` in `bucket`.
pub(crate) fn entry_key(prefix: &[u8], bucket: BucketCode, id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 17);
    key.extend_from_slice(prefix);
    key.push(TAG_ENTRY);
    key.extend_from_slice(&bucket.to_be_bytes());
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Scan prefix covering every entry in `bucket`.
pub(crate) fn bucket_scan_prefix(prefix: &[u8], bucket: BucketCode) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 9);
    key.extend_from_slice(prefix);
    key.push(TAG_ENTRY);
    key.extend_from_slice(&bucket.to_be_bytes());
    key
}

/// Key of the id-map row for `id`.
pub(crate) fn id_key(prefix: &[u8], id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 9);
    key.extend_from_slice(prefix);
    key.push(TAG_ID);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Recover the item id from the trailing 8 bytes of an entry key.
pub(crate) fn id_from_entry_key(prefix_len: usize, key: &[u8]) -> Result<u64, IndexError> {
    let expected = prefix_len + 17;
    if key.len() != expected {
        return Err(IndexError::Codec(format!(
            "entry key has {} bytes, expected {expected}",
            key.len()
        )));
    }
    let raw: [u8; 8] = key[expected - 8..].try_into().expect("slice is 8 bytes");
    Ok(u64::from_be_bytes(raw))
}

/// Serialize a vector value.
pub(crate) fn encode_vector(vector: &[f32]) -> Result<Vec<u8>, IndexError> {
    bincode::serialize(vector).map_err(|e| IndexError::Codec(e.to_string()))
}

/// Deserialize a vector value, checking its dimensionality.
pub(crate) fn decode_vector(raw: &[u8], dims: usize) -> Result<Vec<f32>, IndexError> {
    let vector: Vec<f32> =
        bincode::deserialize(raw).map_err(|e| IndexError::Codec(e.to_string()))?;
    if vector.len() != dims {
        return Err(IndexError::Codec(format!(
            "stored vector has {} dimensions, index expects {dims}",
            vector.len()
        )));
    }
    Ok(vector)
}

/// Serialize an id-map value.
pub(crate) fn encode_bucket(bucket: BucketCode) -> Result<Vec<u8>, IndexError> {
    bincode::serialize(&bucket).map_err(|e| IndexError::Codec(e.to_string()))
}

/// Deserialize an id-map value.
pub(crate) fn decode_bucket(raw: &[u8]) -> Result<BucketCode, IndexError> {
    bincode::deserialize(raw).map_err(|e| IndexError::Codec(e.to_string()))
}
