//! Hash functions for the Bloom filter
//!
//! Every round `i` hashes `salt || element || decimal(i)` with the selected
//! digest and reduces the digest, read as a big-endian unsigned integer,
//! modulo the filter capacity.

use std::io::Cursor;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Sha3_256;

/// Digest primitive used to derive bit indices
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 (256-bit digest)
    #[default]
    Sha256,
    /// SHA3-256 (256-bit digest)
    Sha3_256,
    /// MurmurHash3 x64 128-bit, seed 0
    Murmur3,
}

impl HashAlgorithm {
    /// Derive the bit index for one hash round
    pub(crate) fn round_index(
        &self,
        salt: &[u8],
        element: &[u8],
        round: usize,
        capacity: usize,
    ) -> usize {
        let round = round.to_string();
        match self {
            HashAlgorithm::Sha256 => {
                digest_index::<Sha256>(salt, element, round.as_bytes(), capacity)
            }
            HashAlgorithm::Sha3_256 => {
                digest_index::<Sha3_256>(salt, element, round.as_bytes(), capacity)
            }
            HashAlgorithm::Murmur3 => {
                let hash = murmur_hash(salt, element, round.as_bytes());
                index_from_digest(&hash.to_be_bytes(), capacity)
            }
        }
    }
}

fn digest_index<D: Digest>(salt: &[u8], element: &[u8], round: &[u8], capacity: usize) -> usize {
    let mut hasher = D::new();
    hasher.update(salt);
    hasher.update(element);
    hasher.update(round);
    index_from_digest(&hasher.finalize(), capacity)
}

/// MurmurHash3 over the concatenated round input
fn murmur_hash(salt: &[u8], element: &[u8], round: &[u8]) -> u128 {
    let mut input = Vec::with_capacity(salt.len() + element.len() + round.len());
    input.extend_from_slice(salt);
    input.extend_from_slice(element);
    input.extend_from_slice(round);

    // Reading from an in-memory cursor cannot fail
    murmur3::murmur3_x64_128(&mut Cursor::new(input), 0).unwrap_or(0)
}

/// Reduce a big-endian digest modulo `capacity`
///
/// Equivalent to interpreting the whole digest as one unsigned integer,
/// so every slot in `[0, capacity)` is reachable regardless of digest width.
///
/// Callers pass the capacity of a constructed filter, which is never zero.
pub(crate) fn index_from_digest(digest: &[u8], capacity: usize) -> usize {
    let modulus = capacity as u128;
    let remainder = digest
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | byte as u128) % modulus);
    remainder as usize
}

/// Compute the index for every round of an element
pub(crate) fn hash_indices(
    algorithm: HashAlgorithm,
    salt: &[u8],
    element: &[u8],
    rounds: usize,
    capacity: usize,
) -> Vec<usize> {
    (0..rounds)
        .map(|round| algorithm.round_index(salt, element, round, capacity))
        .collect()
}
