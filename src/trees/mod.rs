//! Merkle tree structures used by the shielded-transfer glue: a fixed-depth
//! append-only commitment accumulator and a depth-256 sparse tree of spent
//! nullifiers. Both hash with SHA-256 under small domain-separation
//! prefixes and guard their mutable state with a `parking_lot::RwLock` per
//! the concurrency model (concurrent readers, exclusive writers).

pub mod commitment_tree;
pub mod nullifier_smt;

pub use commitment_tree::CommitmentTree;
pub use nullifier_smt::NullifierSmt;

use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("tree has reached its maximum capacity")]
    Full,
    #[error("leaf index out of range")]
    IndexOutOfRange,
}

const LEAF_TAG: u8 = 0x10;
const NODE_TAG: u8 = 0x11;

pub(crate) fn leaf_hash(value: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_TAG]);
    hasher.update(value);
    hasher.finalize().into()
}

pub(crate) fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_TAG]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
