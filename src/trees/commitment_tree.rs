//! Depth-32 append-only incremental Merkle accumulator with a filled-subtree
//! cache, so `append` and `batch_append` run in O(depth) rather than
//! rehashing the whole tree.

use super::{leaf_hash, node_hash, TreeError};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const DEPTH: usize = 32;

static ZEROS: Lazy<[[u8; 32]; DEPTH + 1]> = Lazy::new(|| {
    let mut zeros = [[0u8; 32]; DEPTH + 1];
    zeros[0] = [0u8; 32];
    for level in 1..=DEPTH {
        zeros[level] = node_hash(&zeros[level - 1], &zeros[level - 1]);
    }
    zeros
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub leaf: [u8; 32],
    pub siblings: [[u8; 32]; DEPTH],
    pub index: u64,
}

struct Inner {
    leaves: Vec<[u8; 32]>,
    filled_subtrees: [[u8; 32]; DEPTH],
    root: [u8; 32],
}

pub struct CommitmentTree {
    inner: RwLock<Inner>,
}

impl Default for CommitmentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitmentTree {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                leaves: Vec::new(),
                filled_subtrees: ZEROS[..DEPTH].try_into().unwrap(),
                root: ZEROS[DEPTH],
            }),
        }
    }

    pub fn size(&self) -> u64 {
        self.inner.read().leaves.len() as u64
    }

    pub fn root(&self) -> [u8; 32] {
        self.inner.read().root
    }

    /// Appends a single commitment, returning its leaf index and the new
    /// root.
    #[instrument(level = "debug", skip(self, commitment))]
    pub fn append(&self, commitment: [u8; 32]) -> Result<(u64, [u8; 32]), TreeError> {
        let mut inner = self.inner.write();
        Self::append_locked(&mut inner, commitment)
    }

    /// Appends several commitments under a single write-lock acquisition;
    /// semantically equivalent to calling `append` in order.
    #[instrument(level = "debug", skip(self, commitments))]
    pub fn batch_append(&self, commitments: &[[u8; 32]]) -> Result<[u8; 32], TreeError> {
        let mut inner = self.inner.write();
        for commitment in commitments {
            Self::append_locked(&mut inner, *commitment)?;
        }
        Ok(inner.root)
    }

    fn append_locked(inner: &mut Inner, commitment: [u8; 32]) -> Result<(u64, [u8; 32]), TreeError> {
        if inner.leaves.len() as u64 >= (1u64 << DEPTH) {
            tracing::warn!("commitment tree is at capacity");
            return Err(TreeError::Full);
        }
        let index = inner.leaves.len() as u64;
        inner.leaves.push(commitment);

        let mut current_index = index;
        let mut current_hash = leaf_hash(&commitment);
        for level in 0..DEPTH {
            if current_index % 2 == 0 {
                inner.filled_subtrees[level] = current_hash;
                current_hash = node_hash(&current_hash, &ZEROS[level]);
            } else {
                current_hash = node_hash(&inner.filled_subtrees[level], &current_hash);
            }
            current_index /= 2;
        }
        inner.root = current_hash;
        Ok((index, inner.root))
    }

    pub fn merkle_proof(&self, index: u64) -> Result<MerkleProof, TreeError> {
        let inner = self.inner.read();
        if index >= inner.leaves.len() as u64 {
            return Err(TreeError::IndexOutOfRange);
        }
        let mut level: Vec<[u8; 32]> = inner.leaves.iter().map(leaf_hash).collect();
        let mut idx = index as usize;
        let mut siblings = [[0u8; 32]; DEPTH];

        for (depth, sibling_slot) in siblings.iter_mut().enumerate() {
            let sibling_idx = idx ^ 1;
            *sibling_slot = if sibling_idx < level.len() {
                level[sibling_idx]
            } else {
                ZEROS[depth]
            };

            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            let mut i = 0;
            while i < level.len() {
                let left = level[i];
                let right = if i + 1 < level.len() { level[i + 1] } else { ZEROS[depth] };
                next.push(node_hash(&left, &right));
                i += 2;
            }
            level = next;
            idx /= 2;
        }

        Ok(MerkleProof {
            leaf: leaf_hash(&inner.leaves[index as usize]),
            siblings,
            index,
        })
    }
}

/// Recomputes the root from a leaf and its proof and compares against
/// `expected_root`.
pub fn verify_proof(proof: &MerkleProof, expected_root: &[u8; 32]) -> bool {
    let mut current = proof.leaf;
    let mut index = proof.index;
    for sibling in proof.siblings.iter() {
        current = if index % 2 == 0 {
            node_hash(&current, sibling)
        } else {
            node_hash(sibling, &current)
        };
        index /= 2;
    }
    &current == expected_root
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn commitment(label: &str) -> [u8; 32] {
        Sha256::digest(label.as_bytes()).into()
    }

    #[test]
    fn empty_tree_root_is_all_zero_level() {
        let tree = CommitmentTree::new();
        assert_eq!(tree.root(), ZEROS[DEPTH]);
        assert_eq!(tree.size(), 0);
    }

    #[test]
    fn append_then_prove_round_trips() {
        let tree = CommitmentTree::new();
        let (idx_a, _) = tree.append(commitment("a")).unwrap();
        let (idx_b, root) = tree.append(commitment("b")).unwrap();

        let proof_a = tree.merkle_proof(idx_a).unwrap();
        assert!(verify_proof(&proof_a, &root));
        let proof_b = tree.merkle_proof(idx_b).unwrap();
        assert!(verify_proof(&proof_b, &root));
    }

    #[test]
    fn tampered_sibling_fails_verification() {
        let tree = CommitmentTree::new();
        let (idx, root) = tree.append(commitment("a")).unwrap();
        let mut proof = tree.merkle_proof(idx).unwrap();
        proof.siblings[0][0] ^= 0xff;
        assert!(!verify_proof(&proof, &root));
    }

    #[test]
    fn batch_append_matches_sequential_append() {
        let batched = CommitmentTree::new();
        let sequential = CommitmentTree::new();
        let leaves = [commitment("a"), commitment("b"), commitment("c")];

        batched.batch_append(&leaves).unwrap();
        for leaf in leaves {
            sequential.append(leaf).unwrap();
        }
        assert_eq!(batched.root(), sequential.root());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let tree = CommitmentTree::new();
        tree.append(commitment("a")).unwrap();
        assert_eq!(tree.merkle_proof(5), Err(TreeError::IndexOutOfRange));
    }
}
