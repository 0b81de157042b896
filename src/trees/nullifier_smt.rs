//! Depth-256 sparse Merkle tree of spent nullifiers. Inclusion and
//! non-inclusion proofs both walk the actual set of inserted keys rather
//! than assuming every sibling subtree is empty — a dense per-level array
//! is infeasible at this depth, so siblings are recomputed on demand from
//! the keys that share the path's prefix.

use super::{node_hash, TreeError};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use tracing::instrument;

pub const DEPTH: usize = 256;

static EMPTY: Lazy<[[u8; 32]; DEPTH + 1]> = Lazy::new(|| {
    let mut empty = [[0u8; 32]; DEPTH + 1];
    empty[0] = Sha256::digest([0x00u8]).into();
    for level in 1..=DEPTH {
        empty[level] = node_hash(&empty[level - 1], &empty[level - 1]);
    }
    empty
});

fn leaf_hash(key: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([0x00u8]);
    hasher.update(key);
    hasher.finalize().into()
}

fn bit_at(key: &[u8; 32], level: usize) -> u8 {
    let byte = key[level / 8];
    (byte >> (7 - (level % 8))) & 1
}

fn subtree_root(keys: &[&[u8; 32]], level: usize) -> [u8; 32] {
    if keys.is_empty() {
        return EMPTY[DEPTH - level];
    }
    if level == DEPTH {
        return leaf_hash(keys[0]);
    }
    let (left, right): (Vec<&[u8; 32]>, Vec<&[u8; 32]>) =
        keys.iter().partition(|k| bit_at(k, level) == 0);
    let l = subtree_root(&left, level + 1);
    let r = subtree_root(&right, level + 1);
    node_hash(&l, &r)
}

fn collect_siblings(keys: &[&[u8; 32]], target: &[u8; 32], level: usize, out: &mut Vec<[u8; 32]>) {
    if level == DEPTH {
        return;
    }
    let bit = bit_at(target, level);
    let (same, other): (Vec<&[u8; 32]>, Vec<&[u8; 32]>) =
        keys.iter().partition(|k| bit_at(k, level) == bit);
    collect_siblings(&same, target, level + 1, out);
    out.push(subtree_root(&other, level + 1));
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub key: [u8; 32],
    pub exists: bool,
    /// Leaf-to-root ordered siblings (index 0 is the leaf's own sibling).
    pub siblings: Vec<[u8; 32]>,
}

struct Inner {
    keys: BTreeSet<[u8; 32]>,
    root: [u8; 32],
}

pub struct NullifierSmt {
    inner: RwLock<Inner>,
}

impl Default for NullifierSmt {
    fn default() -> Self {
        Self::new()
    }
}

impl NullifierSmt {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                keys: BTreeSet::new(),
                root: EMPTY[DEPTH],
            }),
        }
    }

    pub fn root(&self) -> [u8; 32] {
        self.inner.read().root
    }

    pub fn count(&self) -> usize {
        self.inner.read().keys.len()
    }

    pub fn contains(&self, key: &[u8; 32]) -> bool {
        self.inner.read().keys.contains(key)
    }

    #[instrument(level = "debug", skip(self, key))]
    pub fn insert(&self, key: [u8; 32]) {
        let mut inner = self.inner.write();
        Self::insert_locked(&mut inner, key);
    }

    /// Inserts several keys under a single write-lock acquisition,
    /// recomputing the root once at the end.
    #[instrument(level = "debug", skip(self, keys))]
    pub fn batch_insert(&self, keys: &[[u8; 32]]) {
        let mut inner = self.inner.write();
        for key in keys {
            inner.keys.insert(*key);
        }
        let refs: Vec<&[u8; 32]> = inner.keys.iter().collect();
        inner.root = subtree_root(&refs, 0);
        tracing::debug!(count = inner.keys.len(), "nullifier tree batch insert complete");
    }

    fn insert_locked(inner: &mut Inner, key: [u8; 32]) {
        inner.keys.insert(key);
        let refs: Vec<&[u8; 32]> = inner.keys.iter().collect();
        inner.root = subtree_root(&refs, 0);
    }

    pub fn merkle_proof(&self, key: &[u8; 32]) -> MerkleProof {
        let inner = self.inner.read();
        let refs: Vec<&[u8; 32]> = inner.keys.iter().collect();
        let mut siblings = Vec::with_capacity(DEPTH);
        collect_siblings(&refs, key, 0, &mut siblings);
        MerkleProof {
            key: *key,
            exists: inner.keys.contains(key),
            siblings,
        }
    }
}

/// Recomputes the root from a proof and the claimed existence bit and
/// compares it against `expected_root`.
pub fn verify_proof(proof: &MerkleProof, expected_root: &[u8; 32]) -> bool {
    if proof.siblings.len() != DEPTH {
        return false;
    }
    let mut current = if proof.exists {
        leaf_hash(&proof.key)
    } else {
        EMPTY[0]
    };
    for (i, sibling) in proof.siblings.iter().enumerate() {
        let level = DEPTH - 1 - i;
        current = if bit_at(&proof.key, level) == 0 {
            node_hash(&current, sibling)
        } else {
            node_hash(sibling, &current)
        };
    }
    &current == expected_root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(label: &str) -> [u8; 32] {
        Sha256::digest(label.as_bytes()).into()
    }

    #[test]
    fn empty_tree_root_matches_empty_constant() {
        let tree = NullifierSmt::new();
        assert_eq!(tree.root(), EMPTY[DEPTH]);
    }

    #[test]
    fn inserted_key_is_contained_and_provable() {
        let tree = NullifierSmt::new();
        let k = key("nullifier-a");
        tree.insert(k);
        assert!(tree.contains(&k));

        let proof = tree.merkle_proof(&k);
        assert!(proof.exists);
        assert!(verify_proof(&proof, &tree.root()));
    }

    #[test]
    fn non_inclusion_proof_verifies_for_absent_key() {
        let tree = NullifierSmt::new();
        tree.insert(key("nullifier-a"));
        let absent = key("nullifier-b");

        let proof = tree.merkle_proof(&absent);
        assert!(!proof.exists);
        assert!(verify_proof(&proof, &tree.root()));
    }

    #[test]
    fn batch_insert_matches_sequential_insert() {
        let batched = NullifierSmt::new();
        let sequential = NullifierSmt::new();
        let keys = [key("a"), key("b"), key("c")];

        batched.batch_insert(&keys);
        for k in keys {
            sequential.insert(k);
        }
        assert_eq!(batched.root(), sequential.root());
    }

    #[test]
    fn count_tracks_distinct_insertions() {
        let tree = NullifierSmt::new();
        tree.insert(key("a"));
        tree.insert(key("a"));
        tree.insert(key("b"));
        assert_eq!(tree.count(), 2);
    }
}
