//! Witness-to-proof packaging for a shielded transfer: a BN254 Pedersen
//! amount commitment, a nullifier derivation, and a proof envelope binding
//! them to a real commitment-tree inclusion proof for the spent note plus a
//! hash-bound placeholder standing in for the range-proof a full shielded
//! circuit would attach (the circuit itself is outside this crate's scope).

use crate::curves::bn254::G1Ops;
use crate::trees::commitment_tree::{self, DEPTH};
use ark_ec::CurveGroup;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// Second Pedersen generator `H`, derived from a fixed label the same
/// nothing-up-my-sleeve way the IPA's generator table derives its bases —
/// BN254 G1 has no standardized hash-to-curve in scope here, so a
/// domain-separated hash-to-scalar stands in.
fn generator_h() -> ark_bn254::G1Projective {
    let digest = Sha256::digest(b"chain-crypto-core/shielded/pedersen-h/v1");
    let scalar = ark_bn254::Fr::from_be_bytes_mod_order(&digest);
    G1Ops::scalar_mul(&G1Ops::generator(), &scalar)
}

/// `amount·G + randomness·H`, encoded as a 32-byte big-endian x-coordinate
/// commitment hash (SHA-256 of the compressed point) for a fixed-size,
/// domain-opaque on-chain representation.
pub fn pedersen_commit_bn254(amount: u64, randomness: &[u8; 32]) -> [u8; 32] {
    let amount_scalar = ark_bn254::Fr::from(amount);
    let randomness_scalar = ark_bn254::Fr::from_be_bytes_mod_order(randomness);

    let commitment = G1Ops::add(
        &G1Ops::scalar_mul(&G1Ops::generator(), &amount_scalar),
        &G1Ops::scalar_mul(&generator_h(), &randomness_scalar),
    )
    .into_affine();

    let mut hasher = Sha256::new();
    hasher.update(commitment.x.into_bigint().to_bytes_be());
    hasher.update(commitment.y.into_bigint().to_bytes_be());
    hasher.finalize().into()
}

/// Derives a nullifier from a spend key and a note index, distinct per
/// `(sk, index)` pair.
pub fn derive_nullifier(sk: &[u8; 32], index: u64) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(b"chain-crypto-core/shielded/nullifier/v1");
    hasher.update(sk);
    hasher.update(index.to_be_bytes());
    hasher.finalize().into()
}

/// Hash-bound placeholder standing in for a real range-proof circuit's
/// output. Anyone holding the commitment can recompute and compare this tag,
/// which is enough to catch tampering without reproducing the circuit.
fn range_proof_tag(commitment: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"chain-crypto-core/shielded/range-proof/v1");
    hasher.update(commitment);
    hasher.finalize().into()
}

const PROOF_VERSION: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShieldedTransferWitness {
    pub amount: u64,
    pub randomness: [u8; 32],
    pub spend_key: [u8; 32],
    pub note_index: u64,
    /// Commitment of the note being spent, together with its inclusion path
    /// in the commitment tree whose root a verifier will check against.
    pub spent_commitment: [u8; 32],
    pub leaf_index: u64,
    pub merkle_siblings: [[u8; 32]; DEPTH],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldedTransferProof {
    pub version: u8,
    pub commitment: [u8; 32],
    pub nullifier: [u8; 32],
    /// Hash-bound placeholder standing in for a circuit-produced range
    /// proof; see [`range_proof_tag`].
    pub range_proof: Vec<u8>,
    /// Serialized commitment-tree inclusion proof for the spent note:
    /// `leaf_index (8 LE) ‖ spent_commitment (32) ‖ siblings (32·DEPTH)`.
    pub merkle_inclusion: Vec<u8>,
}

fn encode_merkle_inclusion(
    leaf_index: u64,
    spent_commitment: &[u8; 32],
    siblings: &[[u8; 32]; DEPTH],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + 32 + 32 * DEPTH);
    out.extend_from_slice(&leaf_index.to_le_bytes());
    out.extend_from_slice(spent_commitment);
    for sibling in siblings {
        out.extend_from_slice(sibling);
    }
    out
}

fn decode_merkle_inclusion(bytes: &[u8]) -> Option<commitment_tree::MerkleProof> {
    let expected_len = 8 + 32 + 32 * DEPTH;
    if bytes.len() != expected_len {
        return None;
    }
    let mut leaf_index_bytes = [0u8; 8];
    leaf_index_bytes.copy_from_slice(&bytes[0..8]);
    let index = u64::from_le_bytes(leaf_index_bytes);

    let mut spent_commitment = [0u8; 32];
    spent_commitment.copy_from_slice(&bytes[8..40]);

    let mut siblings = [[0u8; 32]; DEPTH];
    for (i, sibling) in siblings.iter_mut().enumerate() {
        let offset = 40 + i * 32;
        sibling.copy_from_slice(&bytes[offset..offset + 32]);
    }

    Some(commitment_tree::MerkleProof {
        leaf: crate::trees::leaf_hash(&spent_commitment),
        siblings,
        index,
    })
}

/// Packages a witness into a proof envelope bound to the spent note's
/// commitment-tree inclusion path.
pub fn prove_shielded_transfer(witness: &ShieldedTransferWitness) -> ShieldedTransferProof {
    let commitment = pedersen_commit_bn254(witness.amount, &witness.randomness);
    let nullifier = derive_nullifier(&witness.spend_key, witness.note_index);
    ShieldedTransferProof {
        version: PROOF_VERSION,
        commitment,
        nullifier,
        range_proof: range_proof_tag(&commitment).to_vec(),
        merkle_inclusion: encode_merkle_inclusion(
            witness.leaf_index,
            &witness.spent_commitment,
            &witness.merkle_siblings,
        ),
    }
}

/// Verifies a proof envelope against the nullifier/commitment a caller
/// expects it to bind to and the commitment-tree `root` the spent note must
/// be included under. Tampering with `commitment`, `range_proof`, or
/// `merkle_inclusion` is detected.
pub fn verify_shielded_transfer(
    proof: &ShieldedTransferProof,
    expected_nullifier: &[u8; 32],
    expected_commitment: &[u8; 32],
    root: &[u8; 32],
) -> bool {
    if proof.version != PROOF_VERSION
        || &proof.nullifier != expected_nullifier
        || &proof.commitment != expected_commitment
    {
        return false;
    }

    if proof.range_proof != range_proof_tag(&proof.commitment) {
        return false;
    }

    let Some(merkle_proof) = decode_merkle_inclusion(&proof.merkle_inclusion) else {
        return false;
    };
    commitment_tree::verify_proof(&merkle_proof, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::commitment_tree::CommitmentTree;

    fn witness_with_tree() -> (ShieldedTransferWitness, [u8; 32]) {
        let tree = CommitmentTree::new();
        let spent_commitment = [9u8; 32];
        let (leaf_index, root) = tree.append(spent_commitment).unwrap();
        let proof = tree.merkle_proof(leaf_index).unwrap();

        let witness = ShieldedTransferWitness {
            amount: 42,
            randomness: [7u8; 32],
            spend_key: [9u8; 32],
            note_index: 3,
            spent_commitment,
            leaf_index,
            merkle_siblings: proof.siblings,
        };
        (witness, root)
    }

    #[test]
    fn commitment_is_deterministic() {
        let (w, _root) = witness_with_tree();
        assert_eq!(
            pedersen_commit_bn254(w.amount, &w.randomness),
            pedersen_commit_bn254(w.amount, &w.randomness)
        );
    }

    #[test]
    fn distinct_amounts_yield_distinct_commitments() {
        let (w, _root) = witness_with_tree();
        let c1 = pedersen_commit_bn254(w.amount, &w.randomness);
        let c2 = pedersen_commit_bn254(w.amount + 1, &w.randomness);
        assert_ne!(c1, c2);
    }

    #[test]
    fn nullifier_distinct_per_index() {
        let sk = [1u8; 32];
        assert_ne!(derive_nullifier(&sk, 0), derive_nullifier(&sk, 1));
    }

    #[test]
    fn round_trip_proof_verifies() {
        let (w, root) = witness_with_tree();
        let proof = prove_shielded_transfer(&w);
        let nullifier = derive_nullifier(&w.spend_key, w.note_index);
        let commitment = pedersen_commit_bn254(w.amount, &w.randomness);
        assert!(verify_shielded_transfer(&proof, &nullifier, &commitment, &root));
    }

    #[test]
    fn tampered_commitment_fails_verification() {
        let (w, root) = witness_with_tree();
        let mut proof = prove_shielded_transfer(&w);
        proof.commitment[0] ^= 0xff;
        let nullifier = derive_nullifier(&w.spend_key, w.note_index);
        let commitment = pedersen_commit_bn254(w.amount, &w.randomness);
        assert!(!verify_shielded_transfer(&proof, &nullifier, &commitment, &root));
    }

    #[test]
    fn tampered_range_proof_fails_verification() {
        let (w, root) = witness_with_tree();
        let mut proof = prove_shielded_transfer(&w);
        proof.range_proof[0] ^= 0xff;
        let nullifier = derive_nullifier(&w.spend_key, w.note_index);
        let commitment = pedersen_commit_bn254(w.amount, &w.randomness);
        assert!(!verify_shielded_transfer(&proof, &nullifier, &commitment, &root));
    }

    #[test]
    fn tampered_merkle_inclusion_fails_verification() {
        let (w, root) = witness_with_tree();
        let mut proof = prove_shielded_transfer(&w);
        let last = proof.merkle_inclusion.len() - 1;
        proof.merkle_inclusion[last] ^= 0xff;
        let nullifier = derive_nullifier(&w.spend_key, w.note_index);
        let commitment = pedersen_commit_bn254(w.amount, &w.randomness);
        assert!(!verify_shielded_transfer(&proof, &nullifier, &commitment, &root));
    }

    #[test]
    fn wrong_root_fails_verification() {
        let (w, _root) = witness_with_tree();
        let proof = prove_shielded_transfer(&w);
        let nullifier = derive_nullifier(&w.spend_key, w.note_index);
        let commitment = pedersen_commit_bn254(w.amount, &w.randomness);
        let wrong_root = [0xabu8; 32];
        assert!(!verify_shielded_transfer(&proof, &nullifier, &commitment, &wrong_root));
    }
}
