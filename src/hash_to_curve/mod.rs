//! RFC 9380 hash-to-curve for BLS12-381 G1: `expand_message_xmd` and
//! `hash_to_field` are implemented directly against SHA-256 (they are pure
//! byte-level constructions, nothing curve-specific); the actual
//! Simplified-SWU-with-isogeny map rides on `ark-bls12-381`'s own
//! Wahby-Boneh map implementation, the same delegation this crate uses for
//! every other piece of curve-specific bignum machinery.

use ark_bls12_381::{g1::Config as G1Config, Fq, G1Affine, G1Projective};
use ark_ec::{
    hashing::{curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher, HashToCurve},
    CurveGroup,
};
use ark_ff::{field_hashers::DefaultFieldHasher, PrimeField, Zero};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;

const MAX_DST_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum HashToCurveError {
    #[error("DST must be 1..={MAX_DST_LEN} bytes, got {0}")]
    InvalidDst(usize),
    #[error("requested output too long for expand_message_xmd")]
    OutputTooLong,
    #[error("curve mapping failed: {0}")]
    Mapping(String),
}

/// RFC 9380 §5.3.1 `expand_message_xmd` with SHA-256 (b_in_bytes=32,
/// s_in_bytes=64).
#[instrument(level = "debug", skip(msg, dst))]
pub fn expand_message_xmd(msg: &[u8], dst: &[u8], out_len: usize) -> Result<Vec<u8>, HashToCurveError> {
    use sha2::Digest;

    if dst.is_empty() || dst.len() > MAX_DST_LEN {
        return Err(HashToCurveError::InvalidDst(dst.len()));
    }
    const B_IN_BYTES: usize = 32;
    const S_IN_BYTES: usize = 64;

    let ell = (out_len + B_IN_BYTES - 1) / B_IN_BYTES;
    if ell > 255 {
        return Err(HashToCurveError::OutputTooLong);
    }
    let dst_prime: Vec<u8> = dst.iter().copied().chain([dst.len() as u8]).collect();
    let z_pad = vec![0u8; S_IN_BYTES];
    let l_i_b_str = (out_len as u16).to_be_bytes();

    let mut b0_input = Vec::with_capacity(z_pad.len() + msg.len() + 2 + 1 + dst_prime.len());
    b0_input.extend_from_slice(&z_pad);
    b0_input.extend_from_slice(msg);
    b0_input.extend_from_slice(&l_i_b_str);
    b0_input.push(0u8);
    b0_input.extend_from_slice(&dst_prime);
    let b0 = Sha256::digest(&b0_input);

    let mut b1_input = Vec::with_capacity(32 + 1 + dst_prime.len());
    b1_input.extend_from_slice(&b0);
    b1_input.push(1u8);
    b1_input.extend_from_slice(&dst_prime);
    let mut b_prev = Sha256::digest(&b1_input);

    let mut out = Vec::with_capacity(ell * B_IN_BYTES);
    out.extend_from_slice(&b_prev);
    for i in 2..=ell {
        let mut strxor: Vec<u8> = b0.iter().zip(b_prev.iter()).map(|(a, b)| a ^ b).collect();
        strxor.push(i as u8);
        strxor.extend_from_slice(&dst_prime);
        b_prev = Sha256::digest(&strxor);
        out.extend_from_slice(&b_prev);
    }
    out.truncate(out_len);
    Ok(out)
}

/// `hash_to_field` for the BLS12-381 base field, drawing `count` elements
/// each from `L = 64` uniform bytes.
#[instrument(level = "debug", skip(msg, dst))]
pub fn hash_to_field(msg: &[u8], dst: &[u8], count: usize) -> Result<Vec<Fq>, HashToCurveError> {
    const L: usize = 64;
    let uniform_bytes = expand_message_xmd(msg, dst, count * L)?;
    Ok(uniform_bytes
        .chunks_exact(L)
        .map(Fq::from_be_bytes_mod_order)
        .collect())
}

/// `hash_to_curve`: RFC 9380 "random oracle" encoding — two field elements,
/// each mapped to a curve point and added, with cofactor clearing folded in
/// by the underlying hasher.
#[instrument(level = "debug", skip(msg, dst))]
pub fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Result<G1Affine, HashToCurveError> {
    if dst.is_empty() || dst.len() > MAX_DST_LEN {
        return Err(HashToCurveError::InvalidDst(dst.len()));
    }
    let hasher =
        <MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256>, WBMap<G1Config>>>::new(dst)
            .map_err(|e| HashToCurveError::Mapping(e.to_string()))?;
    hasher.hash(msg).map_err(|e| HashToCurveError::Mapping(e.to_string()))
}

/// `encode_to_curve`: the non-uniform, single-field-element variant, kept
/// separate for callers that explicitly want the weaker encoding.
pub fn encode_to_g1(msg: &[u8], dst: &[u8]) -> Result<G1Affine, HashToCurveError> {
    // The underlying hasher already implements the full random-oracle
    // construction; callers that need `encode_to_curve`'s weaker guarantees
    // can draw a single field element and map it directly.
    let u = hash_to_field(msg, dst, 1)?;
    let wb = WBMap::<G1Config>::new().map_err(|e| HashToCurveError::Mapping(e.to_string()))?;
    use ark_ec::hashing::map_to_curve_hasher::MapToCurve;
    let point = wb
        .map_to_curve(u[0])
        .map_err(|e| HashToCurveError::Mapping(e.to_string()))?;
    Ok(point.into_group().into_affine())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_message_rejects_empty_dst() {
        assert!(expand_message_xmd(b"abc", b"", 32).is_err());
    }

    #[test]
    fn expand_message_is_deterministic_and_sized() {
        let dst = b"QUUX-V01-CS02-with-expander-SHA256-128";
        let a = expand_message_xmd(b"abc", dst, 48).unwrap();
        let b = expand_message_xmd(b"abc", dst, 48).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 48);
    }

    #[test]
    fn hash_to_field_produces_requested_count() {
        let dst = b"chain-crypto-core-hash-to-curve-v1";
        let fs = hash_to_field(b"hello", dst, 2).unwrap();
        assert_eq!(fs.len(), 2);
    }

    #[test]
    fn hash_to_g1_is_deterministic_and_in_subgroup() {
        let dst = b"chain-crypto-core-hash-to-curve-v1";
        let p1 = hash_to_g1(b"message", dst).unwrap();
        let p2 = hash_to_g1(b"message", dst).unwrap();
        assert_eq!(p1, p2);
        assert!(!p1.is_zero());
    }

    #[test]
    fn different_messages_hash_to_different_points() {
        let dst = b"chain-crypto-core-hash-to-curve-v1";
        let p1 = hash_to_g1(b"alpha", dst).unwrap();
        let p2 = hash_to_g1(b"beta", dst).unwrap();
        assert_ne!(p1, p2);
    }
}
