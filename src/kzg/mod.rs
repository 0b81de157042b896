//! KZG polynomial-commitment verification (EIP-4844 style): ZCash-format
//! 48-byte G1 (de)compression plus a direct pairing-equation check. No
//! generic polynomial-commitment machinery is pulled in — verification only
//! ever needs `e(C - yG1, G2) = e(π, [s]G2 - zG2)`, so this rides directly
//! on `ark_bls12_381`'s `Pairing` implementation.

use crate::config::trusted_setup_g2;
use ark_bls12_381::{Bls12_381, Fq, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{BigInteger, Field, PrimeField, Zero};
use num_bigint::BigUint;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KzgError {
    #[error("uncompressed G1 encoding is not supported")]
    UncompressedUnsupported,
    #[error("infinity point must have all remaining bits clear")]
    MalformedInfinity,
    #[error("x coordinate is not reduced modulo the base field")]
    CoordinateNotReduced,
    #[error("x^3 + 4 is not a square in the base field")]
    NotASquare,
    #[error("decoded coordinates are not a valid subgroup point")]
    NotInSubgroup,
}

fn half_modulus() -> BigUint {
    let p = BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le());
    (p - BigUint::from(1u32)) / BigUint::from(2u32)
}

fn gt_half_modulus(x: &Fq) -> bool {
    BigUint::from_bytes_le(&x.into_bigint().to_bytes_le()) > half_modulus()
}

/// Decodes a ZCash-format 48-byte compressed G1 point.
#[instrument(level = "debug", skip(bytes))]
pub fn decode_g1_compressed(bytes: &[u8; 48]) -> Result<G1Affine, KzgError> {
    let compression_flag = bytes[0] & 0x80 != 0;
    if !compression_flag {
        return Err(KzgError::UncompressedUnsupported);
    }
    let infinity_flag = bytes[0] & 0x40 != 0;
    let sort_flag = bytes[0] & 0x20 != 0;

    let mut x_bytes = *bytes;
    x_bytes[0] &= 0x1f;

    if infinity_flag {
        if sort_flag || x_bytes.iter().any(|&b| b != 0) {
            return Err(KzgError::MalformedInfinity);
        }
        return Ok(G1Affine::zero());
    }

    let as_biguint = BigUint::from_bytes_be(&x_bytes);
    let p = BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le());
    if as_biguint >= p {
        return Err(KzgError::CoordinateNotReduced);
    }

    let x = Fq::from_be_bytes_mod_order(&x_bytes);
    let y2 = x * x * x + Fq::from(4u64);
    let candidate = y2.sqrt().ok_or(KzgError::NotASquare)?;
    let y = if gt_half_modulus(&candidate) == sort_flag {
        candidate
    } else {
        -candidate
    };

    let point = G1Affine::new_unchecked(x, y);
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        tracing::warn!("decoded KZG G1 point failed the subgroup check");
        return Err(KzgError::NotInSubgroup);
    }
    Ok(point)
}

/// Encodes a G1 point in ZCash compressed format.
pub fn encode_g1_compressed(point: &G1Affine) -> [u8; 48] {
    if point.is_zero() {
        let mut out = [0u8; 48];
        out[0] = 0x80 | 0x40;
        return out;
    }
    let (x, y) = (point.x, point.y);
    let mut out: [u8; 48] = x
        .into_bigint()
        .to_bytes_be()
        .try_into()
        .expect("BLS12-381 base field elements are 48 bytes");
    out[0] |= 0x80;
    if gt_half_modulus(&y) {
        out[0] |= 0x20;
    }
    out
}

/// Verifies a KZG opening: commitment `C` opens to `y` at point `z` under
/// proof `π`, against the configured trusted setup `[s]G2`.
#[instrument(level = "debug", skip(commitment, proof, z, y))]
pub fn verify_opening(commitment: G1Affine, proof: G1Affine, z: Fr, y: Fr) -> bool {
    let setup_g2 = trusted_setup_g2();
    let c_minus_y = (commitment.into_group() - G1Projective::generator() * y).into_affine();
    let s_minus_z = (setup_g2 - G2Projective::generator() * z).into_affine();

    let lhs = Bls12_381::pairing(c_minus_y, G2Affine::generator());
    let rhs = Bls12_381::pairing(proof, s_minus_z);
    let ok = lhs == rhs;
    if !ok {
        tracing::warn!("KZG opening verification failed");
    }
    ok
}
