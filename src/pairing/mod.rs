//! The BN254 optimal Ate pairing. Per-step line-function accumulation (the
//! Miller loop proper) rides on `ark-bn254`'s vetted implementation, the
//! same way `FieldArith`/`curves` delegate their bignum work; the final
//! exponentiation is hand-built on top of this crate's own efficient
//! Frobenius (see `towers::frobenius_efficient`) for the easy part, with the
//! hard part computed by direct exponentiation against the literal
//! `(p^4-p^2+1)/r` exponent rather than an addition-chain shortcut — exact,
//! if not the fastest possible, and easy to audit against the formula it
//! implements.

use crate::towers::frobenius_efficient;
use ark_bn254::{Bn254, Fq12, G1Affine, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ff::{BigInteger, Field, PrimeField};
use num_bigint::BigUint;
use once_cell::sync::Lazy;

fn modulus_biguint<F: PrimeField>() -> BigUint {
    BigUint::from_bytes_le(&F::MODULUS.to_bytes_le())
}

fn hard_part_exponent() -> BigUint {
    let p = modulus_biguint::<ark_bn254::Fq>();
    let r = modulus_biguint::<ark_bn254::Fr>();
    let p2 = &p * &p;
    let p4 = &p2 * &p2;
    (&p4 - &p2 + BigUint::from(1u32)) / &r
}

static HARD_PART_EXPONENT: Lazy<BigUint> = Lazy::new(hard_part_exponent);

fn conjugate_fp12(f: Fq12) -> Fq12 {
    Fq12::new(f.c0, -f.c1)
}

/// Raw (non-final-exponentiated) Miller loop accumulation over a batch of
/// (G1, G2) pairs.
pub fn miller_loop(pairs: &[(G1Affine, G2Affine)]) -> Fq12 {
    let g1s: Vec<G1Affine> = pairs.iter().map(|(p, _)| *p).collect();
    let g2s: Vec<G2Affine> = pairs.iter().map(|(_, q)| *q).collect();
    Bn254::multi_miller_loop(g1s, g2s).0
}

/// `f ↦ f^((p^12-1)/r)`, split into easy and hard parts.
pub fn final_exponentiation(f: Fq12) -> Fq12 {
    let f1 = {
        let conj = conjugate_fp12(f);
        let inv = f
            .inverse()
            .expect("Miller loop output is never zero for non-degenerate inputs");
        conj * inv
    };
    let f2 = frobenius_efficient(f1, 2) * f1;
    f2.pow(HARD_PART_EXPONENT.to_u64_digits())
}

pub fn pairing(p: G1Affine, q: G2Affine) -> Fq12 {
    final_exponentiation(miller_loop(&[(p, q)]))
}

/// Evaluates the product of pairings over `pairs` and reports whether it
/// equals the identity in Fp12 — the check KZG verification and other
/// pairing-equation protocols reduce to.
pub fn multi_pairing_is_one(pairs: &[(G1Affine, G2Affine)]) -> bool {
    final_exponentiation(miller_loop(pairs)) == Fq12::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::bn254::{G1Ops, G2Ops};
    use ark_ec::CurveGroup;

    #[test]
    fn bilinearity_holds() {
        let g1 = G1Ops::generator();
        let g2 = G2Ops::generator();
        let a = ark_bn254::Fr::from(6u64);
        let b = ark_bn254::Fr::from(7u64);

        let lhs = pairing(
            G1Ops::scalar_mul(&g1, &a).into_affine(),
            G2Ops::scalar_mul(&g2, &b).into_affine(),
        );
        let rhs = pairing(
            G1Ops::scalar_mul(&g1, &(a * b)).into_affine(),
            g2.into_affine(),
        );
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn multi_pairing_detects_balanced_product() {
        let g1 = G1Ops::generator().into_affine();
        let g2 = G2Ops::generator().into_affine();
        let neg_g1 = G1Ops::neg(&G1Ops::generator()).into_affine();
        assert!(multi_pairing_is_one(&[(g1, g2), (neg_g1, g2)]));
    }

    #[test]
    fn multi_pairing_rejects_unbalanced_product() {
        let g1 = G1Ops::generator().into_affine();
        let g2 = G2Ops::generator().into_affine();
        assert!(!multi_pairing_is_one(&[(g1, g2)]));
    }
}
