//! Extension trait giving the three prime fields this crate cares about
//! (BN254 base, BLS12-381 base, BLS12-381 scalar / Banderwagon base) a
//! uniform, spec-named API over the underlying `ark-ff` implementation.
//! No bignum arithmetic is hand-rolled here; `ark_ff::PrimeField` already
//! does the vetted modular arithmetic, this module just names the
//! operations the way the rest of the crate expects to call them.

use ark_ff::{BigInteger, Field, PrimeField};

pub type BnFq = ark_bn254::Fq;
pub type BlsFq = ark_bls12_381::Fq;
pub type BlsFr = ark_bls12_381::Fr;

/// Spec-named field operations, blanket-implemented for every `PrimeField`.
pub trait FieldArith: PrimeField {
    fn fa_add(&self, rhs: &Self) -> Self {
        *self + rhs
    }
    fn fa_sub(&self, rhs: &Self) -> Self {
        *self - rhs
    }
    fn fa_mul(&self, rhs: &Self) -> Self {
        *self * rhs
    }
    fn fa_sqr(&self) -> Self {
        self.square()
    }
    fn fa_neg(&self) -> Self {
        -*self
    }

    /// `None` for a zero input, matching the "no inverse" sentinel.
    fn fa_inv(&self) -> Option<Self> {
        self.inverse()
    }

    fn fa_exp(&self, exponent: &[u64]) -> Self {
        self.pow(exponent)
    }

    /// `sgn0`: the least significant bit of the canonical representative.
    fn fa_sgn0(&self) -> u8 {
        (self.into_bigint().as_ref()[0] & 1) as u8
    }

    /// Euler's criterion: `a^((p-1)/2)`, used as the RFC 9380 `is_square` test.
    fn fa_is_square(&self) -> bool {
        self.legendre().is_qr()
    }

    /// Square root, when one exists. `ark_ff` dispatches internally between
    /// the direct `p ≡ 3 (mod 4)` formula (BLS12-381 base field) and
    /// Tonelli-Shanks (BN254 base field, Banderwagon base field), which is
    /// exactly the split this operation names.
    fn fa_sqrt(&self) -> Option<Self> {
        let root = Field::sqrt(self)?;
        if root.fa_sqr() == *self {
            Some(root)
        } else {
            None
        }
    }
}

impl<F: PrimeField> FieldArith for F {}
