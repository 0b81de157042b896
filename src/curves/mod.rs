//! Generic short-Weierstrass curve operations, instantiated per curve in
//! `curves::bn254` and `curves::bls12_381` for compile-time dispatch (the
//! "polymorphism over curves" pattern: one generic implementation, several
//! monomorphized call sites).

pub mod bls12_381;
pub mod bn254;

use ark_ec::{
    short_weierstrass::{Affine, Projective, SWCurveConfig},
    AffineRepr, CurveGroup, Group,
};
use ark_ff::Zero;
use std::marker::PhantomData;

/// Namespace of curve operations for a short-Weierstrass configuration `P`.
pub struct CurveOps<P: SWCurveConfig>(PhantomData<P>);

impl<P: SWCurveConfig> CurveOps<P> {
    pub fn generator() -> Projective<P> {
        Projective::<P>::generator()
    }

    pub fn infinity() -> Projective<P> {
        Projective::<P>::zero()
    }

    pub fn is_infinity(p: &Projective<P>) -> bool {
        p.is_zero()
    }

    pub fn to_affine(p: &Projective<P>) -> Affine<P> {
        p.into_affine()
    }

    /// Builds an affine point from raw coordinates, returning `None` if the
    /// pair does not satisfy the curve equation.
    pub fn from_affine(x: P::BaseField, y: P::BaseField) -> Option<Affine<P>> {
        let candidate = Affine::<P>::new_unchecked(x, y);
        if candidate.is_on_curve() {
            Some(candidate)
        } else {
            None
        }
    }

    pub fn add(a: &Projective<P>, b: &Projective<P>) -> Projective<P> {
        *a + b
    }

    pub fn double(a: &Projective<P>) -> Projective<P> {
        a.double()
    }

    pub fn neg(a: &Projective<P>) -> Projective<P> {
        -*a
    }

    pub fn scalar_mul(a: &Projective<P>, k: &P::ScalarField) -> Projective<P> {
        *a * k
    }

    pub fn is_on_curve(p: &Affine<P>) -> bool {
        p.is_on_curve()
    }

    /// Full subgroup membership: on-curve *and* annihilated by the group
    /// order. Always performs the scalar check — there is no lax
    /// curve-only shortcut for either coordinate group on either curve.
    pub fn is_in_subgroup(p: &Affine<P>) -> bool {
        p.is_on_curve() && p.is_in_correct_subgroup_assuming_on_curve()
    }

    pub fn msm(points: &[Affine<P>], scalars: &[P::ScalarField]) -> Projective<P> {
        points
            .iter()
            .zip(scalars.iter())
            .fold(Projective::<P>::zero(), |acc, (p, s)| acc + *p * s)
    }
}
