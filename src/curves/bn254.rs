//! BN254 G1/G2 instantiation of the generic curve operations.

use super::CurveOps;

pub type G1Ops = CurveOps<ark_bn254::g1::Config>;
pub type G2Ops = CurveOps<ark_bn254::g2::Config>;

pub type G1Projective = ark_bn254::G1Projective;
pub type G1Affine = ark_bn254::G1Affine;
pub type G2Projective = ark_bn254::G2Projective;
pub type G2Affine = ark_bn254::G2Affine;
