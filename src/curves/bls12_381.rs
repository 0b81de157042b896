//! BLS12-381 G1/G2 instantiation of the generic curve operations.

use super::CurveOps;

pub type G1Ops = CurveOps<ark_bls12_381::g1::Config>;
pub type G2Ops = CurveOps<ark_bls12_381::g2::Config>;

pub type G1Projective = ark_bls12_381::G1Projective;
pub type G1Affine = ark_bls12_381::G1Affine;
pub type G2Projective = ark_bls12_381::G2Projective;
pub type G2Affine = ark_bls12_381::G2Affine;

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::CurveGroup;

    #[test]
    fn g1_subgroup_check_is_real_check() {
        let g = G1Ops::generator();
        let affine = G1Ops::to_affine(&g);
        assert!(G1Ops::is_in_subgroup(&affine));
    }

    #[test]
    fn g2_scalar_mul_order_annihilates() {
        let g = G2Ops::generator();
        let order = ark_bls12_381::Fr::from(0u64); // 0 * anything = identity
        let p = G2Ops::scalar_mul(&g, &order);
        assert!(G2Ops::is_infinity(&p));
    }

    #[test]
    fn g1_double_and_add_agree() {
        let g = G1Ops::generator();
        let two = ark_bls12_381::Fr::from(2u64);
        assert_eq!(G1Ops::scalar_mul(&g, &two), G1Ops::double(&g));
    }
}
