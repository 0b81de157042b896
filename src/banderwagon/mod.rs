//! Banderwagon: the prime-order quotient group built on the Bandersnatch
//! twisted-Edwards curve over the BLS12-381 scalar field. Wraps
//! `ark-ed-on-bls12-381-bandersnatch`'s extended-coordinate point type with
//! the quotient equality, canonical 32-byte encoding, and map-to-field this
//! crate's higher layers (Pedersen commitments, the IPA) need.

use ark_ec::{
    twisted_edwards::{Affine, TECurveConfig},
    AffineRepr, CurveGroup, Group,
};
use ark_ed_on_bls12_381_bandersnatch::{EdwardsConfig, EdwardsProjective, Fq};
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};

/// A point in the Banderwagon group, represented by an underlying
/// Bandersnatch point modulo the `(x,y) ~ (-x,-y)` equivalence.
#[derive(Clone, Copy, Debug)]
pub struct BanderwagonPoint(EdwardsProjective);

impl BanderwagonPoint {
    pub fn generator() -> Self {
        Self(EdwardsProjective::generator())
    }

    pub fn identity() -> Self {
        Self(EdwardsProjective::zero())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    pub fn double(&self) -> Self {
        Self(self.0.double())
    }

    pub fn neg(&self) -> Self {
        Self(-self.0)
    }

    pub fn scalar_mul(&self, k: &ark_ed_on_bls12_381_bandersnatch::Fr) -> Self {
        Self(self.0 * k)
    }

    pub fn msm(points: &[Self], scalars: &[ark_ed_on_bls12_381_bandersnatch::Fr]) -> Self {
        points
            .iter()
            .zip(scalars.iter())
            .fold(Self::identity(), |acc, (p, s)| acc.add(&p.scalar_mul(s)))
    }

    /// Affine (x, y) coordinates, valid for any representative.
    fn affine_xy(&self) -> (Fq, Fq) {
        let affine: Affine<EdwardsConfig> = self.0.into_affine();
        (affine.x, affine.y)
    }

    pub fn is_on_curve(&self) -> bool {
        let (x, y) = self.affine_xy();
        let x2 = x * x;
        let y2 = y * y;
        EdwardsConfig::COEFF_A * x2 + y2 == Fq::one() + EdwardsConfig::COEFF_D * x2 * y2
    }

    /// `x / y`, the field element used as the hash of a commitment. `None`
    /// for the identity, whose `y` is one but whose `x` is zero — division
    /// is well defined there too (`0/1 = 0`), so this only fails if a
    /// representative has `y = 0`, which cannot happen on this curve.
    pub fn map_to_field(&self) -> Option<Fq> {
        let (x, y) = self.affine_xy();
        y.inverse().map(|y_inv| x * y_inv)
    }

    fn half_modulus() -> num_bigint::BigUint {
        let r = num_bigint::BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le());
        (r - num_bigint::BigUint::from(1u32)) / num_bigint::BigUint::from(2u32)
    }

    fn gt_half_modulus(x: &Fq) -> bool {
        let value = num_bigint::BigUint::from_bytes_le(&x.into_bigint().to_bytes_le());
        value > Self::half_modulus()
    }

    /// Canonical 32-byte little-endian encoding with a sign bit in the MSB
    /// of the last byte, as described for Banderwagon serialization.
    pub fn to_bytes(&self) -> [u8; 32] {
        let (mut x, mut y) = self.affine_xy();
        if Self::gt_half_modulus(&y) {
            x = -x;
            y = -y;
        }
        let mut bytes = [0u8; 32];
        let y_bytes = y.into_bigint().to_bytes_le();
        bytes[..y_bytes.len().min(32)].copy_from_slice(&y_bytes[..y_bytes.len().min(32)]);
        if Self::gt_half_modulus(&x) {
            bytes[31] |= 0x80;
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let sign = bytes[31] & 0x80 != 0;
        let mut cleared = *bytes;
        cleared[31] &= 0x7f;
        let y = Fq::from_le_bytes_mod_order(&cleared);

        let y2 = y * y;
        let numerator = y2 - Fq::one();
        let denominator = EdwardsConfig::COEFF_D * y2 - EdwardsConfig::COEFF_A;
        let denominator_inv = denominator.inverse()?;
        let x2 = numerator * denominator_inv;
        let mut x = x2.sqrt()?;
        if x * x != x2 {
            return None;
        }
        if Self::gt_half_modulus(&x) != sign {
            x = -x;
        }

        let affine = Affine::<EdwardsConfig>::new_unchecked(x, y);
        let point = Self(affine.into_group());
        if point.is_on_curve() {
            Some(point)
        } else {
            None
        }
    }
}

impl PartialEq for BanderwagonPoint {
    fn eq(&self, other: &Self) -> bool {
        let (x1, y1, z1) = (self.0.x, self.0.y, self.0.z);
        let (x2, y2, z2) = (other.0.x, other.0.y, other.0.z);
        let lhs = (x1 * z2, y1 * z2);
        let rhs = (x2 * z1, y2 * z1);
        lhs == rhs || lhs == (-rhs.0, -rhs.1)
    }
}

impl Eq for BanderwagonPoint {}
