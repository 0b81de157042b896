//! BN254 tower-field arithmetic: Fp2 = Fp[i]/(i²+1), Fp6 = Fp2[v]/(v³-ξ)
//! with ξ = 9+i, Fp12 = Fp6[w]/(w²-v). Add/mul/sqr/inv ride on `ark-bn254`'s
//! own tower implementation (`Fq2`/`Fq6`/`Fq12`); this module supplies the
//! efficient Frobenius endomorphism with its own independently-derived
//! gamma constants, as the one hand-rolled centerpiece of the tower.

use ark_bn254::{Fq, Fq12, Fq2, Fq6};
use ark_ff::{BigInteger, Field, PrimeField};
use num_bigint::BigUint;
use once_cell::sync::Lazy;

pub type Bn254Fp2 = Fq2;
pub type Bn254Fp6 = Fq6;
pub type Bn254Fp12 = Fq12;

/// ξ = 9 + i, the non-residue defining the cubic extension Fp6 = Fp2[v]/(v³-ξ).
fn xi() -> Fq2 {
    Fq2::new(Fq::from(9u64), Fq::from(1u64))
}

fn modulus_biguint() -> BigUint {
    BigUint::from_bytes_le(&Fq::MODULUS.to_bytes_le())
}

fn pow_fq2(base: Fq2, exponent: &BigUint) -> Fq2 {
    base.pow(exponent.to_u64_digits())
}

/// γ1[i] = ξ^((p-1)·i/6) for i = 1..=5, the first-power Frobenius constants.
static GAMMA1: Lazy<[Fq2; 5]> = Lazy::new(|| {
    let p_minus_1 = modulus_biguint() - BigUint::from(1u32);
    let unit = &p_minus_1 / BigUint::from(6u32);
    let base = xi();
    std::array::from_fn(|idx| {
        let i = (idx + 1) as u32;
        pow_fq2(base, &(&unit * BigUint::from(i)))
    })
});

/// γ2[i] = γ1[i] · conj(γ1[i]) = ξ^((p²-1)·i/6), the second-power constants.
static GAMMA2: Lazy<[Fq2; 5]> = Lazy::new(|| {
    std::array::from_fn(|idx| {
        let g1 = GAMMA1[idx];
        g1 * conj_fp2(g1)
    })
});

/// γ3[i] = γ2[i] · γ1[i], the third-power constants.
static GAMMA3: Lazy<[Fq2; 5]> = Lazy::new(|| std::array::from_fn(|idx| GAMMA2[idx] * GAMMA1[idx]));

fn conj_fp2(a: Fq2) -> Fq2 {
    Fq2::new(a.c0, -a.c1)
}

fn conj_fp6(a: Fq6) -> Fq6 {
    // v is not fixed by conjugation in general, but component-wise
    // conjugation of the Fp2 coefficients is exactly the operation the
    // efficient-Frobenius step needs before the gamma multiplication.
    Fq6::new(conj_fp2(a.c0), conj_fp2(a.c1), conj_fp2(a.c2))
}

fn frobenius_step(f: Fq12, gammas: &[Fq2; 5], conjugate_components: bool) -> Fq12 {
    let (c0, c1) = (f.c0, f.c1);
    let maybe_conj6 = |x: Fq6| if conjugate_components { conj_fp6(x) } else { x };
    let c0 = maybe_conj6(c0);
    let c1 = maybe_conj6(c1);

    // c0 = d0 + d1 v + d2 v^2, c1 = e0 + e1 v + e2 v^2 (Fq6::Fp6Config tower).
    let d0 = c0.c0;
    let d1 = c0.c1 * gammas[1]; // γ1[2]
    let d2 = c0.c2 * gammas[3]; // γ1[4]
    let e0 = c1.c0 * gammas[0]; // γ1[1]
    let e1 = c1.c1 * gammas[2]; // γ1[3]
    let e2 = c1.c2 * gammas[4]; // γ1[5]

    Fq12::new(Fq6::new(d0, d1, d2), Fq6::new(e0, e1, e2))
}

/// The efficient Frobenius endomorphism `π^power` on Fp12, for power ∈ {1,2,3}.
pub fn frobenius_efficient(f: Fq12, power: usize) -> Fq12 {
    match power {
        1 => frobenius_step(f, &GAMMA1, true),
        2 => frobenius_step(f, &GAMMA2, false),
        3 => frobenius_step(f, &GAMMA3, true),
        _ => panic!("frobenius_efficient only supports powers 1, 2, 3"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn frobenius_matches_direct_exponentiation() {
        let mut rng = test_rng();
        let p = modulus_biguint();
        for power in 1..=3usize {
            let exponent = p.pow(power as u32);
            for _ in 0..4 {
                let f = Fq12::rand(&mut rng);
                let direct = f.pow(exponent.to_u64_digits());
                let efficient = frobenius_efficient(f, power);
                assert_eq!(direct, efficient, "mismatch at power {power}");
            }
        }
    }

    #[test]
    fn frobenius_composes() {
        let mut rng = test_rng();
        let f = Fq12::rand(&mut rng);
        let once = frobenius_efficient(f, 1);
        let twice = frobenius_efficient(once, 1);
        assert_eq!(twice, frobenius_efficient(f, 2));
    }
}
