//! Process-wide configuration: the KZG trusted setup point and the Pedersen
//! generator count. Both are guarded singletons per the concurrency model —
//! the generator table publishes once and is read-only forever after, while
//! the trusted setup exposes a test-only setter behind a read-write lock.

use ark_bls12_381::G2Projective;
use ark_ec::Group;
use ark_ff::PrimeField;
use parking_lot::RwLock;

/// Number of Pedersen vector-commitment generators kept in the process-wide
/// table (`IpaProve`/`IpaVerify` never need more than this many).
pub const PEDERSEN_GENERATOR_COUNT: usize = 256;

static TRUSTED_SETUP: RwLock<Option<G2Projective>> = RwLock::new(None);

/// Returns the current trusted setup point `[s]G2`, initializing it to the
/// test default (`s = 42`) on first access if nothing has been configured.
pub fn trusted_setup_g2() -> G2Projective {
    if let Some(point) = *TRUSTED_SETUP.read() {
        return point;
    }
    let mut guard = TRUSTED_SETUP.write();
    if guard.is_none() {
        let s = <ark_bls12_381::Fr as PrimeField>::from(42u64);
        *guard = Some(G2Projective::generator() * s);
    }
    guard.unwrap()
}

/// Test-only override of the trusted setup point. Production callers must
/// not mutate this concurrently with in-flight verifications (see the
/// concurrency model's documented limitation).
pub fn set_trusted_setup_g2(point: G2Projective) {
    *TRUSTED_SETUP.write() = Some(point);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_setup_is_deterministic() {
        set_trusted_setup_g2(G2Projective::generator() * <ark_bls12_381::Fr as PrimeField>::from(42u64));
        let a = trusted_setup_g2();
        let b = trusted_setup_g2();
        assert_eq!(a, b);
    }
}
