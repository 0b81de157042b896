//! Feldman-verifiable Shamir secret sharing over a safe-prime group, with
//! threshold ElGamal key encapsulation and AES-GCM payload encryption.
//! `num-bigint` carries the group arithmetic here since this safe-prime
//! group is not one of the three `ark-ff` curve fields; derived key
//! material is wrapped in `zeroize::Zeroizing` the way secret bytes are
//! handled elsewhere in this crate's dependency stack.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use num_bigint::{BigUint, RandBigInt};
use once_cell::sync::Lazy;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;
use tracing::instrument;
use zeroize::Zeroizing;

/// Minimum plausible AES-256-GCM ciphertext length: a 16-byte authentication
/// tag with no plaintext bytes at all.
const MIN_CIPHERTEXT_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold must satisfy 1 <= t <= n")]
    InvalidThreshold,
    #[error("fewer shares supplied than the reconstruction threshold")]
    InsufficientShares,
    #[error("duplicate share index in reconstruction set")]
    DuplicateShareIndex,
    #[error("share fails Feldman verification")]
    InvalidShare,
    #[error("AEAD decryption failed")]
    DecryptionFailed,
    #[error("ciphertext is malformed")]
    InvalidCiphertext,
}

struct GroupParams {
    q: BigUint,
    p: BigUint,
    g: BigUint,
}

static GROUP: Lazy<GroupParams> = Lazy::new(|| {
    let q = (BigUint::from(1u8) << 255u32) - BigUint::from(18057u32);
    let p = &q * BigUint::from(2u8) + BigUint::from(1u8);
    GroupParams {
        q,
        p,
        g: BigUint::from(4u8),
    }
});

fn mod_sub(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    let a = a % m;
    let b = b % m;
    if a >= b {
        &a - &b
    } else {
        m - (&b - &a)
    }
}

fn mod_inv(a: &BigUint, m: &BigUint) -> BigUint {
    // m is prime (q), so Fermat: a^(m-2) mod m.
    a.modpow(&(m - BigUint::from(2u8)), m)
}

#[derive(Clone)]
pub struct Share {
    pub index: u32,
    value: Zeroizing<BigUint>,
}

impl Share {
    pub fn value(&self) -> &BigUint {
        &self.value
    }
}

pub struct KeyGenerationOutput {
    pub shares: Vec<Share>,
    pub commitments: Vec<BigUint>,
    pub public_key: BigUint,
}

fn sample_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> BigUint {
    rng.gen_biguint_below(&GROUP.q)
}

/// Splits a freshly-sampled secret into `n` Feldman-verifiable shares with
/// reconstruction threshold `t`.
pub fn key_generation<R: RngCore + CryptoRng>(
    t: usize,
    n: usize,
    rng: &mut R,
) -> Result<KeyGenerationOutput, ThresholdError> {
    if t < 1 || t > n {
        return Err(ThresholdError::InvalidThreshold);
    }
    let coefficients: Vec<BigUint> = (0..t).map(|_| sample_scalar(rng)).collect();

    let shares = (1..=n as u32)
        .map(|i| {
            let x = BigUint::from(i);
            let value = eval_poly(&coefficients, &x);
            Share {
                index: i,
                value: Zeroizing::new(value),
            }
        })
        .collect();

    let commitments: Vec<BigUint> = coefficients
        .iter()
        .map(|a| GROUP.g.modpow(a, &GROUP.p))
        .collect();
    let public_key = commitments[0].clone();

    Ok(KeyGenerationOutput {
        shares,
        commitments,
        public_key,
    })
}

fn eval_poly(coefficients: &[BigUint], x: &BigUint) -> BigUint {
    let mut acc = BigUint::from(0u8);
    for coeff in coefficients.iter().rev() {
        acc = (&acc * x + coeff) % &GROUP.q;
    }
    acc
}

/// `g^{sᵢ} =? Π Cⱼ^{iʲ}` over the safe-prime group.
#[instrument(level = "debug", skip(share, commitments))]
pub fn verify_share(share: &Share, commitments: &[BigUint]) -> Result<(), ThresholdError> {
    let lhs = GROUP.g.modpow(&share.value, &GROUP.p);
    let x = BigUint::from(share.index);
    let mut rhs = BigUint::from(1u8);
    let mut x_pow = BigUint::from(1u8);
    for c in commitments {
        rhs = (&rhs * c.modpow(&x_pow, &GROUP.p)) % &GROUP.p;
        x_pow = (&x_pow * &x) % &GROUP.q;
    }
    if lhs == rhs {
        Ok(())
    } else {
        tracing::warn!(index = share.index, "share failed Feldman verification");
        Err(ThresholdError::InvalidShare)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedMessage {
    pub ephemeral: BigUint,
    pub nonce: [u8; 12],
    pub ciphertext: Vec<u8>,
}

fn derive_key(shared: &BigUint) -> Zeroizing<[u8; 32]> {
    let digest = Keccak256::digest(shared.to_bytes_be());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    Zeroizing::new(key)
}

/// Threshold-ElGamal key encapsulation followed by AES-GCM encryption of
/// `message`.
pub fn share_encrypt<R: RngCore + CryptoRng>(
    public_key: &BigUint,
    message: &[u8],
    rng: &mut R,
) -> EncryptedMessage {
    let r = sample_scalar(rng);
    let ephemeral = GROUP.g.modpow(&r, &GROUP.p);
    let shared = public_key.modpow(&r, &GROUP.p);
    let key = derive_key(&shared);

    let mut nonce_bytes = [0u8; 12];
    rng.fill_bytes(&mut nonce_bytes);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), message)
        .expect("AES-GCM encryption with a valid 96-bit nonce cannot fail");

    EncryptedMessage {
        ephemeral,
        nonce: nonce_bytes,
        ciphertext,
    }
}

/// A single party's partial decryption of an [`EncryptedMessage`]'s
/// ephemeral key, `ephemeral^{sᵢ} mod p`.
#[instrument(level = "debug", skip(share, ephemeral))]
pub fn share_decrypt(share: &Share, ephemeral: &BigUint) -> BigUint {
    ephemeral.modpow(&share.value, &GROUP.p)
}

/// Combines `t` or more partial decryptions via Lagrange interpolation at
/// `x = 0` and opens the AES-GCM ciphertext.
#[instrument(level = "debug", skip(decryption_shares, enc))]
pub fn combine_shares(
    decryption_shares: &[(u32, BigUint)],
    enc: &EncryptedMessage,
) -> Result<Vec<u8>, ThresholdError> {
    if decryption_shares.is_empty() {
        return Err(ThresholdError::InsufficientShares);
    }
    if enc.ciphertext.len() < MIN_CIPHERTEXT_LEN {
        tracing::warn!(
            len = enc.ciphertext.len(),
            "ciphertext shorter than an AES-GCM authentication tag"
        );
        return Err(ThresholdError::InvalidCiphertext);
    }
    let mut seen = std::collections::HashSet::new();
    for (idx, _) in decryption_shares {
        if !seen.insert(*idx) {
            return Err(ThresholdError::DuplicateShareIndex);
        }
    }

    let indices: Vec<BigUint> = decryption_shares.iter().map(|(i, _)| BigUint::from(*i)).collect();
    let mut shared = BigUint::from(1u8);
    for (i, (_, d_i)) in decryption_shares.iter().enumerate() {
        let mut numerator = BigUint::from(1u8);
        let mut denominator = BigUint::from(1u8);
        for (j, xj) in indices.iter().enumerate() {
            if i == j {
                continue;
            }
            numerator = (&numerator * xj) % &GROUP.q;
            let diff = mod_sub(xj, &indices[i], &GROUP.q);
            denominator = (&denominator * diff) % &GROUP.q;
        }
        let denom_inv = mod_inv(&denominator, &GROUP.q);
        let lambda = (&numerator * denom_inv) % &GROUP.q;
        shared = (&shared * d_i.modpow(&lambda, &GROUP.p)) % &GROUP.p;
    }

    let key = derive_key(&shared);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    cipher
        .decrypt(Nonce::from_slice(&enc.nonce), enc.ciphertext.as_ref())
        .map_err(|_| ThresholdError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn honest_shares_pass_feldman_verification() {
        let mut rng = OsRng;
        let out = key_generation(2, 3, &mut rng).unwrap();
        for share in &out.shares {
            assert!(verify_share(share, &out.commitments).is_ok());
        }
    }

    #[test]
    fn tampered_share_fails_feldman_verification() {
        let mut rng = OsRng;
        let out = key_generation(2, 3, &mut rng).unwrap();
        let mut bad_share = out.shares[0].clone();
        bad_share.value = Zeroizing::new(bad_share.value().clone() + BigUint::from(1u8));
        assert_eq!(
            verify_share(&bad_share, &out.commitments),
            Err(ThresholdError::InvalidShare)
        );
    }

    #[test]
    fn undersized_ciphertext_is_rejected() {
        let mut rng = OsRng;
        let out = key_generation(2, 3, &mut rng).unwrap();
        let mut enc = share_encrypt(&out.public_key, b"hello", &mut rng);
        enc.ciphertext.truncate(4);

        let partials: Vec<(u32, BigUint)> = out.shares[..2]
            .iter()
            .map(|s| (s.index, share_decrypt(s, &enc.ephemeral)))
            .collect();
        assert_eq!(
            combine_shares(&partials, &enc),
            Err(ThresholdError::InvalidCiphertext)
        );
    }

    #[test]
    fn threshold_many_shares_recover_plaintext() {
        let mut rng = OsRng;
        let out = key_generation(2, 3, &mut rng).unwrap();
        let enc = share_encrypt(&out.public_key, b"hello", &mut rng);

        let partials: Vec<(u32, BigUint)> = out.shares[..2]
            .iter()
            .map(|s| (s.index, share_decrypt(s, &enc.ephemeral)))
            .collect();
        let plaintext = combine_shares(&partials, &enc).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn single_share_fails_to_decrypt() {
        let mut rng = OsRng;
        let out = key_generation(2, 3, &mut rng).unwrap();
        let enc = share_encrypt(&out.public_key, b"hello", &mut rng);

        let partials: Vec<(u32, BigUint)> = out.shares[..1]
            .iter()
            .map(|s| (s.index, share_decrypt(s, &enc.ephemeral)))
            .collect();
        assert_eq!(
            combine_shares(&partials, &enc),
            Err(ThresholdError::DecryptionFailed)
        );
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let mut rng = OsRng;
        let out = key_generation(2, 3, &mut rng).unwrap();
        let enc = share_encrypt(&out.public_key, b"hello", &mut rng);
        let d0 = share_decrypt(&out.shares[0], &enc.ephemeral);
        let partials = vec![(1u32, d0.clone()), (1u32, d0)];
        assert_eq!(
            combine_shares(&partials, &enc),
            Err(ThresholdError::DuplicateShareIndex)
        );
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let mut rng = OsRng;
        assert_eq!(key_generation(0, 3, &mut rng).unwrap_err(), ThresholdError::InvalidThreshold);
        assert_eq!(key_generation(4, 3, &mut rng).unwrap_err(), ThresholdError::InvalidThreshold);
    }
}
