//! Cryptographic core for a blockchain client: field and curve arithmetic
//! for BN254, BLS12-381, and Banderwagon; the BN254 optimal Ate pairing;
//! hash-to-curve; KZG opening verification; a Pedersen/IPA vector-commitment
//! scheme; a Feldman-verifiable threshold-ElGamal scheme; and the Merkle
//! tree structures and witness glue a shielded-transfer circuit needs.

pub mod banderwagon;
pub mod config;
pub mod curves;
pub mod error;
pub mod field;
pub mod hash_to_curve;
pub mod ipa;
pub mod kzg;
pub mod pairing;
pub mod shielded_glue;
pub mod threshold;
pub mod towers;
pub mod trees;

pub use error::{CoreError, Result};
