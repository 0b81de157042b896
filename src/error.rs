//! Crate-wide error taxonomy. Each component raises one of these variants
//! directly or through a local enum with a `#[from]` conversion.

use thiserror::Error;

/// Errors surfaced by any operation in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("input has wrong length: expected {expected}, got {actual}")]
    InputSize { expected: usize, actual: usize },

    #[error("value out of range for its modulus")]
    Range,

    #[error("point is not on the curve or not in the prime-order subgroup")]
    NotOnCurve,

    #[error("verification failed")]
    VerificationFailure,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to combine shares: {0}")]
    Combine(String),

    #[error("decryption failed")]
    Decryption,

    #[error("structure at capacity")]
    Capacity,
}

impl From<crate::ipa::IpaError> for CoreError {
    fn from(e: crate::ipa::IpaError) -> Self {
        match e {
            crate::ipa::IpaError::LengthMismatch { expected, actual } => {
                CoreError::InputSize { expected, actual }
            }
            crate::ipa::IpaError::NotPowerOfTwo(_) => CoreError::Range,
            crate::ipa::IpaError::BadProof => CoreError::VerificationFailure,
            crate::ipa::IpaError::EmptyInput => CoreError::Range,
        }
    }
}

impl From<crate::threshold::ThresholdError> for CoreError {
    fn from(e: crate::threshold::ThresholdError) -> Self {
        match e {
            crate::threshold::ThresholdError::InvalidThreshold => {
                CoreError::Config("invalid threshold parameters".into())
            }
            crate::threshold::ThresholdError::InsufficientShares => {
                CoreError::Combine("insufficient shares".into())
            }
            crate::threshold::ThresholdError::DuplicateShareIndex => {
                CoreError::Combine("duplicate share index".into())
            }
            crate::threshold::ThresholdError::InvalidShare => CoreError::VerificationFailure,
            crate::threshold::ThresholdError::DecryptionFailed => CoreError::Decryption,
            crate::threshold::ThresholdError::InvalidCiphertext => {
                CoreError::InputSize { expected: 0, actual: 0 }
            }
        }
    }
}

impl From<crate::trees::TreeError> for CoreError {
    fn from(e: crate::trees::TreeError) -> Self {
        match e {
            crate::trees::TreeError::Full => CoreError::Capacity,
            crate::trees::TreeError::IndexOutOfRange => CoreError::Range,
        }
    }
}

impl From<crate::kzg::KzgError> for CoreError {
    fn from(e: crate::kzg::KzgError) -> Self {
        match e {
            crate::kzg::KzgError::UncompressedUnsupported => {
                CoreError::Config("uncompressed G1 encoding is not supported".into())
            }
            crate::kzg::KzgError::MalformedInfinity => CoreError::Range,
            crate::kzg::KzgError::CoordinateNotReduced => CoreError::Range,
            crate::kzg::KzgError::NotASquare => CoreError::NotOnCurve,
            crate::kzg::KzgError::NotInSubgroup => CoreError::NotOnCurve,
        }
    }
}

impl From<crate::hash_to_curve::HashToCurveError> for CoreError {
    fn from(e: crate::hash_to_curve::HashToCurveError) -> Self {
        match e {
            crate::hash_to_curve::HashToCurveError::InvalidDst(len) => {
                CoreError::Config(format!("DST must be 1..=255 bytes, got {len}"))
            }
            crate::hash_to_curve::HashToCurveError::OutputTooLong => CoreError::Range,
            crate::hash_to_curve::HashToCurveError::Mapping(msg) => CoreError::Config(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
