//! Crate-wide error taxonomy.

use thiserror::Error;

/// Errors produced anywhere in the threshold-ECDSA core.
///
/// Primitives (field/scalar/point arithmetic, the random oracle) never
/// attempt to recover from a malformed input; they return one of these
/// variants and let the caller decide what to do. At the dealing layer
/// an error is fatal only for the dealing it was raised for — a
/// transcript is still combined from whichever dealings verified.
#[derive(Debug, Error)]
pub enum Error {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("curve mismatch")]
    CurveMismatch,

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid commitment")]
    InvalidCommitment,

    #[error("invalid proof")]
    InvalidProof,

    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("insufficient dealings: need {needed}, have {have}")]
    InsufficientDealings { needed: usize, have: usize },

    #[error("insufficient openings: need {needed}, have {have}")]
    InsufficientOpenings { needed: usize, have: usize },

    #[error("invalid complaint")]
    InvalidComplaint,

    #[error("invalid signature")]
    InvalidSignature,
}

pub type Result<T> = core::result::Result<T, Error>;
