//! How per-dealer commitments are folded into one transcript
//! commitment, grounded on `original_source/dealings/combined_commitment.go`.

use crate::commitment::PolynomialCommitment;
use crate::curve::{Point, Scalar};
use serde::{Deserialize, Serialize};

/// `Summation` adds every dealer's commitment together (used for
/// `Random` transcripts, where every dealer independently contributes
/// to the final secret). `Interpolation` instead treats each dealer's
/// commitment as one sample of a degree-`<threshold` polynomial and
/// interpolates the combined commitment at zero (used for resharing
/// and for `UnmaskedTimesMasked`, where only `threshold` dealers'
/// shares of the same pre-existing secret(s) are needed).
#[derive(Clone, Serialize, Deserialize)]
pub enum CombinedCommitment {
    Summation(PolynomialCommitment),
    Interpolation(PolynomialCommitment),
}

impl CombinedCommitment {
    pub fn constant_term(&self) -> Point {
        match self {
            CombinedCommitment::Summation(c) => c.constant_term(),
            CombinedCommitment::Interpolation(c) => c.constant_term(),
        }
    }

    pub fn evaluate_at(&self, x: &Scalar) -> Point {
        match self {
            CombinedCommitment::Summation(c) => c.evaluate_at(x),
            CombinedCommitment::Interpolation(c) => c.evaluate_at(x),
        }
    }

    pub fn inner(&self) -> &PolynomialCommitment {
        match self {
            CombinedCommitment::Summation(c) => c,
            CombinedCommitment::Interpolation(c) => c,
        }
    }
}
