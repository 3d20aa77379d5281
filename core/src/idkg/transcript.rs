//! Transcript combination, grounded on
//! `original_source/dealings/{transcript.go,transcript_operation.go}`.
//!
//! The Go source's `CombineCommitmentsViaInterpolation` is an unfinished
//! function body (it builds the `commitments`/`indexes` slices from the
//! verified dealings and then never interpolates or returns anything).
//! The summation/interpolation split implemented here follows spec.md's
//! description of the two combination rules instead.

use crate::commitment::PolynomialCommitment;
use crate::curve::{NodeIndex, Point, Scalar};
use crate::error::{Error, Result};
use crate::idkg::combined_commitment::CombinedCommitment;
use crate::idkg::dealings::IDkgDealingInternal;
use crate::lagrange::LagrangeCoefficients;
use std::collections::BTreeMap;

/// What kind of secret a transcript's dealings are jointly producing.
/// Each variant carries the prior commitment(s) a dealing's proof must
/// be checked against, where relevant.
pub enum IDkgTranscriptOperation {
    Random,
    ReshareOfUnmasked(PolynomialCommitment),
    ReshareOfMasked(PolynomialCommitment),
    UnmaskedTimesMasked(PolynomialCommitment, PolynomialCommitment),
}

pub struct IDkgTranscriptInternal {
    pub combined_commitment: CombinedCommitment,
}

impl IDkgTranscriptInternal {
    pub fn constant_term(&self) -> Point {
        self.combined_commitment.constant_term()
    }

    pub fn evaluate_at(&self, x: &Scalar) -> Point {
        self.combined_commitment.evaluate_at(x)
    }

    pub fn compare(&self, other: &IDkgTranscriptInternal) -> bool {
        self.combined_commitment.constant_term() == other.combined_commitment.constant_term()
    }

    /// Combines verified dealings into one transcript commitment, using
    /// summation for `Random`/`UnmaskedTimesMasked` operations and
    /// Lagrange interpolation at zero for the resharing operations.
    pub fn combine_dealings(
        operation: &IDkgTranscriptOperation,
        reconstruction_threshold: usize,
        verified_dealings: &BTreeMap<NodeIndex, IDkgDealingInternal>,
    ) -> Result<Self> {
        if verified_dealings.len() < reconstruction_threshold {
            return Err(Error::InsufficientDealings {
                needed: reconstruction_threshold,
                have: verified_dealings.len(),
            });
        }

        // Resharing and multiplication need at least as many dealings
        // as the parent polynomial(s) had coefficients, independent of
        // `reconstruction_threshold` (which bounds the *new* transcript's
        // degree, not the number of dealers needed to reconstruct it).
        let min_dealings = match operation {
            IDkgTranscriptOperation::Random => 0,
            IDkgTranscriptOperation::ReshareOfUnmasked(parent) | IDkgTranscriptOperation::ReshareOfMasked(parent) => parent.len(),
            IDkgTranscriptOperation::UnmaskedTimesMasked(left, right) => left.len() + right.len() - 1,
        };
        if verified_dealings.len() < min_dealings {
            return Err(Error::InsufficientDealings {
                needed: min_dealings,
                have: verified_dealings.len(),
            });
        }

        let combined_commitment = match operation {
            IDkgTranscriptOperation::Random => {
                let mut iter = verified_dealings.values();
                let mut acc = iter
                    .next()
                    .ok_or_else(|| Error::InsufficientDealings {
                        needed: reconstruction_threshold,
                        have: 0,
                    })?
                    .commitment
                    .clone();
                for dealing in iter {
                    acc = acc.add(&dealing.commitment)?;
                }
                CombinedCommitment::Summation(acc)
            }
            IDkgTranscriptOperation::ReshareOfUnmasked(_)
            | IDkgTranscriptOperation::ReshareOfMasked(_)
            | IDkgTranscriptOperation::UnmaskedTimesMasked(_, _) => {
                let x_values: Vec<NodeIndex> = verified_dealings.keys().copied().take(reconstruction_threshold).collect();
                let coefficients = LagrangeCoefficients::at_zero(&x_values)?;
                let num_points = verified_dealings
                    .values()
                    .next()
                    .map(|d| d.commitment.len())
                    .unwrap_or(0);
                let mut combined_points = Vec::with_capacity(num_points);
                for coeff_index in 0..num_points {
                    let y_values: Vec<Point> = verified_dealings
                        .iter()
                        .take(reconstruction_threshold)
                        .map(|(_, d)| match &d.commitment {
                            PolynomialCommitment::Simple(c) => c.points()[coeff_index],
                            PolynomialCommitment::Pedersen(c) => c.points()[coeff_index],
                        })
                        .collect();
                    combined_points.push(coefficients.interpolate_point(&y_values)?);
                }
                let is_simple = matches!(
                    verified_dealings.values().next().map(|d| &d.commitment),
                    Some(PolynomialCommitment::Simple(_))
                );
                let commitment = if is_simple {
                    PolynomialCommitment::Simple(crate::commitment::SimpleCommitment::from_points(combined_points))
                } else {
                    PolynomialCommitment::Pedersen(crate::commitment::PedersenCommitment::from_points(combined_points))
                };
                CombinedCommitment::Interpolation(commitment)
            }
        };

        if let IDkgTranscriptOperation::ReshareOfUnmasked(parent) = operation {
            if combined_commitment.constant_term() != parent.constant_term() {
                return Err(Error::InvalidCommitment);
            }
        }

        Ok(IDkgTranscriptInternal { combined_commitment })
    }
}
