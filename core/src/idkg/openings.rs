//! Opening combination: reconstructing a receiver's share of a combined
//! transcript from its per-dealer openings, grounded on
//! `original_source/dealings/transcript.go`'s combination logic,
//! applied to openings instead of commitments.

use crate::commitment::CommitmentOpening;
use crate::curve::{NodeIndex, Scalar};
use crate::error::{Error, Result};
use crate::idkg::combined_commitment::CombinedCommitment;
use crate::idkg::transcript::IDkgTranscriptInternal;
use crate::lagrange::LagrangeCoefficients;
use std::collections::BTreeMap;

fn interpolate_openings(eval_point: &Scalar, x_values: &[NodeIndex], openings: &[CommitmentOpening]) -> Result<CommitmentOpening> {
    let coefficients = LagrangeCoefficients::at_value(eval_point, x_values)?;
    if openings.iter().all(|o| matches!(o, CommitmentOpening::Simple(_))) {
        let ys: Result<Vec<Scalar>> = openings
            .iter()
            .map(|o| match o {
                CommitmentOpening::Simple(v) => Ok(*v),
                CommitmentOpening::Pedersen(_, _) => Err(Error::InvalidCommitment),
            })
            .collect();
        Ok(CommitmentOpening::Simple(coefficients.interpolate_scalar(&ys?)?))
    } else {
        let mut values = Vec::with_capacity(openings.len());
        let mut masks = Vec::with_capacity(openings.len());
        for opening in openings {
            match opening {
                CommitmentOpening::Pedersen(v, m) => {
                    values.push(*v);
                    masks.push(*m);
                }
                CommitmentOpening::Simple(_) => return Err(Error::InvalidCommitment),
            }
        }
        Ok(CommitmentOpening::Pedersen(
            coefficients.interpolate_scalar(&values)?,
            coefficients.interpolate_scalar(&masks)?,
        ))
    }
}

fn add_openings(a: &CommitmentOpening, b: &CommitmentOpening) -> Result<CommitmentOpening> {
    match (a, b) {
        (CommitmentOpening::Simple(x), CommitmentOpening::Simple(y)) => Ok(CommitmentOpening::Simple(x.add(y))),
        (CommitmentOpening::Pedersen(xv, xm), CommitmentOpening::Pedersen(yv, ym)) => {
            Ok(CommitmentOpening::Pedersen(xv.add(yv), xm.add(ym)))
        }
        _ => Err(Error::InvalidCommitment),
    }
}

/// Reconstructs `receiver_index`'s share of a single dealer's
/// polynomial from `>= threshold` other receivers' own decrypted
/// openings of that same dealer. Used when a receiver's own ciphertext
/// from that dealer failed private verification but third parties
/// supplied their openings in response to a complaint.
pub fn recover_share_from_sub_openings(
    receiver_index: NodeIndex,
    threshold: usize,
    sub_openings: &BTreeMap<NodeIndex, CommitmentOpening>,
) -> Result<CommitmentOpening> {
    if sub_openings.len() < threshold {
        return Err(Error::InsufficientOpenings {
            needed: threshold,
            have: sub_openings.len(),
        });
    }
    let x_values: Vec<NodeIndex> = sub_openings.keys().copied().take(threshold).collect();
    let openings: Vec<CommitmentOpening> = sub_openings.values().take(threshold).cloned().collect();
    interpolate_openings(&Scalar::from_node_index(receiver_index), &x_values, &openings)
}

/// Combines one receiver's per-dealer openings (each either directly
/// decrypted or recovered via [`recover_share_from_sub_openings`]) into
/// that receiver's share of the transcript, following the transcript's
/// combination flavor, and checks the result against the transcript's
/// commitment before returning it.
pub fn combine_openings(
    transcript: &IDkgTranscriptInternal,
    receiver_index: NodeIndex,
    reconstruction_threshold: usize,
    dealer_openings: &BTreeMap<NodeIndex, CommitmentOpening>,
) -> Result<CommitmentOpening> {
    if dealer_openings.len() < reconstruction_threshold {
        return Err(Error::InsufficientOpenings {
            needed: reconstruction_threshold,
            have: dealer_openings.len(),
        });
    }

    let combined = match &transcript.combined_commitment {
        CombinedCommitment::Summation(_) => {
            let mut iter = dealer_openings.values();
            let mut acc = iter
                .next()
                .cloned()
                .ok_or_else(|| Error::InsufficientOpenings {
                    needed: reconstruction_threshold,
                    have: 0,
                })?;
            for opening in iter {
                acc = add_openings(&acc, opening)?;
            }
            acc
        }
        CombinedCommitment::Interpolation(_) => {
            let x_values: Vec<NodeIndex> = dealer_openings.keys().copied().take(reconstruction_threshold).collect();
            let openings: Vec<CommitmentOpening> = dealer_openings.values().take(reconstruction_threshold).cloned().collect();
            interpolate_openings(&Scalar::zero(), &x_values, &openings)?
        }
    };

    if transcript.combined_commitment.inner().check_opening(receiver_index, &combined) {
        Ok(combined)
    } else {
        Err(Error::InvalidCommitment)
    }
}
