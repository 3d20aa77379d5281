//! Signature share generation and verification, grounded on
//! `original_source/sign/share.go`.

use crate::commitment::CommitmentOpening;
use crate::curve::{NodeIndex, Point, Scalar};
use crate::error::{Error, Result};
use crate::idkg::{CombinedCommitment, IDkgTranscriptInternal};
use crate::key::DerivationPath;
use crate::ro::RandomOracle;
use crate::sign::hash_to_integer;
use serde::{Deserialize, Serialize};

/// The quantities produced by `DeriveRho`: the x-coordinate-derived
/// challenge `rho` used to fold the presignature into the share
/// formulas, the BIP32 tweak on the master public key, the fresh
/// randomizer `rand` blinding the presignature, and the resulting
/// chain key (carried along for callers that continue the derivation
/// path, unused by signing itself).
pub struct DerivedRandomizer {
    pub rho: Scalar,
    pub tweak: Scalar,
    pub rand: Scalar,
    pub chain_key: [u8; 32],
}

/// `DeriveRho`: rerandomizes the Interpolation-Simple presignature
/// transcript's constant term with a fresh random-oracle scalar, then
/// folds its affine x-coordinate down to a scalar the way ECDSA's `r`
/// component is derived from a nonce point.
pub fn derive_rho(
    hashed_message: &[u8],
    randomness: &[u8],
    derivation_path: &DerivationPath,
    key_transcript: &IDkgTranscriptInternal,
    kappa_transcript: &IDkgTranscriptInternal,
) -> Result<DerivedRandomizer> {
    if !matches!(
        kappa_transcript.combined_commitment,
        CombinedCommitment::Interpolation(crate::commitment::PolynomialCommitment::Simple(_))
    ) {
        return Err(Error::InvalidCommitment);
    }

    let presig = kappa_transcript.constant_term();
    let (tweak, chain_key) = derivation_path.derive_tweak(key_transcript.constant_term())?;

    let mut ro = RandomOracle::new("ic-crypto-tecdsa-rerandomize-presig");
    ro.add_bytes_string("randomness", randomness)?;
    ro.add_bytes_string("hashed_message", hashed_message)?;
    ro.add_point("presig", &presig)?;
    ro.add_scalar("tweak", &tweak)?;
    let rand = ro.output_scalar()?;

    let randomized_presig = presig.add(&Point::mul_by_g(&rand));
    let rho = hash_to_integer(&randomized_presig.affine_x()?)?;

    Ok(DerivedRandomizer { rho, tweak, rand, chain_key })
}

fn pedersen_parts(opening: &CommitmentOpening) -> Result<(Scalar, Scalar)> {
    match opening {
        CommitmentOpening::Pedersen(v, m) => Ok((*v, *m)),
        CommitmentOpening::Simple(_) => Err(Error::InvalidCommitment),
    }
}

/// One node's contribution towards a combined signature: Pedersen
/// openings of the numerator and denominator of `sigma = numerator /
/// denominator`, matching `sign.ThresholdEcdsaSigShareInternal`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ThresholdEcdsaSigShareInternal {
    sigma_numerator: CommitmentOpening,
    sigma_denominator: CommitmentOpening,
}

impl ThresholdEcdsaSigShareInternal {
    /// Builds a signature share for node `j`, given this node's share
    /// openings of the `lambda`, `key*lambda`, and `kappa*lambda`
    /// transcripts (each a Pedersen opening obtained from that
    /// transcript's opening-combination step).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        derivation_path: &DerivationPath,
        hashed_message: &[u8],
        randomness: &[u8],
        key_transcript: &IDkgTranscriptInternal,
        kappa_transcript: &IDkgTranscriptInternal,
        lambda_opening: &CommitmentOpening,
        key_times_lambda_opening: &CommitmentOpening,
        kappa_times_lambda_opening: &CommitmentOpening,
    ) -> Result<Self> {
        let (lambda_v, lambda_m) = pedersen_parts(lambda_opening)?;
        let (key_lambda_v, key_lambda_m) = pedersen_parts(key_times_lambda_opening)?;
        let (kappa_lambda_v, kappa_lambda_m) = pedersen_parts(kappa_times_lambda_opening)?;

        let randomizer = derive_rho(hashed_message, randomness, derivation_path, key_transcript, kappa_transcript)?;
        let e = hash_to_integer(hashed_message)?;
        let theta = e.add(&randomizer.rho.mul(&randomizer.tweak));

        let numerator_v = theta.mul(&lambda_v).add(&randomizer.rho.mul(&key_lambda_v));
        let numerator_m = theta.mul(&lambda_m).add(&randomizer.rho.mul(&key_lambda_m));

        let denominator_v = randomizer.rand.mul(&lambda_v).add(&kappa_lambda_v);
        let denominator_m = randomizer.rand.mul(&lambda_m).add(&kappa_lambda_m);

        Ok(ThresholdEcdsaSigShareInternal {
            sigma_numerator: CommitmentOpening::Pedersen(numerator_v, numerator_m),
            sigma_denominator: CommitmentOpening::Pedersen(denominator_v, denominator_m),
        })
    }

    /// Recomputes the expected numerator/denominator commitments from
    /// the transcripts evaluated at `signer_index` and checks this
    /// share's openings against them.
    #[allow(clippy::too_many_arguments)]
    pub fn verify(
        &self,
        derivation_path: &DerivationPath,
        hashed_message: &[u8],
        randomness: &[u8],
        signer_index: NodeIndex,
        key_transcript: &IDkgTranscriptInternal,
        kappa_transcript: &IDkgTranscriptInternal,
        lambda_transcript: &IDkgTranscriptInternal,
        key_times_lambda_transcript: &IDkgTranscriptInternal,
        kappa_times_lambda_transcript: &IDkgTranscriptInternal,
    ) -> Result<()> {
        let randomizer = derive_rho(hashed_message, randomness, derivation_path, key_transcript, kappa_transcript)?;
        let e = hash_to_integer(hashed_message)?;
        let theta = e.add(&randomizer.rho.mul(&randomizer.tweak));

        let x = Scalar::from_node_index(signer_index);
        let lambda_point = lambda_transcript.evaluate_at(&x);
        let key_lambda_point = key_times_lambda_transcript.evaluate_at(&x);
        let kappa_lambda_point = kappa_times_lambda_transcript.evaluate_at(&x);

        let expected_numerator = lambda_point.scalar_mul(&theta).add(&key_lambda_point.scalar_mul(&randomizer.rho));
        let expected_denominator = lambda_point.scalar_mul(&randomizer.rand).add(&kappa_lambda_point);

        let (num_v, num_m) = pedersen_parts(&self.sigma_numerator)?;
        let (den_v, den_m) = pedersen_parts(&self.sigma_denominator)?;

        if expected_numerator == Point::pedersen(&num_v, &num_m) && expected_denominator == Point::pedersen(&den_v, &den_m) {
            Ok(())
        } else {
            Err(Error::InvalidProof)
        }
    }

    pub(crate) fn numerator(&self) -> Result<(Scalar, Scalar)> {
        pedersen_parts(&self.sigma_numerator)
    }

    pub(crate) fn denominator(&self) -> Result<(Scalar, Scalar)> {
        pedersen_parts(&self.sigma_denominator)
    }
}
