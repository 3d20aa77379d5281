//! Signature share combination and verification, grounded on
//! `original_source/sign/combined_sig.go`.

use crate::curve::{NodeIndex, Point, Scalar};
use crate::error::{Error, Result};
use crate::key::DerivationPath;
use crate::lagrange::LagrangeCoefficients;
use crate::sign::hash_to_integer;
use crate::sign::share::ThresholdEcdsaSigShareInternal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A standard ECDSA signature `(r, s)` plus the `rho` value the shares
/// were constructed against, so a caller can recompute `r` without
/// redoing `DeriveRho`. `r` itself is kept implicit: callers that need
/// the wire signature recover it as `rho`'s originating x-coordinate is
/// already public from the presignature transcript.
#[derive(Clone, Serialize, Deserialize)]
pub struct ThresholdEcdsaCombinedSigInternal {
    pub r: Scalar,
    pub s: Scalar,
}

impl ThresholdEcdsaCombinedSigInternal {
    /// Lagrange-interpolates the numerator and denominator scalars (the
    /// Pedersen mask cancels at `x = 0` since every signing transcript
    /// is Interpolation-Pedersen) from `>= reconstruction_threshold`
    /// verified shares, then forms `sigma = numerator / denominator`
    /// and normalizes it to low-S.
    pub fn combine(
        reconstruction_threshold: usize,
        rho: Scalar,
        shares: &BTreeMap<NodeIndex, ThresholdEcdsaSigShareInternal>,
    ) -> Result<Self> {
        if shares.len() < reconstruction_threshold {
            return Err(Error::InsufficientOpenings {
                needed: reconstruction_threshold,
                have: shares.len(),
            });
        }

        let x_values: Vec<NodeIndex> = shares.keys().copied().take(reconstruction_threshold).collect();
        let coefficients = LagrangeCoefficients::at_zero(&x_values)?;

        let numerator_samples: Vec<Scalar> = shares
            .values()
            .take(reconstruction_threshold)
            .map(|s| s.numerator().map(|(v, _)| v))
            .collect::<Result<_>>()?;
        let denominator_samples: Vec<Scalar> = shares
            .values()
            .take(reconstruction_threshold)
            .map(|s| s.denominator().map(|(v, _)| v))
            .collect::<Result<_>>()?;

        let numerator = coefficients.interpolate_scalar(&numerator_samples)?;
        let denominator = coefficients.interpolate_scalar(&denominator_samples)?;

        let mut sigma = numerator.mul(&denominator.invert()?);
        if sigma.is_high() {
            sigma = sigma.negate();
        }

        if bool::from(sigma.is_zero()) || bool::from(rho.is_zero()) {
            return Err(Error::InvalidSignature);
        }

        Ok(ThresholdEcdsaCombinedSigInternal { r: rho, s: sigma })
    }

    /// Standard ECDSA verification against `master_public_key` tweaked
    /// by `derivation_path`: `rp = G*u1 + pubkey*u2`, accept iff `rp`'s
    /// affine x-coordinate reduces to `r`.
    pub fn verify(
        &self,
        hashed_message: &[u8],
        derivation_path: &DerivationPath,
        master_public_key: Point,
    ) -> Result<()> {
        if bool::from(self.r.is_zero()) || bool::from(self.s.is_zero()) || self.s.is_high() {
            return Err(Error::InvalidSignature);
        }

        let public_key = crate::sign::derive_public_key(derivation_path, master_public_key)?;
        let e = hash_to_integer(hashed_message)?;

        let s_inv = self.s.invert()?;
        let u1 = e.mul(&s_inv);
        let u2 = self.r.mul(&s_inv);

        let rp = Point::mul_two(&Point::generator_g(), &u1, &public_key, &u2);
        if rp.is_infinity() {
            return Err(Error::InvalidSignature);
        }

        let rp_x = hash_to_integer(&rp.affine_x()?)?;
        if rp_x == self.r {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::{CommitmentOpening, PedersenCommitment, PolynomialCommitment, SimpleCommitment};
    use crate::idkg::combined_commitment::CombinedCommitment;
    use crate::idkg::IDkgTranscriptInternal;
    use crate::sign::share::{derive_rho, ThresholdEcdsaSigShareInternal};

    fn simple_transcript(constant: Scalar) -> IDkgTranscriptInternal {
        IDkgTranscriptInternal {
            combined_commitment: CombinedCommitment::Interpolation(PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![
                Point::mul_by_g(&constant),
            ]))),
        }
    }

    fn pedersen_transcript(value: Scalar, mask: Scalar) -> IDkgTranscriptInternal {
        IDkgTranscriptInternal {
            combined_commitment: CombinedCommitment::Interpolation(PolynomialCommitment::Pedersen(PedersenCommitment::from_points(
                vec![Point::pedersen(&value, &mask)],
            ))),
        }
    }

    /// Builds a single degree-0 presignature scenario (every receiver's
    /// opening equals the constant term) and the resulting signature
    /// share, so `combine`/`verify` can be exercised end to end without
    /// threading a full multi-dealer round through this test.
    fn one_degree_zero_share(
        derivation_path: &DerivationPath,
        hashed_message: &[u8; 32],
        randomness: &[u8],
        signer: NodeIndex,
    ) -> (ThresholdEcdsaSigShareInternal, IDkgTranscriptInternal, Scalar) {
        let master_key = Scalar::from_u64(111);
        let key_transcript = simple_transcript(master_key);
        let kappa_transcript = simple_transcript(Scalar::from_u64(222));
        let lambda_opening = CommitmentOpening::Pedersen(Scalar::from_u64(5), Scalar::from_u64(6));
        let key_lambda_opening = CommitmentOpening::Pedersen(Scalar::from_u64(7), Scalar::from_u64(8));
        let kappa_lambda_opening = CommitmentOpening::Pedersen(Scalar::from_u64(9), Scalar::from_u64(10));

        let share = ThresholdEcdsaSigShareInternal::new(
            derivation_path,
            hashed_message,
            randomness,
            &key_transcript,
            &kappa_transcript,
            &lambda_opening,
            &key_lambda_opening,
            &kappa_lambda_opening,
        )
        .unwrap();
        share
            .verify(
                derivation_path,
                hashed_message,
                randomness,
                signer,
                &key_transcript,
                &kappa_transcript,
                &pedersen_transcript(Scalar::from_u64(5), Scalar::from_u64(6)),
                &pedersen_transcript(Scalar::from_u64(7), Scalar::from_u64(8)),
                &pedersen_transcript(Scalar::from_u64(9), Scalar::from_u64(10)),
            )
            .unwrap();
        (share, key_transcript, master_key)
    }

    #[test]
    fn combine_and_verify_round_trip_for_a_degree_zero_presignature() {
        let derivation_path = DerivationPath::new(vec![]);
        let hashed_message = [3u8; 32];
        let randomness = b"combine-test-randomness.........";

        let mut shares = BTreeMap::new();
        let mut key_transcript = None;
        let mut master_key = None;
        for signer in [NodeIndex::new(0), NodeIndex::new(1)] {
            let (share, kt, mk) = one_degree_zero_share(&derivation_path, &hashed_message, randomness, signer);
            shares.insert(signer, share);
            key_transcript = Some(kt);
            master_key = Some(mk);
        }
        let key_transcript = key_transcript.unwrap();
        let master_key = master_key.unwrap();
        let kappa_transcript = simple_transcript(Scalar::from_u64(222));

        let randomizer = derive_rho(&hashed_message, randomness, &derivation_path, &key_transcript, &kappa_transcript).unwrap();
        let signature = ThresholdEcdsaCombinedSigInternal::combine(1, randomizer.rho, &shares).unwrap();
        signature.verify(&hashed_message, &derivation_path, Point::mul_by_g(&master_key)).unwrap();
    }

    #[test]
    fn combine_rejects_fewer_shares_than_the_threshold() {
        let derivation_path = DerivationPath::new(vec![]);
        let hashed_message = [4u8; 32];
        let randomness = b"combine-insufficient-randomness.";
        let (share, _kt, _mk) = one_degree_zero_share(&derivation_path, &hashed_message, randomness, NodeIndex::new(0));
        let mut shares = BTreeMap::new();
        shares.insert(NodeIndex::new(0), share);
        let result = ThresholdEcdsaCombinedSigInternal::combine(2, Scalar::from_u64(1), &shares);
        assert!(matches!(result, Err(Error::InsufficientOpenings { needed: 2, have: 1 })));
    }

    #[test]
    fn verify_rejects_a_high_s_signature() {
        let mut high_s = Scalar::from_u64(1);
        while !high_s.is_high() {
            high_s = high_s.add(&high_s);
        }
        let signature = ThresholdEcdsaCombinedSigInternal {
            r: Scalar::from_u64(1),
            s: high_s,
        };
        let derivation_path = DerivationPath::new(vec![]);
        let master_public_key = Point::mul_by_g(&Scalar::from_u64(9));
        let result = signature.verify(&[0u8; 32], &derivation_path, master_public_key);
        assert!(matches!(result, Err(Error::InvalidSignature)));
    }
}
