//! Dealing construction and public verification, grounded on
//! `original_source/dealings/dealings.go`.
//!
//! The Go source's `NewIDkgDealingInternal` shadows `err` inside the
//! `ReshareOfMaskedSecret` branch (`if ciphertext, commitment, err =
//! ...; err != nil`, immediately followed by unconditionally
//! overwriting `err` again from the proof-creation call), so a real
//! encryption failure there could be silently dropped. The
//! implementation below threads every fallible step through `?`
//! instead.

use crate::commitment::{CommitmentOpening, PedersenCommitment, PolynomialCommitment, SimpleCommitment};
use crate::curve::NodeIndex;
use crate::error::{Error, Result};
use crate::idkg::secret_shares::SecretShares;
use crate::idkg::transcript::IDkgTranscriptOperation;
use crate::mega::{MEGaCiphertext, MEGaCiphertextPair, MEGaCiphertextSingle, MEGaPrivateKey, MEGaPublicKey};
use crate::poly::Polynomial;
use crate::seed::Seed;
use crate::zk::{EqualOpeningsProof, ProductProof};
use serde::{Deserialize, Serialize};

/// A proof accompanying a dealing whose secret shares are not
/// independently random: `MaskedResharing` proves a masked resharing
/// opens to the same value as its unmasked original; `Product` proves a
/// dealt value is the product of two earlier dealt values.
#[derive(Clone, Serialize, Deserialize)]
pub enum DealingProof {
    MaskedResharing(EqualOpeningsProof),
    Product(ProductProof),
}

#[derive(Clone, Serialize, Deserialize)]
pub struct IDkgDealingInternal {
    pub ciphertext: MEGaCiphertext,
    pub commitment: PolynomialCommitment,
    pub proof: Option<DealingProof>,
}

fn encrypt_and_commit_single(
    poly: &Polynomial,
    num_coefficients: usize,
    recipients: &[MEGaPublicKey],
    dealer_index: NodeIndex,
    associated_data: &[u8],
    seed: &Seed,
) -> Result<(MEGaCiphertext, PolynomialCommitment)> {
    let plaintexts: Vec<_> = (0..recipients.len())
        .map(|i| poly.evaluate_at(&crate::curve::Scalar::from_node_index(NodeIndex::new(i as u32))))
        .collect();
    let ciphertext = MEGaCiphertextSingle::encrypt(seed, &plaintexts, recipients, dealer_index, associated_data)?;
    let commitment = SimpleCommitment::create(poly, num_coefficients)?;
    Ok((MEGaCiphertext::Single(ciphertext), PolynomialCommitment::Simple(commitment)))
}

fn encrypt_and_commit_pair(
    values: &Polynomial,
    mask: &Polynomial,
    num_coefficients: usize,
    recipients: &[MEGaPublicKey],
    dealer_index: NodeIndex,
    associated_data: &[u8],
    seed: &Seed,
) -> Result<(MEGaCiphertext, PolynomialCommitment)> {
    let plaintexts: Vec<_> = (0..recipients.len())
        .map(|i| {
            let x = crate::curve::Scalar::from_node_index(NodeIndex::new(i as u32));
            (values.evaluate_at(&x), mask.evaluate_at(&x))
        })
        .collect();
    let ciphertext = MEGaCiphertextPair::encrypt(seed, &plaintexts, recipients, dealer_index, associated_data)?;
    let commitment = PedersenCommitment::create(values, mask, num_coefficients)?;
    Ok((MEGaCiphertext::Pair(ciphertext), PolynomialCommitment::Pedersen(commitment)))
}

impl IDkgDealingInternal {
    pub fn new(
        shares: &SecretShares,
        seed: &Seed,
        threshold: usize,
        recipients: &[MEGaPublicKey],
        dealer_index: NodeIndex,
        associated_data: &[u8],
    ) -> Result<Self> {
        if threshold == 0 || threshold > recipients.len() {
            return Err(Error::InvalidArguments("invalid threshold".into()));
        }
        let num_coefficients = threshold;
        let mut poly_rng = seed.derive("ic-crypto-tecdsa-create-dealing-polynomials").rng();
        let mega_seed = seed.derive("ic-crypto-tecdsa-create-dealing-mega-encrypt");

        let (ciphertext, commitment, proof) = match shares {
            SecretShares::Random => {
                let values = Polynomial::random(num_coefficients, &mut poly_rng);
                let mask = Polynomial::random(num_coefficients, &mut poly_rng);
                let (ct, cm) = encrypt_and_commit_pair(
                    &values,
                    &mask,
                    num_coefficients,
                    recipients,
                    dealer_index,
                    associated_data,
                    &mega_seed,
                )?;
                (ct, cm, None)
            }
            SecretShares::ReshareOfUnmasked(s1) => {
                let values = Polynomial::random_with_constant(*s1, num_coefficients, &mut poly_rng)?;
                let (ct, cm) = encrypt_and_commit_single(
                    &values,
                    num_coefficients,
                    recipients,
                    dealer_index,
                    associated_data,
                    &mega_seed,
                )?;
                (ct, cm, None)
            }
            SecretShares::ReshareOfMasked(s1, s2) => {
                let values = Polynomial::random_with_constant(*s1, num_coefficients, &mut poly_rng)?;
                let (ct, cm) = encrypt_and_commit_single(
                    &values,
                    num_coefficients,
                    recipients,
                    dealer_index,
                    associated_data,
                    &mega_seed,
                )?;
                let proof = EqualOpeningsProof::create(
                    &seed.derive(crate::zk::equal_openings::DST),
                    s1,
                    s2,
                    associated_data,
                )?;
                (ct, cm, Some(DealingProof::MaskedResharing(proof)))
            }
            SecretShares::UnmaskedTimesMasked {
                left,
                right_value,
                right_mask,
            } => {
                let product = left.mul(right_value);
                let product_masking = crate::curve::Scalar::random(&mut poly_rng);
                let values = Polynomial::random_with_constant(product, num_coefficients, &mut poly_rng)?;
                let mask = Polynomial::random_with_constant(product_masking, num_coefficients, &mut poly_rng)?;
                let (ct, cm) = encrypt_and_commit_pair(
                    &values,
                    &mask,
                    num_coefficients,
                    recipients,
                    dealer_index,
                    associated_data,
                    &mega_seed,
                )?;
                let proof = ProductProof::create(
                    &seed.derive("ic-crypto-tecdsa-zk-proof-of-product"),
                    left,
                    right_value,
                    right_mask,
                    &product,
                    &product_masking,
                    associated_data,
                )?;
                (ct, cm, Some(DealingProof::Product(proof)))
            }
        };

        Ok(IDkgDealingInternal {
            ciphertext,
            commitment,
            proof,
        })
    }

    /// Checks everything a non-recipient can check about a dealing:
    /// commitment shape, curve, ciphertext shape, and the accompanying
    /// ZK proof (if any) against the transcript operation it claims to
    /// support.
    pub fn publicly_verify(
        &self,
        operation: &IDkgTranscriptOperation,
        reconstruction_threshold: usize,
        dealer_index: NodeIndex,
        number_of_receivers: usize,
        associated_data: &[u8],
    ) -> Result<()> {
        if self.commitment.len() != reconstruction_threshold {
            tracing::warn!(dealer = dealer_index.as_u32(), "dealing has wrong commitment length");
            return Err(Error::InvalidCommitment);
        }
        self.ciphertext
            .check_validity(number_of_receivers, associated_data, dealer_index)?;

        match (operation, &self.proof) {
            (IDkgTranscriptOperation::Random, None) => Ok(()),
            (IDkgTranscriptOperation::ReshareOfUnmasked(_), None) => Ok(()),
            (IDkgTranscriptOperation::ReshareOfMasked(prior), Some(DealingProof::MaskedResharing(proof))) => {
                proof.verify(self.commitment.constant_term(), prior.constant_term(), associated_data)
            }
            (IDkgTranscriptOperation::UnmaskedTimesMasked(left, right), Some(DealingProof::Product(proof))) => {
                // Each dealer proves its freshly-dealt product share is
                // the product of *its own* shares of `left` and `right`
                // — i.e. the two input commitments evaluated at this
                // dealer's index, not their constant terms.
                let x = crate::curve::Scalar::from_node_index(dealer_index);
                proof.verify(
                    left.evaluate_at(&x),
                    right.evaluate_at(&x),
                    self.commitment.constant_term(),
                    associated_data,
                )
            }
            _ => {
                tracing::warn!(dealer = dealer_index.as_u32(), "dealing proof does not match transcript operation");
                Err(Error::InvalidProof)
            }
        }
    }

    /// Decrypts and checks this dealer's share for one receiver,
    /// returning the opening on success (used both by a receiver's
    /// private verification and by complaint generation).
    pub fn decrypt_and_check(
        &self,
        associated_data: &[u8],
        dealer_index: NodeIndex,
        receiver_index: NodeIndex,
        secret_key: &MEGaPrivateKey,
        public_key: &MEGaPublicKey,
    ) -> Result<CommitmentOpening> {
        match &self.ciphertext {
            MEGaCiphertext::Single(ct) => {
                let v = ct.decrypt_and_check(
                    &self.commitment,
                    associated_data,
                    dealer_index,
                    receiver_index,
                    secret_key,
                    public_key,
                )?;
                Ok(CommitmentOpening::Simple(v))
            }
            MEGaCiphertext::Pair(ct) => {
                let (v, m) = ct.decrypt_and_check(
                    &self.commitment,
                    associated_data,
                    dealer_index,
                    receiver_index,
                    secret_key,
                    public_key,
                )?;
                Ok(CommitmentOpening::Pedersen(v, m))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Point, Scalar};

    fn committee(n: u32, seed_byte: u8) -> (Vec<MEGaPrivateKey>, Vec<MEGaPublicKey>) {
        let secrets: Vec<_> = (0..n)
            .map(|i| MEGaPrivateKey::generate(&Seed::from_bytes([seed_byte.wrapping_add(i as u8); 32])))
            .collect();
        let publics = secrets.iter().map(MEGaPrivateKey::public_key).collect();
        (secrets, publics)
    }

    #[test]
    fn random_dealing_round_trips_for_every_receiver() {
        let (secrets, publics) = committee(3, 1);
        let dealing = IDkgDealingInternal::new(
            &SecretShares::Random,
            &Seed::from_bytes([100u8; 32]),
            2,
            &publics,
            NodeIndex::new(0),
            b"ad",
        )
        .unwrap();
        dealing
            .publicly_verify(&IDkgTranscriptOperation::Random, 2, NodeIndex::new(0), 3, b"ad")
            .unwrap();
        for i in 0..3u32 {
            let receiver = NodeIndex::new(i);
            dealing
                .decrypt_and_check(b"ad", NodeIndex::new(0), receiver, &secrets[i as usize], &publics[i as usize])
                .unwrap();
        }
    }

    #[test]
    fn reshare_of_unmasked_dealing_has_no_proof_and_publicly_verifies() {
        let (_secrets, publics) = committee(3, 10);
        let secret = Scalar::from_u64(555);
        let dealing = IDkgDealingInternal::new(
            &SecretShares::ReshareOfUnmasked(secret),
            &Seed::from_bytes([101u8; 32]),
            2,
            &publics,
            NodeIndex::new(0),
            b"ad",
        )
        .unwrap();
        assert!(dealing.proof.is_none());
        let parent = PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&secret)]));
        dealing
            .publicly_verify(&IDkgTranscriptOperation::ReshareOfUnmasked(parent), 2, NodeIndex::new(0), 3, b"ad")
            .unwrap();
    }

    #[test]
    fn reshare_of_masked_dealing_carries_an_equal_openings_proof() {
        let (_secrets, publics) = committee(3, 20);
        let secret = Scalar::from_u64(42);
        let masking = Scalar::from_u64(7);
        let dealing = IDkgDealingInternal::new(
            &SecretShares::ReshareOfMasked(secret, masking),
            &Seed::from_bytes([102u8; 32]),
            2,
            &publics,
            NodeIndex::new(0),
            b"ad",
        )
        .unwrap();
        assert!(matches!(dealing.proof, Some(DealingProof::MaskedResharing(_))));
        let prior = PolynomialCommitment::Pedersen(crate::commitment::PedersenCommitment::from_points(vec![Point::pedersen(
            &secret, &masking,
        )]));
        dealing
            .publicly_verify(&IDkgTranscriptOperation::ReshareOfMasked(prior), 2, NodeIndex::new(0), 3, b"ad")
            .unwrap();
    }

    #[test]
    fn unmasked_times_masked_dealing_carries_a_product_proof_verified_at_the_dealers_own_index() {
        let (_secrets, publics) = committee(3, 30);
        let left = Scalar::from_u64(6);
        let right_value = Scalar::from_u64(7);
        let right_mask = Scalar::from_u64(9);
        let dealer_index = NodeIndex::new(1);
        let dealing = IDkgDealingInternal::new(
            &SecretShares::UnmaskedTimesMasked { left, right_value, right_mask },
            &Seed::from_bytes([103u8; 32]),
            2,
            &publics,
            dealer_index,
            b"ad",
        )
        .unwrap();
        assert!(matches!(dealing.proof, Some(DealingProof::Product(_))));

        // A degree-1 commitment to `left`/`(right_value, right_mask)`
        // evaluated at the dealer's own index just recovers that same
        // point, matching the constant term.
        let left_commitment = PolynomialCommitment::Simple(SimpleCommitment::from_points(vec![Point::mul_by_g(&left)]));
        let right_commitment = PolynomialCommitment::Pedersen(crate::commitment::PedersenCommitment::from_points(vec![
            Point::pedersen(&right_value, &right_mask),
        ]));
        dealing
            .publicly_verify(
                &IDkgTranscriptOperation::UnmaskedTimesMasked(left_commitment, right_commitment),
                2,
                dealer_index,
                3,
                b"ad",
            )
            .unwrap();
    }

    #[test]
    fn publicly_verify_rejects_a_wrong_commitment_length() {
        let (_secrets, publics) = committee(3, 40);
        let dealing = IDkgDealingInternal::new(
            &SecretShares::Random,
            &Seed::from_bytes([104u8; 32]),
            2,
            &publics,
            NodeIndex::new(0),
            b"ad",
        )
        .unwrap();
        // Commitment has 2 coefficients; asking for threshold 3 must fail.
        let result = dealing.publicly_verify(&IDkgTranscriptOperation::Random, 3, NodeIndex::new(0), 3, b"ad");
        assert!(matches!(result, Err(Error::InvalidCommitment)));
    }

    #[test]
    fn decrypt_and_check_rejects_a_wrong_private_key() {
        let (_secrets, publics) = committee(3, 50);
        let (wrong_secrets, _wrong_publics) = committee(3, 60);
        let dealing = IDkgDealingInternal::new(
            &SecretShares::Random,
            &Seed::from_bytes([105u8; 32]),
            2,
            &publics,
            NodeIndex::new(0),
            b"ad",
        )
        .unwrap();
        let result = dealing.decrypt_and_check(b"ad", NodeIndex::new(0), NodeIndex::new(1), &wrong_secrets[1], &publics[1]);
        assert!(result.is_err());
    }
}
