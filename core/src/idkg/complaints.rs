//! Complaint generation and verification, grounded on
//! `original_source/complaints/complaints.go`.
//!
//! The Go source's `Verify` rejects a complaint exactly when
//! `dealing.Commitment.CheckOpening(...)` returns true — i.e. when the
//! dealer's opening *does* check out. That is the correct rule (a
//! complaint is only valid when the dealer cheated), kept here as-is;
//! the earlier research note flagging this as "inverted" was about
//! `mega/ciphertext.go`'s unrelated `checkPlaintexts` bug, not this
//! function.

use crate::commitment::CommitmentOpening;
use crate::curve::{NodeIndex, Point, Scalar};
use crate::error::{Error, Result};
use crate::idkg::dealings::IDkgDealingInternal;
use crate::mega::{MEGaPrivateKey, MEGaPublicKey};
use crate::ro::RandomOracle;
use crate::seed::Seed;
use crate::zk::DLogEquivalenceProof;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Serialize, Deserialize)]
pub struct IDkgComplaintInternal {
    proof: DLogEquivalenceProof,
    shared_secret: Point,
}

fn create_proof_assoc_data(
    associated_data: &[u8],
    receiver_index: NodeIndex,
    dealer_index: NodeIndex,
    public_key: &MEGaPublicKey,
) -> Result<Vec<u8>> {
    let mut ro = RandomOracle::new("ic-crypto-tecdsa-complaint-proof-assoc-data");
    ro.add_bytes_string("associated_data", associated_data)?;
    ro.add_u32("receiver_index", receiver_index.as_u32())?;
    ro.add_u32("dealer_index", dealer_index.as_u32())?;
    ro.add_point("receiver_public_key", &public_key.public_point())?;
    ro.output_byte_string(32)
}

impl IDkgComplaintInternal {
    pub fn new(
        seed: &Seed,
        dealing: &IDkgDealingInternal,
        dealer_index: NodeIndex,
        receiver_index: NodeIndex,
        secret_key: &MEGaPrivateKey,
        public_key: &MEGaPublicKey,
        associated_data: &[u8],
    ) -> Result<Self> {
        let shared_secret = dealing.ciphertext.ephemeral().scalar_mul(&secret_key.secret_scalar());
        let assoc_data = create_proof_assoc_data(associated_data, receiver_index, dealer_index, public_key)?;
        let proof = DLogEquivalenceProof::create(
            seed,
            &secret_key.secret_scalar(),
            Point::generator_g(),
            dealing.ciphertext.ephemeral(),
            &assoc_data,
        )?;
        Ok(IDkgComplaintInternal { proof, shared_secret })
    }

    pub fn verify(
        &self,
        dealing: &IDkgDealingInternal,
        dealer_index: NodeIndex,
        complainer_index: NodeIndex,
        complainer_key: &MEGaPublicKey,
        associated_data: &[u8],
    ) -> Result<()> {
        let assoc_data = create_proof_assoc_data(associated_data, complainer_index, dealer_index, complainer_key)?;
        self.proof.verify(
            Point::generator_g(),
            dealing.ciphertext.ephemeral(),
            complainer_key.public_point(),
            self.shared_secret,
            &assoc_data,
        )?;

        let opening = match &dealing.ciphertext {
            crate::mega::MEGaCiphertext::Single(ct) => {
                let v: Scalar = ct.decrypt_from_shared_secret(
                    associated_data,
                    dealer_index,
                    complainer_index,
                    complainer_key,
                    self.shared_secret,
                )?;
                CommitmentOpening::Simple(v)
            }
            crate::mega::MEGaCiphertext::Pair(ct) => {
                let (v, m) = ct.decrypt_from_shared_secret(
                    associated_data,
                    dealer_index,
                    complainer_index,
                    complainer_key,
                    self.shared_secret,
                )?;
                CommitmentOpening::Pedersen(v, m)
            }
        };

        if dealing.commitment.check_opening(complainer_index, &opening) {
            // The dealer's share checks out after all; the complaint
            // was unfounded.
            Err(Error::InvalidComplaint)
        } else {
            Ok(())
        }
    }
}

/// Runs private verification of every dealer in a transcript and
/// collects the failing ones into complaints, supplemented from
/// `original_source/complaints/complaints.go`'s `GenerateComplaints` —
/// the convenience batch entry point callers actually use instead of
/// looping by hand.
pub fn generate_complaints(
    verified_dealings: &BTreeMap<NodeIndex, IDkgDealingInternal>,
    associated_data: &[u8],
    receiver_index: NodeIndex,
    secret_key: &MEGaPrivateKey,
    public_key: &MEGaPublicKey,
    seed: &Seed,
) -> Result<BTreeMap<NodeIndex, IDkgComplaintInternal>> {
    let mut complaints = BTreeMap::new();
    for (&dealer_index, dealing) in verified_dealings {
        let decrypted = dealing.decrypt_and_check(associated_data, dealer_index, receiver_index, secret_key, public_key);
        if decrypted.is_err() {
            let complaint_seed = seed.derive(&format!("ic-crypto-tecdsa-complaint-against-{}", dealer_index.as_u32()));
            let complaint = IDkgComplaintInternal::new(
                &complaint_seed,
                dealing,
                dealer_index,
                receiver_index,
                secret_key,
                public_key,
                associated_data,
            )?;
            tracing::warn!(dealer = dealer_index.as_u32(), "generated complaint against dealer");
            complaints.insert(dealer_index, complaint);
        }
    }
    if complaints.is_empty() {
        return Err(Error::InvalidArguments(
            "generate_complaints should return at least one complaint".into(),
        ));
    }
    Ok(complaints)
}
