//! Dealing, transcript, and complaint state machine (L5), grounded on
//! `original_source/dealings/*.go` and `original_source/complaints/complaints.go`.

pub mod combined_commitment;
pub mod complaints;
pub mod dealings;
pub mod openings;
pub mod secret_shares;
pub mod transcript;

pub use combined_commitment::CombinedCommitment;
pub use complaints::IDkgComplaintInternal;
pub use dealings::{DealingProof, IDkgDealingInternal};
pub use openings::{combine_openings, recover_share_from_sub_openings};
pub use secret_shares::SecretShares;
pub use transcript::{IDkgTranscriptInternal, IDkgTranscriptOperation};
