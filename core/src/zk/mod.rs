//! Non-interactive Sigma-protocol proofs used by dealings and
//! complaints. Each proof follows the same shape the teacher's
//! `pedersen/src/equality_protocol.rs` uses for its own Sigma proofs —
//! a `*_create`/`verify` pair around a random-oracle-derived Fiat-Shamir
//! challenge — adapted to return `crate::error::Result<()>` from
//! `verify` rather than a bare `bool`, so callers can propagate the
//! crate-wide error taxonomy instead of re-deriving one.

pub mod dlog_eq;
pub mod equal_openings;
pub mod product;

pub use dlog_eq::DLogEquivalenceProof;
pub use equal_openings::EqualOpeningsProof;
pub use product::ProductProof;
