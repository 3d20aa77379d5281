//! Curve abstraction layer (L0).
//!
//! `Curve` exists so the rest of the crate is written against named
//! associated types rather than concrete `k256` types directly. There
//! is only one implementor, [`K256`]; a second curve is a non-goal.

mod field;
mod hash_to_curve;
mod point;
mod scalar;

pub use field::FieldElement;
pub use hash_to_curve::{expand_message_xmd, hash_to_curve_ro, hash_to_scalar};
pub use point::Point;
pub use scalar::Scalar;

use serde::{Deserialize, Serialize};

/// Tag byte identifying a curve on the wire, matching
/// `original_source/curve/types.go`'s `EccCurveType`.
pub const K256_CURVE_TAG: u8 = 1;

/// A 1-based participant index (dealer or receiver), kept distinct from
/// a raw scalar so the two can't be swapped at a call site.
///
/// Supplemented from `original_source/curve/types.go`'s `NodeIndex`,
/// which spec.md's prose refers to only informally as "receiver index".
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub fn new(index: u32) -> Self {
        NodeIndex(index)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// The curve this crate implements everything over.
pub trait Curve: Copy + Eq + std::fmt::Debug {
    /// Wire tag for this curve, as in `original_source/curve/types.go`.
    const TAG: u8;

    /// Human-readable name, for error messages and logging.
    const NAME: &'static str;
}

/// secp256k1, the only curve this crate implements.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct K256;

impl Curve for K256 {
    const TAG: u8 = K256_CURVE_TAG;
    const NAME: &'static str = "secp256k1";
}
