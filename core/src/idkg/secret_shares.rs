//! What a dealer is sharing, grounded on
//! `original_source/dealings/secret_shares.go`.

use crate::curve::Scalar;

/// The four ways a dealing can come about. `Random` dealings back a
/// freshly generated key or pre-signature; the resharing variants
/// re-deal an already-committed secret (e.g. rotating the receiver
/// set); `UnmaskedTimesMasked` deals the product of two earlier shares
/// (used for the presignature's lambda * kappa step).
pub enum SecretShares {
    Random,
    ReshareOfUnmasked(Scalar),
    ReshareOfMasked(Scalar, Scalar),
    UnmaskedTimesMasked {
        left: Scalar,
        right_value: Scalar,
        right_mask: Scalar,
    },
}
