//! Threshold ECDSA signature shares and combination, grounded on
//! `original_source/sign/{share.go,sign.go,combined_sig.go}`.

pub mod combine;
pub mod share;

pub use combine::ThresholdEcdsaCombinedSigInternal;
pub use share::{derive_rho, DerivedRandomizer, ThresholdEcdsaSigShareInternal};

use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use crate::key::DerivationPath;

/// `ConvertHashToInteger` / `ScalarFromBytesWide`: reduces a big-endian
/// byte string modulo the group order by right-aligning it into a
/// 64-byte buffer before the wide reduction, matching
/// `curve.Scalar.FromBytesWide` applied to a zero-extended input.
pub(crate) fn hash_to_integer(bytes: &[u8]) -> Result<Scalar> {
    if bytes.len() > 64 {
        return Err(Error::InvalidArguments("hash is too long to convert to a scalar".into()));
    }
    let mut wide = [0u8; 64];
    wide[64 - bytes.len()..].copy_from_slice(bytes);
    Ok(Scalar::from_bytes_wide(&wide))
}

/// `DerivePublicKey`: applies a BIP32-style tweak to a master public
/// key, matching `sign.DerivePublicKey`.
pub fn derive_public_key(derivation_path: &DerivationPath, master_public_key: Point) -> Result<Point> {
    let (tweak, _chain_key) = derivation_path.derive_tweak(master_public_key)?;
    Ok(master_public_key.add(&Point::mul_by_g(&tweak)))
}
