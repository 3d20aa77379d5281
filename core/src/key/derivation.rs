//! BIP32-style non-hardened public-key derivation, grounded on
//! `original_source/key/key_derivation.go`.

use crate::curve::{Point, Scalar};
use crate::error::Result;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// An arbitrary-length big-endian byte string identifying one level of
/// a derivation path. `next()` treats it as a big-endian integer and
/// increments it, growing by one byte on overflow — used to retry a
/// derivation level when the HMAC output is out of range or yields the
/// identity point.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DerivationIndex(pub Vec<u8>);

impl DerivationIndex {
    pub fn new(bytes: Vec<u8>) -> Self {
        DerivationIndex(bytes)
    }

    pub fn next(&self) -> Self {
        let mut bytes = self.0.clone();
        for b in bytes.iter_mut().rev() {
            if *b == 0xff {
                *b = 0;
            } else {
                *b += 1;
                return DerivationIndex(bytes);
            }
        }
        let mut out = Vec::with_capacity(bytes.len() + 1);
        out.push(1u8);
        out.extend(bytes);
        DerivationIndex(out)
    }
}

/// A chain of [`DerivationIndex`] levels, applied left to right.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DerivationPath {
    path: Vec<DerivationIndex>,
}

impl DerivationPath {
    pub fn new(path: Vec<DerivationIndex>) -> Self {
        DerivationPath { path }
    }

    /// A path built from plain BIP32-style `u32` indices.
    pub fn new_bip32(indices: &[u32]) -> Self {
        let path = indices.iter().map(|i| DerivationIndex(i.to_be_bytes().to_vec())).collect();
        DerivationPath { path }
    }

    /// Derives the additive tweak and new chain key for `master_public_key`
    /// by walking every level of this path, matching
    /// `DerivationPath.DeriveTweak`.
    pub fn derive_tweak(&self, master_public_key: Point) -> Result<(Scalar, [u8; 32])> {
        let mut chain_key = [0u8; 32];
        let mut current_key = master_public_key;
        let mut derived_offset = Scalar::zero();
        for index in &self.path {
            let (key_offset, new_chain_key, new_key) = ckdpub(current_key, chain_key, index)?;
            derived_offset = derived_offset.add(&key_offset);
            chain_key = new_chain_key;
            current_key = new_key;
        }
        Ok((derived_offset, chain_key))
    }
}

/// One level of child-public-key derivation (`CKDpub`). On overflow (the
/// HMAC output's first 32 bytes don't encode a valid scalar) or on the
/// derived point landing on the identity, this completely redoes the
/// level with `index.next()` — the rejected attempt's offset is
/// discarded, not accumulated. This resolves the Go source's
/// overflow-retry code, whose recursive call on rejection
/// (`ckdpub(pk, chainKey, index.Next())`) discards its own return value
/// at the call site, making the retry's result unreachable there.
fn ckdpub(pk: Point, chain_key: [u8; 32], index: &DerivationIndex) -> Result<(Scalar, [u8; 32], Point)> {
    let mut index = index.clone();
    loop {
        let mut mac = <HmacSha512 as Mac>::new_from_slice(&chain_key)
            .expect("HMAC-SHA512 accepts any key length");
        mac.update(&pk.to_compressed_bytes());
        mac.update(&index.0);
        let result = mac.finalize().into_bytes();

        let mut il = [0u8; 32];
        il.copy_from_slice(&result[..32]);
        let mut ir = [0u8; 32];
        ir.copy_from_slice(&result[32..]);

        let key_offset = match Scalar::from_bytes(&il) {
            Ok(s) if !bool::from(s.is_zero()) => s,
            _ => {
                index = index.next();
                continue;
            }
        };

        let new_key = pk.add(&Point::mul_by_g(&key_offset));
        if new_key.is_infinity() {
            index = index.next();
            continue;
        }

        return Ok((key_offset, ir, new_key));
    }
}
