use crate::curve::{NodeIndex, K256_CURVE_TAG};
use crate::error::{Error, Result};
use crate::rand::Rng;
use elliptic_curve::bigint::{Encoding, U256, U512};
use elliptic_curve::ops::Reduce;
use elliptic_curve::scalar::IsHigh;
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// A secp256k1 scalar (an element of the order-`n` field).
///
/// Wraps `k256::Scalar`; arithmetic and encoding follow
/// `original_source/curve/k256_scalar.go`.
#[derive(Copy, Clone, Serialize, Deserialize)]
#[serde(into = "[u8; 32]", try_from = "[u8; 32]")]
pub struct Scalar(pub(crate) k256::Scalar);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0 = k256::Scalar::ZERO;
    }
}

impl std::fmt::Debug for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Scalar(..)")
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}
impl Eq for Scalar {}

impl Scalar {
    pub fn zero() -> Self {
        Scalar(k256::Scalar::ZERO)
    }

    pub fn one() -> Self {
        Scalar(k256::Scalar::ONE)
    }

    pub fn from_u64(x: u64) -> Self {
        Scalar(k256::Scalar::from(x))
    }

    /// `curve.Scalar.FromNodeIndex` in `original_source/curve/scalar.go`,
    /// which evaluates a polynomial at `index + 1` so node index 0 is
    /// never the same evaluation point as the secret's constant term.
    pub fn from_node_index(index: NodeIndex) -> Self {
        Scalar::from_u64(u64::from(index.as_u32()) + 1)
    }

    /// Reduce a wide (64-byte) big-endian buffer modulo the group order,
    /// as `curve.Scalar.FromBytesWide` does.
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Self {
        let wide = U512::from_be_slice(bytes);
        Scalar(k256::Scalar::reduce(wide))
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let repr: k256::FieldBytes = (*bytes).into();
        Option::<k256::Scalar>::from(k256::Scalar::from_repr(repr))
            .map(Scalar)
            .ok_or_else(|| Error::Encoding("scalar out of range".into()))
    }

    /// Deserialize a scalar that was serialized with a leading curve tag
    /// byte, per `Secp256k1Scalar.SerializeTagged`.
    pub fn from_tagged_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 33 {
            return Err(Error::Encoding("bad tagged scalar length".into()));
        }
        if bytes[0] != K256_CURVE_TAG {
            return Err(Error::CurveMismatch);
        }
        let mut raw = [0u8; 32];
        raw.copy_from_slice(&bytes[1..]);
        Scalar::from_bytes(&raw)
    }

    pub fn random(rng: &mut Rng) -> Self {
        // Rejection sampling, matching `curve.Scalar.Random`: draw 32
        // bytes, reject and redraw on range failure or on zero.
        loop {
            let mut buf = [0u8; 32];
            rng.fill_bytes(&mut buf);
            if let Ok(s) = Scalar::from_bytes(&buf) {
                if !bool::from(s.is_zero()) {
                    return s;
                }
            }
        }
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    pub fn to_tagged_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(33);
        out.push(K256_CURVE_TAG);
        out.extend_from_slice(&self.to_bytes());
        out
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Scalar(self.0 + rhs.0)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        Scalar(self.0 - rhs.0)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        Scalar(self.0 * rhs.0)
    }

    pub fn negate(&self) -> Self {
        Scalar(-self.0)
    }

    /// Panics are never used here for domain errors: a non-invertible
    /// (zero) scalar is only ever reached through a programming error
    /// in this crate, not through attacker-controlled input, since every
    /// public entry point validates non-zero-ness first.
    pub fn invert(&self) -> Result<Self> {
        Option::<k256::Scalar>::from(self.0.invert())
            .map(Scalar)
            .ok_or(Error::InvalidArguments("scalar is not invertible".into()))
    }

    pub fn is_zero(&self) -> Choice {
        self.0.ct_eq(&k256::Scalar::ZERO)
    }

    /// `s > n/2`, as `original_source/curve/k256_scalar.go`'s `IsHigh`
    /// computes before its trailing dead-code `return true`.
    pub fn is_high(&self) -> bool {
        self.0.is_high().into()
    }

    pub fn c_assign(&mut self, other: &Self, choice: Choice) {
        self.0.conditional_assign(&other.0, choice);
    }

    pub(crate) fn inner(&self) -> &k256::Scalar {
        &self.0
    }
}

impl From<Scalar> for [u8; 32] {
    fn from(s: Scalar) -> Self {
        s.to_bytes()
    }
}

impl TryFrom<[u8; 32]> for Scalar {
    type Error = Error;
    fn try_from(bytes: [u8; 32]) -> Result<Self> {
        Scalar::from_bytes(&bytes)
    }
}
