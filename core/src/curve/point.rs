use crate::curve::hash_to_curve::hash_to_curve_ro;
use crate::curve::K256_CURVE_TAG;
use crate::curve::Scalar;
use crate::error::{Error, Result};
use elliptic_curve::group::GroupEncoding;
use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, ProjectivePoint};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use subtle::{Choice, ConstantTimeEq};

/// A secp256k1 curve point. Internally projective for cheap addition;
/// only normalized to affine on serialization/coordinate access.
///
/// Encoding (tag byte + coordinates) follows
/// `original_source/curve/encode.go`'s `Tag`/`EncodePoint`.
#[derive(Copy, Clone, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct Point(pub(crate) ProjectivePoint);

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Point(..)")
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}
impl Eq for Point {}

/// Domain separator used to derive the Pedersen second generator `H` via
/// hash-to-curve, so no one knows `log_G(H)`.
const GENERATOR_H_DST: &str = "ic-crypto-tecdsa-secp256k1-generator-h";

static GENERATOR_H: OnceLock<Point> = OnceLock::new();

impl Point {
    pub fn identity() -> Self {
        Point(ProjectivePoint::IDENTITY)
    }

    pub fn generator_g() -> Self {
        Point(ProjectivePoint::GENERATOR)
    }

    /// The second Pedersen generator `H`, a nothing-up-my-sleeve point
    /// with unknown discrete log relative to `G`.
    pub fn generator_h() -> Self {
        *GENERATOR_H.get_or_init(|| {
            hash_to_curve_ro(GENERATOR_H_DST.as_bytes(), b"h").expect("generator H derivation cannot fail")
        })
    }

    pub fn is_infinity(&self) -> bool {
        bool::from(self.0.ct_eq(&ProjectivePoint::IDENTITY))
    }

    pub fn add(&self, rhs: &Self) -> Self {
        Point(self.0 + rhs.0)
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        Point(self.0 - rhs.0)
    }

    pub fn negate(&self) -> Self {
        Point(-self.0)
    }

    pub fn scalar_mul(&self, scalar: &Scalar) -> Self {
        Point(self.0 * scalar.inner())
    }

    pub fn mul_by_g(scalar: &Scalar) -> Self {
        Point::generator_g().scalar_mul(scalar)
    }

    /// `g*a + h*b`, a two-point double-scalar multiplication used
    /// throughout the Pedersen/ZK code, matching `curve.Point.MulPoints`.
    pub fn mul_two(g: &Point, a: &Scalar, h: &Point, b: &Scalar) -> Self {
        g.scalar_mul(a).add(&h.scalar_mul(b))
    }

    pub fn pedersen(value: &Scalar, randomness: &Scalar) -> Self {
        Point::mul_two(&Point::generator_g(), value, &Point::generator_h(), randomness)
    }

    /// Affine x-coordinate, used when converting a curve point into the
    /// `r` component of an ECDSA signature.
    pub fn affine_x(&self) -> Result<[u8; 32]> {
        let affine = AffinePoint::from(self.0);
        let encoded = affine.to_encoded_point(false);
        let x = encoded
            .x()
            .ok_or_else(|| Error::InvalidArguments("point at infinity has no x".into()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(x.as_slice());
        Ok(out)
    }

    /// Bare SEC1 compressed encoding (33 bytes, no curve tag), matching
    /// `Secp256k1Point.Serialize`.
    pub fn to_compressed_bytes(self) -> Vec<u8> {
        let affine = AffinePoint::from(self.0);
        affine.to_encoded_point(true).as_bytes().to_vec()
    }

    /// SEC1 compressed encoding, prefixed with the curve tag byte,
    /// matching `Secp256k1Point.SerializeTagged`/`EncodePoint`'s compact
    /// form (tag byte `K256_CURVE_TAG`, then 33 compressed bytes).
    pub fn to_tagged_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(34);
        out.push(K256_CURVE_TAG);
        out.extend_from_slice(&self.to_compressed_bytes());
        out
    }

    pub fn from_tagged_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes[0] != K256_CURVE_TAG {
            return Err(Error::CurveMismatch);
        }
        let encoded_point = k256::EncodedPoint::from_bytes(&bytes[1..])
            .map_err(|_| Error::Encoding("malformed point encoding".into()))?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded_point))
            .ok_or_else(|| Error::Encoding("point not on curve".into()))?;
        Ok(Point(ProjectivePoint::from(affine)))
    }

    pub fn to_bytes_uncompressed(self) -> Vec<u8> {
        let affine = AffinePoint::from(self.0);
        affine.to_encoded_point(false).as_bytes().to_vec()
    }
}

impl From<Point> for Vec<u8> {
    fn from(p: Point) -> Self {
        p.to_tagged_bytes()
    }
}

impl TryFrom<Vec<u8>> for Point {
    type Error = Error;
    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Point::from_tagged_bytes(&bytes)
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::add(&self, &rhs)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::sub(&self, &rhs)
    }
}

/// Exposes `Choice`-bearing equality for constant-time call sites that
/// shouldn't branch on a plain `bool`.
pub fn ct_eq(a: &Point, b: &Point) -> Choice {
    a.0.ct_eq(&b.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::NodeIndex;

    #[test]
    fn tagged_serialize_deserialize_round_trips() {
        let p = Point::mul_by_g(&Scalar::from_u64(42));
        let bytes = p.to_tagged_bytes();
        assert_eq!(Point::from_tagged_bytes(&bytes).unwrap(), p);
    }

    #[test]
    fn mul_by_node_index_matches_scalar_mul_of_from_node_index() {
        let index = NodeIndex::new(3);
        let via_node_index = Point::generator_g().scalar_mul(&Scalar::from_node_index(index));
        let via_scalar_mul = Point::mul_by_g(&Scalar::from_node_index(index));
        assert_eq!(via_node_index, via_scalar_mul);
    }

    #[test]
    fn generator_h_is_the_nums_point_037bdcfc() {
        // hash_to_curve_ro("ic-crypto-tecdsa-secp256k1-generator-h", "h")
        // = 037bdcfc024cf697a41fd3cda2436c843af5669e50042be3314a532d5b70572f59
        let tagged = Point::generator_h().to_tagged_bytes();
        let hex = hex::encode(&tagged[1..]);
        assert_eq!(hex, "037bdcfc024cf697a41fd3cda2436c843af5669e50042be3314a532d5b70572f59");
        // Calling it twice must return the same cached point.
        assert_eq!(Point::generator_h(), Point::generator_h());
    }

    #[test]
    fn identity_is_detected() {
        assert!(Point::identity().is_infinity());
        assert!(!Point::generator_g().is_infinity());
    }

    #[test]
    fn from_tagged_bytes_rejects_wrong_curve_tag() {
        let mut bytes = Point::mul_by_g(&Scalar::one()).to_tagged_bytes();
        bytes[0] = 0xff;
        assert!(Point::from_tagged_bytes(&bytes).is_err());
    }

    #[test]
    fn pedersen_commitment_opens_with_matching_value_and_randomness() {
        let value = Scalar::from_u64(5);
        let randomness = Scalar::from_u64(9);
        let commitment = Point::pedersen(&value, &randomness);
        assert_eq!(commitment, Point::mul_two(&Point::generator_g(), &value, &Point::generator_h(), &randomness));
    }
}
