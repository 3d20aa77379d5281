//! Polynomial commitments (Feldman-style `Simple` and Pedersen),
//! grounded on `original_source/poly/commitment.go`.

use crate::curve::{K256_CURVE_TAG, NodeIndex, Point, Scalar};
use crate::error::{Error, Result};
use crate::poly::Polynomial;
use serde::{Deserialize, Serialize};

/// What a dealer reveals to let receivers check their share without
/// learning the secret: `Simple` for an unmasked (publicly verifiable)
/// sharing, `Pedersen` when the shares themselves must stay hidden.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum CommitmentOpening {
    Simple(Scalar),
    Pedersen(Scalar, Scalar),
}

/// Horner's method evaluated directly on commitment points, matching
/// `poly.go`'s `evaluateAt`.
fn evaluate_at(points: &[Point], x: &Scalar) -> Point {
    let mut acc = Point::identity();
    for p in points.iter().rev() {
        acc = acc.scalar_mul(x).add(p);
    }
    acc
}

#[derive(Clone)]
pub struct SimpleCommitment {
    points: Vec<Point>,
}

impl SimpleCommitment {
    /// `points[i] = G * poly.coeff(i)`.
    pub fn create(poly: &Polynomial, num_coefficients: usize) -> Result<Self> {
        if poly.num_coefficients() != num_coefficients {
            return Err(Error::InvalidArguments("coefficient count mismatch".into()));
        }
        let points = (0..num_coefficients)
            .map(|i| Point::mul_by_g(&poly.coeff(i)))
            .collect();
        Ok(SimpleCommitment { points })
    }

    /// Builds a commitment directly from already-computed points, used
    /// when combining dealers' commitments via interpolation.
    pub fn from_points(points: Vec<Point>) -> Self {
        SimpleCommitment { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn constant_term(&self) -> Point {
        self.points[0]
    }

    pub fn evaluate_at(&self, x: &Scalar) -> Point {
        evaluate_at(&self.points, x)
    }

    pub fn check_opening(&self, receiver_index: NodeIndex, opening: &Scalar) -> bool {
        let expected = self.evaluate_at(&Scalar::from_node_index(receiver_index));
        expected == Point::mul_by_g(opening)
    }

    pub fn add(&self, other: &SimpleCommitment) -> Result<Self> {
        if self.points.len() != other.points.len() {
            return Err(Error::InvalidCommitment);
        }
        let points = self.points.iter().zip(&other.points).map(|(a, b)| a.add(b)).collect();
        Ok(SimpleCommitment { points })
    }

    pub fn stable_representation(&self) -> Vec<u8> {
        let mut out = vec![b'S', K256_CURVE_TAG];
        for p in &self.points {
            out.extend_from_slice(&p.to_compressed_bytes());
        }
        out
    }
}

#[derive(Clone)]
pub struct PedersenCommitment {
    points: Vec<Point>,
}

impl PedersenCommitment {
    /// `points[i] = Pedersen(values.coeff(i), mask.coeff(i))`.
    pub fn create(values: &Polynomial, mask: &Polynomial, num_coefficients: usize) -> Result<Self> {
        if values.num_coefficients() != num_coefficients || mask.num_coefficients() != num_coefficients {
            return Err(Error::InvalidArguments("coefficient count mismatch".into()));
        }
        let points = (0..num_coefficients)
            .map(|i| Point::pedersen(&values.coeff(i), &mask.coeff(i)))
            .collect();
        Ok(PedersenCommitment { points })
    }

    /// Builds a commitment directly from already-computed points, used
    /// when combining dealers' commitments via interpolation.
    pub fn from_points(points: Vec<Point>) -> Self {
        PedersenCommitment { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn constant_term(&self) -> Point {
        self.points[0]
    }

    pub fn evaluate_at(&self, x: &Scalar) -> Point {
        evaluate_at(&self.points, x)
    }

    pub fn check_opening(&self, receiver_index: NodeIndex, value: &Scalar, mask: &Scalar) -> bool {
        let expected = self.evaluate_at(&Scalar::from_node_index(receiver_index));
        expected == Point::pedersen(value, mask)
    }

    pub fn add(&self, other: &PedersenCommitment) -> Result<Self> {
        if self.points.len() != other.points.len() {
            return Err(Error::InvalidCommitment);
        }
        let points = self.points.iter().zip(&other.points).map(|(a, b)| a.add(b)).collect();
        Ok(PedersenCommitment { points })
    }

    pub fn stable_representation(&self) -> Vec<u8> {
        let mut out = vec![b'P', K256_CURVE_TAG];
        for p in &self.points {
            out.extend_from_slice(&p.to_compressed_bytes());
        }
        out
    }
}

/// A polynomial commitment of either kind, as stored in a dealing.
#[derive(Clone)]
pub enum PolynomialCommitment {
    Simple(SimpleCommitment),
    Pedersen(PedersenCommitment),
}

impl PolynomialCommitment {
    pub fn len(&self) -> usize {
        match self {
            PolynomialCommitment::Simple(c) => c.len(),
            PolynomialCommitment::Pedersen(c) => c.len(),
        }
    }

    pub fn constant_term(&self) -> Point {
        match self {
            PolynomialCommitment::Simple(c) => c.constant_term(),
            PolynomialCommitment::Pedersen(c) => c.constant_term(),
        }
    }

    pub fn evaluate_at(&self, x: &Scalar) -> Point {
        match self {
            PolynomialCommitment::Simple(c) => c.evaluate_at(x),
            PolynomialCommitment::Pedersen(c) => c.evaluate_at(x),
        }
    }

    pub fn check_opening(&self, receiver_index: NodeIndex, opening: &CommitmentOpening) -> bool {
        match (self, opening) {
            (PolynomialCommitment::Simple(c), CommitmentOpening::Simple(s)) => c.check_opening(receiver_index, s),
            (PolynomialCommitment::Pedersen(c), CommitmentOpening::Pedersen(v, m)) => {
                c.check_opening(receiver_index, v, m)
            }
            _ => false,
        }
    }

    pub fn add(&self, other: &PolynomialCommitment) -> Result<Self> {
        match (self, other) {
            (PolynomialCommitment::Simple(a), PolynomialCommitment::Simple(b)) => {
                Ok(PolynomialCommitment::Simple(a.add(b)?))
            }
            (PolynomialCommitment::Pedersen(a), PolynomialCommitment::Pedersen(b)) => {
                Ok(PolynomialCommitment::Pedersen(a.add(b)?))
            }
            _ => Err(Error::InvalidCommitment),
        }
    }

    pub fn stable_representation(&self) -> Vec<u8> {
        match self {
            PolynomialCommitment::Simple(c) => c.stable_representation(),
            PolynomialCommitment::Pedersen(c) => c.stable_representation(),
        }
    }
}
