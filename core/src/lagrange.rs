//! Lagrange interpolation coefficients, grounded on
//! `original_source/poly/lagrange.go`.

use crate::curve::{NodeIndex, Point, Scalar};
use crate::error::{Error, Result};

/// The coefficients `c_0, ..., c_{k-1}` such that
/// `f(eval_point) = sum_i c_i * f(x_i)` for any degree-`< k` polynomial
/// `f`, given the sample x-coordinates `x_0, ..., x_{k-1}`.
pub struct LagrangeCoefficients {
    coefficients: Vec<Scalar>,
}

impl LagrangeCoefficients {
    pub fn new(coefficients: Vec<Scalar>) -> Self {
        LagrangeCoefficients { coefficients }
    }

    pub fn coefficients(&self) -> &[Scalar] {
        &self.coefficients
    }

    fn check_for_duplicates(x_values: &[NodeIndex]) -> Result<()> {
        let mut sorted = x_values.to_vec();
        sorted.sort_by_key(|n| n.as_u32());
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::InvalidArguments("duplicate x-coordinate in Lagrange samples".into()));
        }
        Ok(())
    }

    /// Coefficients for evaluating at `eval_point`, from the receiver
    /// indices `x_values` (each converted to its node-index scalar via
    /// [`Scalar::from_node_index`]). Uses the two-pass prefix/suffix
    /// product algorithm from `lagrange.go`'s `AtValue`.
    pub fn at_value(eval_point: &Scalar, x_values: &[NodeIndex]) -> Result<Self> {
        Self::check_for_duplicates(x_values)?;
        let xs: Vec<Scalar> = x_values.iter().map(|n| Scalar::from_node_index(*n)).collect();
        let n = xs.len();
        if n == 0 {
            return Err(Error::InvalidArguments("no samples to interpolate".into()));
        }

        // numerator[i] = prod_{j != i} (eval_point - x_j), computed via a
        // forward pass of prefix products and a backward pass of suffix
        // products multiplied together.
        let mut prefix = vec![Scalar::one(); n + 1];
        for i in 0..n {
            prefix[i + 1] = prefix[i].mul(&eval_point.sub(&xs[i]));
        }
        let mut suffix = vec![Scalar::one(); n + 1];
        for i in (0..n).rev() {
            suffix[i] = suffix[i + 1].mul(&eval_point.sub(&xs[i]));
        }

        let mut coefficients = Vec::with_capacity(n);
        for i in 0..n {
            let numerator = prefix[i].mul(&suffix[i + 1]);
            let mut denominator = Scalar::one();
            for (j, xj) in xs.iter().enumerate() {
                if i != j {
                    denominator = denominator.mul(&xs[i].sub(xj));
                }
            }
            let coeff = numerator.mul(&denominator.invert()?);
            coefficients.push(coeff);
        }
        Ok(LagrangeCoefficients { coefficients })
    }

    /// Coefficients for evaluating at zero (the constant term), the
    /// common case used to reconstruct a shared secret or combine
    /// signature shares.
    pub fn at_zero(x_values: &[NodeIndex]) -> Result<Self> {
        Self::at_value(&Scalar::zero(), x_values)
    }

    pub fn interpolate_scalar(&self, y_values: &[Scalar]) -> Result<Scalar> {
        if y_values.len() != self.coefficients.len() {
            return Err(Error::InvalidArguments("sample count mismatch".into()));
        }
        let mut acc = Scalar::zero();
        for (c, y) in self.coefficients.iter().zip(y_values) {
            acc = acc.add(&c.mul(y));
        }
        Ok(acc)
    }

    pub fn interpolate_point(&self, y_values: &[Point]) -> Result<Point> {
        if y_values.len() != self.coefficients.len() {
            return Err(Error::InvalidArguments("sample count mismatch".into()));
        }
        let mut acc = Point::identity();
        for (c, y) in self.coefficients.iter().zip(y_values) {
            acc = acc.add(&y.scalar_mul(c));
        }
        Ok(acc)
    }
}
