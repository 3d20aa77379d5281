//! Dense polynomials over the scalar field, grounded on
//! `original_source/poly/poly.go`.

use crate::curve::Scalar;
use crate::error::{Error, Result};
use crate::rand::Rng;
use zeroize::Zeroize;

/// `coeffs[i]` is the coefficient of `x^i`; `coeffs[0]` is the constant
/// term (the shared secret, for a dealing polynomial).
#[derive(Clone, Zeroize)]
pub struct Polynomial {
    coeffs: Vec<Scalar>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<Scalar>) -> Self {
        Polynomial { coeffs }
    }

    pub fn zero(num_coefficients: usize) -> Self {
        Polynomial {
            coeffs: vec![Scalar::zero(); num_coefficients],
        }
    }

    /// A polynomial of degree `num_coefficients - 1` with every
    /// coefficient drawn independently at random.
    pub fn random(num_coefficients: usize, rng: &mut Rng) -> Self {
        let coeffs = (0..num_coefficients).map(|_| Scalar::random(rng)).collect();
        Polynomial { coeffs }
    }

    /// Like [`Polynomial::random`] but with the constant term fixed to
    /// `constant` (used when resharing a known secret).
    pub fn random_with_constant(constant: Scalar, num_coefficients: usize, rng: &mut Rng) -> Result<Self> {
        if num_coefficients == 0 {
            return Err(Error::InvalidArguments("polynomial needs at least one coefficient".into()));
        }
        let mut coeffs = Vec::with_capacity(num_coefficients);
        coeffs.push(constant);
        for _ in 1..num_coefficients {
            coeffs.push(Scalar::random(rng));
        }
        Ok(Polynomial { coeffs })
    }

    pub fn num_coefficients(&self) -> usize {
        self.coeffs.len()
    }

    pub fn coeff(&self, index: usize) -> Scalar {
        self.coeffs.get(index).copied().unwrap_or_else(Scalar::zero)
    }

    pub fn non_zero_coefficients(&self) -> usize {
        self.coeffs.iter().filter(|c| !bool::from(c.is_zero())).count()
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| bool::from(c.is_zero()))
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len).map(|i| self.coeff(i).add(&other.coeff(i))).collect();
        Polynomial { coeffs }
    }

    pub fn mul(&self, other: &Polynomial) -> Polynomial {
        if self.coeffs.is_empty() || other.coeffs.is_empty() {
            return Polynomial { coeffs: vec![] };
        }
        let mut coeffs = vec![Scalar::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = coeffs[i + j].add(&a.mul(b));
            }
        }
        Polynomial { coeffs }
    }

    pub fn mul_scalar(&self, scalar: &Scalar) -> Polynomial {
        Polynomial {
            coeffs: self.coeffs.iter().map(|c| c.mul(scalar)).collect(),
        }
    }

    /// Horner's method.
    pub fn evaluate_at(&self, x: &Scalar) -> Scalar {
        let mut acc = Scalar::zero();
        for coeff in self.coeffs.iter().rev() {
            acc = acc.mul(x).add(coeff);
        }
        acc
    }

    pub fn equal(&self, other: &Polynomial) -> bool {
        let len = self.coeffs.len().max(other.coeffs.len());
        (0..len).all(|i| self.coeff(i) == other.coeff(i))
    }

    /// Newton-form interpolation: builds up divided differences from
    /// `(x_i, y_i)` samples incrementally, matching `poly.go`'s
    /// `Interpolate`.
    pub fn interpolate(samples: &[(Scalar, Scalar)]) -> Result<Polynomial> {
        if samples.is_empty() {
            return Err(Error::InvalidArguments("no samples to interpolate".into()));
        }
        let n = samples.len();
        let mut divided_diffs: Vec<Scalar> = samples.iter().map(|(_, y)| *y).collect();
        for j in 1..n {
            for i in (j..n).rev() {
                let num = divided_diffs[i].sub(&divided_diffs[i - 1]);
                let den = samples[i].0.sub(&samples[i - j].0);
                let den_inv = den.invert()?;
                divided_diffs[i] = num.mul(&den_inv);
            }
        }

        // Expand the Newton form sum_j divided_diffs[j] * prod_{i<j}(x - x_i)
        // into monomial coefficients.
        let mut result = Polynomial::zero(1);
        let mut basis = Polynomial::new(vec![Scalar::one()]);
        result.coeffs[0] = divided_diffs[0];
        for j in 1..n {
            let neg_xj_minus_1 = samples[j - 1].0.negate();
            basis = basis.mul(&Polynomial::new(vec![neg_xj_minus_1, Scalar::one()]));
            let term = basis.mul_scalar(&divided_diffs[j]);
            result = result.add(&term);
        }
        Ok(result)
    }
}
