//! Proof that a Pedersen commitment `A = g^s h^m` and a simple
//! commitment `B = g^s` open to the same secret `s`, without revealing
//! `s` or the Pedersen masking `m`. Grounded on
//! `original_source/zk/equal_opening.go`.
//!
//! Used when resharing an unmasked secret into a masked one: the dealer
//! must prove the masked share it is dealing now opens to the same
//! secret as the previously-published unmasked commitment.

use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use crate::ro::RandomOracle;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

pub const DST: &str = "ic-crypto-tecdsa-zk-proof-of-equal-openings";

#[derive(Clone, Serialize, Deserialize)]
pub struct EqualOpeningsProof {
    challenge: Scalar,
    response: Scalar,
}

struct Instance {
    g: Point,
    h: Point,
    a: Point,
    b: Point,
}

impl Instance {
    fn from_witness(secret: &Scalar, masking: &Scalar) -> Self {
        let g = Point::generator_g();
        let h = Point::generator_h();
        Instance {
            g,
            h,
            a: Point::pedersen(secret, masking),
            b: g.scalar_mul(secret),
        }
    }

    fn from_commitments(pedersen: Point, simple: Point) -> Self {
        Instance {
            g: Point::generator_g(),
            h: Point::generator_h(),
            a: pedersen,
            b: simple,
        }
    }

    fn hash_to_challenge(&self, commitment: &Point, ad: &[u8]) -> Result<Scalar> {
        let mut ro = RandomOracle::new(DST);
        ro.add_bytes_string("associated_data", ad)?;
        ro.add_point("instance_g", &self.g)?;
        ro.add_point("instance_h", &self.h)?;
        ro.add_point("instance_a", &self.a)?;
        ro.add_point("instance_b", &self.b)?;
        ro.add_point("commitment", commitment)?;
        ro.output_scalar()
    }

    /// `a - b = h^m`, so `h^response - (a-b)^challenge` recovers the
    /// commitment `h^r` the prover made to `r`.
    fn recover_commitment(&self, proof: &EqualOpeningsProof) -> Point {
        let a_minus_b = self.a.sub(&self.b);
        let challenged = a_minus_b.scalar_mul(&proof.challenge);
        self.h.scalar_mul(&proof.response).sub(&challenged)
    }
}

impl EqualOpeningsProof {
    pub fn create(seed: &Seed, secret: &Scalar, masking: &Scalar, associated_data: &[u8]) -> Result<Self> {
        let instance = Instance::from_witness(secret, masking);
        let mut rng = seed.rng();
        let r = Scalar::random(&mut rng);
        let commitment = instance.h.scalar_mul(&r);
        let challenge = instance.hash_to_challenge(&commitment, associated_data)?;
        let response = masking.mul(&challenge).add(&r);
        Ok(EqualOpeningsProof { challenge, response })
    }

    pub fn verify(&self, pedersen: Point, simple: Point, associated_data: &[u8]) -> Result<()> {
        let instance = Instance::from_commitments(pedersen, simple);
        let commitment = instance.recover_commitment(self);
        let challenge = instance.hash_to_challenge(&commitment, associated_data)?;
        if challenge == self.challenge {
            Ok(())
        } else {
            Err(Error::InvalidProof)
        }
    }
}
