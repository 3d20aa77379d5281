//! Proof of discrete-log equivalence: given bases `g, h` and points
//! `gx = g*x`, `hx = h*x`, prove knowledge of the same `x` for both
//! without revealing it. Grounded on `original_source/zk/dlog.go`.
//!
//! Used by complaint construction/verification to prove a receiver's
//! shared secret with a dealer (`hx`) was derived from the same private
//! key as the receiver's public key (`gx`).

use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use crate::ro::RandomOracle;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

const DST: &str = "ic-crypto-tecdsa-zk-proof-of-dlog-eq";

#[derive(Clone, Serialize, Deserialize)]
pub struct DLogEquivalenceProof {
    challenge: Scalar,
    response: Scalar,
}

struct Instance {
    g: Point,
    h: Point,
    gx: Point,
    hx: Point,
}

impl Instance {
    fn from_witness(secret: &Scalar, g: Point, h: Point) -> Self {
        Instance {
            g,
            h,
            gx: g.scalar_mul(secret),
            hx: h.scalar_mul(secret),
        }
    }

    fn from_points(g: Point, h: Point, gx: Point, hx: Point) -> Self {
        Instance { g, h, gx, hx }
    }

    fn hash_to_challenge(&self, commitment_g: &Point, commitment_h: &Point, ad: &[u8]) -> Result<Scalar> {
        let mut ro = RandomOracle::new(DST);
        ro.add_bytes_string("associated_data", ad)?;
        ro.add_point("instance_g", &self.g)?;
        ro.add_point("instance_h", &self.h)?;
        ro.add_point("instance_g_x", &self.gx)?;
        ro.add_point("instance_h_x", &self.hx)?;
        ro.add_point("commitment1", commitment_g)?;
        ro.add_point("commitment2", commitment_h)?;
        ro.output_scalar()
    }

    fn recover_commitments(&self, proof: &DLogEquivalenceProof) -> (Point, Point) {
        let rg = self.g.scalar_mul(&proof.response).sub(&self.gx.scalar_mul(&proof.challenge));
        let rh = self.h.scalar_mul(&proof.response).sub(&self.hx.scalar_mul(&proof.challenge));
        (rg, rh)
    }
}

impl DLogEquivalenceProof {
    pub fn create(seed: &Seed, secret: &Scalar, g: Point, h: Point, associated_data: &[u8]) -> Result<Self> {
        let instance = Instance::from_witness(secret, g, h);
        let mut rng = seed.rng();
        let r = Scalar::random(&mut rng);
        let commitment_g = g.scalar_mul(&r);
        let commitment_h = h.scalar_mul(&r);
        let challenge = instance.hash_to_challenge(&commitment_g, &commitment_h, associated_data)?;
        let response = secret.mul(&challenge).add(&r);
        Ok(DLogEquivalenceProof { challenge, response })
    }

    pub fn verify(&self, g: Point, h: Point, gx: Point, hx: Point, associated_data: &[u8]) -> Result<()> {
        let instance = Instance::from_points(g, h, gx, hx);
        let (commitment_g, commitment_h) = instance.recover_commitments(self);
        let challenge = instance.hash_to_challenge(&commitment_g, &commitment_h, associated_data)?;
        if challenge == self.challenge {
            Ok(())
        } else {
            Err(Error::InvalidProof)
        }
    }
}
