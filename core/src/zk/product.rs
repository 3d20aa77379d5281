//! Proof that a Pedersen-committed value `product` equals `lhs * rhs`,
//! for a publicly-committed `lhs` and Pedersen-committed `rhs`.
//! Grounded on `original_source/zk/product.go`.
//!
//! Used when dealing `UnmaskedTimesMaskedSecret` shares: the dealer
//! proves the share it is dealing is the product of two previously
//! dealt shares without revealing either factor.

use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use crate::ro::RandomOracle;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

const DST: &str = "ic-crypto-tecdsa-zk-proof-of-product";

#[derive(Clone, Serialize, Deserialize)]
pub struct ProductProof {
    challenge: Scalar,
    response1: Scalar,
    response2: Scalar,
}

struct Instance {
    g: Point,
    h: Point,
    lhs_com: Point,
    rhs_com: Point,
    product_com: Point,
}

impl Instance {
    fn from_witness(
        lhs: &Scalar,
        rhs: &Scalar,
        rhs_masking: &Scalar,
        product: &Scalar,
        product_masking: &Scalar,
    ) -> Self {
        let g = Point::generator_g();
        let h = Point::generator_h();
        Instance {
            g,
            h,
            lhs_com: g.scalar_mul(lhs),
            rhs_com: Point::pedersen(rhs, rhs_masking),
            product_com: Point::pedersen(product, product_masking),
        }
    }

    fn from_commitments(lhs_com: Point, rhs_com: Point, product_com: Point) -> Self {
        Instance {
            g: Point::generator_g(),
            h: Point::generator_h(),
            lhs_com,
            rhs_com,
            product_com,
        }
    }

    fn hash_to_challenge(&self, c1: &Point, c2: &Point, ad: &[u8]) -> Result<Scalar> {
        let mut ro = RandomOracle::new(DST);
        ro.add_bytes_string("associated_data", ad)?;
        ro.add_point("instance_g", &self.g)?;
        ro.add_point("instance_h", &self.h)?;
        ro.add_point("instance_lhs", &self.lhs_com)?;
        ro.add_point("instance_rhs", &self.rhs_com)?;
        ro.add_point("instance_product", &self.product_com)?;
        ro.add_point("commitment1", c1)?;
        ro.add_point("commitment2", c2)?;
        ro.output_scalar()
    }

    fn recover_commitments(&self, proof: &ProductProof) -> (Point, Point) {
        let r1_com = self
            .g
            .scalar_mul(&proof.response1)
            .sub(&self.lhs_com.scalar_mul(&proof.challenge));
        let r2_com = Point::mul_two(&self.rhs_com, &proof.response1, &self.h, &proof.response2)
            .sub(&self.product_com.scalar_mul(&proof.challenge));
        (r1_com, r2_com)
    }
}

impl ProductProof {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        seed: &Seed,
        lhs: &Scalar,
        rhs: &Scalar,
        rhs_masking: &Scalar,
        product: &Scalar,
        product_masking: &Scalar,
        associated_data: &[u8],
    ) -> Result<Self> {
        let instance = Instance::from_witness(lhs, rhs, rhs_masking, product, product_masking);
        let mut rng = seed.rng();
        let r1 = Scalar::random(&mut rng);
        let r1_com = instance.g.scalar_mul(&r1);
        let r2 = Scalar::random(&mut rng);
        let r2_com = Point::mul_two(&instance.rhs_com, &r1, &instance.h, &r2);
        let challenge = instance.hash_to_challenge(&r1_com, &r2_com, associated_data)?;
        let response1 = lhs.mul(&challenge).add(&r1);
        let response2 = product_masking.sub(&lhs.mul(rhs_masking)).mul(&challenge).add(&r2);
        Ok(ProductProof {
            challenge,
            response1,
            response2,
        })
    }

    pub fn verify(&self, lhs_com: Point, rhs_com: Point, product_com: Point, associated_data: &[u8]) -> Result<()> {
        let instance = Instance::from_commitments(lhs_com, rhs_com, product_com);
        let (r1_com, r2_com) = instance.recover_commitments(self);
        let challenge = instance.hash_to_challenge(&r1_com, &r2_com, associated_data)?;
        if challenge == self.challenge {
            Ok(())
        } else {
            Err(Error::InvalidProof)
        }
    }
}
