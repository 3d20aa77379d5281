//! Deterministic seed derivation, grounded on `original_source/seed/seed.go`.

use crate::curve::expand_message_xmd;
use crate::error::Result;
use crate::rand::Rng;
use rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte value from which a [`Rng`] or a further, domain-separated
/// `Seed` can be derived. Every dealer/receiver-side randomness draw in
/// this crate starts from a `Seed` rather than touching a system RNG
/// directly, so the whole protocol can be replayed deterministically
/// from one top-level seed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 32]);

impl Seed {
    /// `FromBytes`: routes raw input bytes through `expand_message_xmd`
    /// under a fixed domain separator rather than using them directly,
    /// matching `NewSeed(value, "ic-crypto-seed-from-bytes")`.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Seed::new("ic-crypto-seed-from-bytes", &bytes).expect("expand_message_xmd cannot fail for 32 bytes")
    }

    /// `NewSeed`: derives a seed from arbitrary input material under a
    /// domain separator via `expand_message_xmd`.
    pub fn new(domain_separator: &str, input: &[u8]) -> Result<Self> {
        let expanded = expand_message_xmd(input, domain_separator.as_bytes(), 32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&expanded);
        Ok(Seed(out))
    }

    pub fn from_randomness(randomness: &[u8], domain_separator: &str) -> Result<Self> {
        Seed::new(domain_separator, randomness)
    }

    pub fn from_rng(rng: &mut impl RngCore) -> Self {
        let mut out = [0u8; 32];
        rng.fill_bytes(&mut out);
        Seed(out)
    }

    /// Derives a child seed under an additional domain separator,
    /// matching `Seed.Derive`. Every subsystem (dealing polynomials,
    /// MEGa encryption, a complaint against a specific dealer, ...) uses
    /// its own derived seed so failures/replays in one don't affect
    /// another.
    pub fn derive(&self, domain_separator: &str) -> Self {
        Seed::new(domain_separator, &self.0).expect("expand_message_xmd cannot fail for 32 bytes")
    }

    /// A keystream RNG seeded from this value, matching `Seed.Rng`.
    pub fn rng(&self) -> Rng {
        Rng::new(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}
