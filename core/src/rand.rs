//! A small deterministic CSPRNG wrapper over ChaCha20, supplemented from
//! `original_source/rand/{chacha20,rand}.go`'s `Rand` interface. Spec.md
//! only requires `Seed::rng()` to exist; this gives the concrete draw
//! surface the rest of the crate actually calls.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;

/// A keystream-backed random source seeded from a [`crate::seed::Seed`].
///
/// Not `Send`/`Sync`-restricted beyond what `ChaCha20` itself is; every
/// draw simply XORs the next block of keystream onto a zeroed buffer.
pub struct Rng {
    cipher: ChaCha20,
}

impl Rng {
    pub(crate) fn new(key: [u8; 32]) -> Self {
        let nonce = [0u8; 12];
        let cipher = ChaCha20::new(&key.into(), &nonce.into());
        Rng { cipher }
    }

    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        out.iter_mut().for_each(|b| *b = 0);
        self.cipher.apply_keystream(out);
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    /// XORs the keystream directly onto `data` in place, matching
    /// `ChaCha20.XORKeyStream` in `original_source/rand/chacha20.go`.
    pub fn xor_key_stream(&mut self, data: &mut [u8]) {
        self.cipher.apply_keystream(data);
    }
}

impl rand_core::RngCore for Rng {
    fn next_u32(&mut self) -> u32 {
        Rng::next_u32(self)
    }
    fn next_u64(&mut self) -> u64 {
        Rng::next_u64(self)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        Rng::fill_bytes(self, dest)
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Rng::fill_bytes(self, dest);
        Ok(())
    }
}
