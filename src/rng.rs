//! Seedable random source for setups and atom placement.
//!
//! [`Mulberry32`] is a tiny 32-bit generator that the page also uses for its
//! seed-in-URL feature, so a seed typed into `#1234` reproduces the same rules
//! on both sides. It implements [`RngCore`], so everything in the crate takes a
//! plain `&mut impl Rng` and tests can pass any generator they like.

use rand::{Error, Rng, RngCore};

/// mulberry32: 32 bits of state, one add and two multiply/xorshift mixes per draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    const INCREMENT: u32 = 0x6D2B_79F5;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Fold a 64-bit host seed into 32 bits. JS seeds are doubles and often
    /// exceed `u32::MAX` (the page default is 3762108977281).
    pub fn seed_from_u64(seed: u64) -> Self {
        Self::new((seed as u32) ^ ((seed >> 32) as u32))
    }

    /// Seeded when `seed` is present, otherwise seeded from system entropy.
    pub fn seeded_or_entropy(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seed_from_u64(seed),
            None => Self::new(entropy_seed()),
        }
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // Through f64: u32 / 2^32 rounded to f32 can land on 1.0.
        (self.next_f64() as f32).min(1.0 - f32::EPSILON / 2.0)
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// A fresh 32-bit seed from system entropy (browser `crypto.getRandomValues`
/// on wasm32).
pub fn entropy_seed() -> u32 {
    rand::thread_rng().gen()
}
