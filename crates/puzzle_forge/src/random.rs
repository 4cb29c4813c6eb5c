//! Seeded random source shared by every generation step.
//!
//! A [`Seed`] (text or number) is mixed into a 64-bit state that seeds [`rand::rngs::StdRng`].
//! Generation helpers take `&mut dyn RngCore`, so one [`PuzzleRng`] stream is consumed in a
//! fixed traversal order and a given seed always reproduces the same puzzle.
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seed used when a configuration does not name one.
pub const DEFAULT_SEED_TEXT: &str = "DREIZACKEN";

const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Seed for a puzzle generation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seed {
    Text(String),
    Number(u64),
}

impl Seed {
    /// Collapse the seed into the 64-bit value fed to the generator.
    pub fn to_u64(&self) -> u64 {
        match self {
            Seed::Text(text) => seed_from_text(text),
            Seed::Number(n) => mix_u64(*n),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Text(DEFAULT_SEED_TEXT.to_owned())
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_owned())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::Number(value)
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seed::Text(text) => write!(f, "\"{text}\""),
            Seed::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Hash a text seed with FNV-1a and finalize it with a splitmix64 mixer.
pub fn seed_from_text(text: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in text.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    mix_u64(hash)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Deterministic random stream for one generation run.
#[derive(Debug, Clone)]
pub struct PuzzleRng {
    inner: StdRng,
}

impl PuzzleRng {
    pub fn new(seed: &Seed) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed.to_u64()),
        }
    }
}

impl RngCore for PuzzleRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }
}

/// Generate a random float in the range [0, 1].
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random float between `min` and `max`.
#[inline]
pub fn rand_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * rand01(rng)
}
