//! Injectable byte-valued random source consumed by the random opcode.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Byte generator seam for the random opcode.
///
/// The machine owns one source; tests inject a deterministic implementation
/// to reproduce exact sequences.
pub trait RandomSource {
    /// Returns the next uniformly distributed byte.
    fn next_byte(&mut self) -> u8;
}

/// Default random source backed by a seedable small-state generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    /// Creates a source with a fixed seed for reproducible sequences.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates an entropy-seeded source, the default outside tests.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

/// Scripted source replaying a fixed byte sequence, cycling when exhausted.
///
/// Intended for tests and replay fixtures that need full control over the
/// random opcode's input.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    bytes: Vec<u8>,
    next: usize,
}

impl SequenceRandom {
    /// Creates a source that replays `bytes` in order, then repeats.
    /// An empty sequence yields zeros.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, next: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_byte(&mut self) -> u8 {
        if self.bytes.is_empty() {
            return 0;
        }
        let byte = self.bytes[self.next % self.bytes.len()];
        self.next = self.next.wrapping_add(1);
        byte
    }
}
