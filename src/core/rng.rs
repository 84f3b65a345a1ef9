//! Deterministic random number generation for puzzle secrets.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical secrets, so teammates
//!   sharing a mission seed generate the same team puzzle
//! - **Context streams**: Independent sequences per concern (secret layout,
//!   random events) so rolling an event never shifts a secret
//! - **Stable across builds**: Context seeds are derived with FNV-1a rather
//!   than `std`'s hasher, whose output may change between Rust releases
//!
//! ```
//! use heist_puzzles::core::PuzzleRng;
//!
//! let mut a = PuzzleRng::new(7).for_context("wires");
//! let mut b = PuzzleRng::new(7).for_context("wires");
//! assert_eq!(a.gen_digit(), b.gen_digit());
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic RNG used to generate puzzle secrets and roll random events.
///
/// Uses ChaCha8 so that the same `rng_seed` yields the same secret on every
/// client of a team puzzle.
#[derive(Clone, Debug)]
pub struct PuzzleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl PuzzleRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// An independent stream for a named concern.
    ///
    /// Depends only on this generator's seed and `context`, never on how
    /// many values were drawn.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let derived = self
            .seed
            .to_le_bytes()
            .iter()
            .chain(context.as_bytes())
            .fold(FNV_OFFSET, |hash, &byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME));
        Self::new(derived)
    }

    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    pub fn gen_range_inclusive(&mut self, range: std::ops::RangeInclusive<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// A decimal digit (0-9).
    pub fn gen_digit(&mut self) -> u8 {
        self.inner.gen_range(0..10u8)
    }

    /// True with `probability`, clamped to `0.0..=1.0`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Pick `count` distinct indices from `0..len`, returned in ascending order.
    ///
    /// `count` is clamped to `len`.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let mut indices = rand::seq::index::sample(&mut self.inner, len, count.min(len)).into_vec();
        indices.sort_unstable();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_secrets() {
        let mut a = PuzzleRng::new(42);
        let mut b = PuzzleRng::new(42);
        let left: Vec<u8> = (0..32).map(|_| a.gen_digit()).collect();
        let right: Vec<u8> = (0..32).map(|_| b.gen_digit()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_seeds_diverge() {
        let mut a = PuzzleRng::new(1);
        let mut b = PuzzleRng::new(2);
        let left: Vec<u32> = (0..10).map(|_| a.gen_range(0..1000)).collect();
        let right: Vec<u32> = (0..10).map(|_| b.gen_range(0..1000)).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn test_context_ignores_draw_position() {
        let mut drawn = PuzzleRng::new(42);
        for _ in 0..17 {
            drawn.gen_digit();
        }
        assert_eq!(
            drawn.for_context("wires").seed(),
            PuzzleRng::new(42).for_context("wires").seed()
        );
    }

    #[test]
    fn test_contexts_are_independent() {
        let rng = PuzzleRng::new(42);
        assert_ne!(rng.for_context("wires").seed(), rng.for_context("events").seed());
        assert_ne!(rng.for_context("wires").seed(), PuzzleRng::new(43).for_context("wires").seed());
    }

    #[test]
    fn test_gen_digit_range() {
        let mut rng = PuzzleRng::new(9);
        assert!((0..200).all(|_| rng.gen_digit() <= 9));
    }

    #[test]
    fn test_sample_indices() {
        let mut rng = PuzzleRng::new(3);
        let picked = rng.sample_indices(8, 3);

        assert_eq!(picked.len(), 3);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|&i| i < 8));

        assert_eq!(rng.sample_indices(2, 5).len(), 2);
        assert!(rng.sample_indices(0, 1).is_empty());
    }

    #[test]
    fn test_gen_bool_clamps() {
        let mut rng = PuzzleRng::new(5);
        assert!(rng.gen_bool(1.5));
        assert!(!rng.gen_bool(-0.5));
    }
}
