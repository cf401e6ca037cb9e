//! RNG adapter for reproducible vs entropy-seeded generation.
//!
//! The generator is generic over [`Rng`] so tests can pin a seed while the
//! binary seeds from the OS. Each generator owns its stream; contexts that
//! generate concurrently must [`fork`](Rng::fork) independent streams rather
//! than share one.
//!
//! ```rust,ignore
//! let mut master = SimRng::new(seed);
//!
//! let a = master.fork(); // independent stream
//! let b = master.fork(); // independent stream
//! ```

use rand::{Rng as _, RngCore, SeedableRng, rngs::SmallRng};

/// Trait for the random draws the generator needs.
///
/// Use it as a generic bound (`<R: Rng>`), not as `&dyn Rng`.
pub trait Rng {
    /// Generates a random `u64`.
    fn next_u64(&mut self) -> u64;

    /// Generates a uniform `usize` in `[0, max)`.
    ///
    /// `max` must be non-zero.
    fn next_usize(&mut self, max: usize) -> usize;

    /// Generates a uniform `u32` in `[min, max)`.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generates a uniform `i32` in `[min, max]`.
    fn next_i32_inclusive(&mut self, min: i32, max: i32) -> i32;

    /// Forks an independent stream whose seed is drawn from this one.
    fn fork(&mut self) -> Self
    where
        Self: Sized;
}

/// Seedable random source backed by `SmallRng`.
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    inner: SmallRng,
}

impl SimRng {
    /// Creates a deterministic stream from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a stream seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::rngs::OsRng.next_u64())
    }

    /// Creates a stream from `seed`, or from entropy when `None`.
    pub fn from_seed_or_entropy(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// The seed this stream started from (for reproducing a run).
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Rng for SimRng {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    #[inline]
    fn next_usize(&mut self, max: usize) -> usize {
        debug_assert!(max > 0, "max must be > 0");
        self.inner.gen_range(0..max)
    }

    #[inline]
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min < max, "min must be < max");
        self.inner.gen_range(min..max)
    }

    #[inline]
    fn next_i32_inclusive(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "min must be <= max");
        self.inner.gen_range(min..=max)
    }

    fn fork(&mut self) -> Self {
        Self::new(self.inner.next_u64())
    }
}
