use rand::{Rng, SeedableRng, rngs::StdRng, rngs::ThreadRng};

/// Source of the randomness the palette extractor consumes.
///
/// Cluster seeding draws indices, the washed-out lightness branch tosses a
/// coin. Tests substitute a scripted implementation to pin both.
pub trait RandomSource {
    /// Fair coin toss.
    fn coin(&mut self) -> bool;

    /// Uniform index in `0..upper`. `upper` is never zero.
    fn index(&mut self, upper: usize) -> usize;
}

/// [`RandomSource`] backed by any `rand` generator.
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::rng())
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn coin(&mut self) -> bool {
        self.0.random_bool(0.5)
    }

    fn index(&mut self, upper: usize) -> usize {
        self.0.random_range(0..upper)
    }
}
