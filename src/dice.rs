use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of every random draw the session makes.
///
/// The session only talks to this trait so tests can force the prompt to
/// appear (or not) without hunting for a seed.
pub trait Dice {
    /// Uniform draw from the closed range `[low, high]`.
    fn look_back(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `[0, sides)`. `sides` is at least 1.
    fn roll(&mut self, sides: u32) -> u32;

    /// Uniform point in `[min, max]` on both axes.
    fn place(&mut self, min: f64, max: f64) -> (f64, f64);
}

/// [`Dice`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn look_back(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(0..sides.max(1))
    }

    fn place(&mut self, min: f64, max: f64) -> (f64, f64) {
        (self.rng.gen_range(min..=max), self.rng.gen_range(min..=max))
    }
}
