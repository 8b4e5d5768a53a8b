use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// True with probability `1 / denominator`.
    pub fn one_in(&mut self, denominator: u32) -> bool {
        denominator != 0 && self.rng.random_range(0..denominator) == 0
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
