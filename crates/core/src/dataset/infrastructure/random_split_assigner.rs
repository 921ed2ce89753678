use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::domain::split::{Split, SplitFractions};
use crate::dataset::domain::split_assigner::SplitAssigner;

/// Draws a fresh uniform value in `[0, 1)` per frame; split sizes match the
/// fractions only in expectation.
pub struct RandomSplitAssigner {
    fractions: SplitFractions,
    rng: StdRng,
}

impl RandomSplitAssigner {
    pub fn new(fractions: SplitFractions) -> Self {
        Self {
            fractions,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(fractions: SplitFractions, seed: u64) -> Self {
        Self {
            fractions,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SplitAssigner for RandomSplitAssigner {
    fn assign(&mut self, _sequence: usize, _group_total: usize) -> Split {
        let draw: f64 = self.rng.gen();
        self.fractions.partition(draw)
    }
}
