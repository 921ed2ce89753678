use crate::dataset::domain::split::SplitFractions;
use crate::dataset::domain::split_assigner::{SplitAssigner, SplitPolicy};

use super::random_split_assigner::RandomSplitAssigner;
use super::sequential_split_assigner::SequentialSplitAssigner;

/// Creates the assigner for `policy`. `seed` only affects the random policy.
pub fn create_split_assigner(
    policy: SplitPolicy,
    fractions: SplitFractions,
    seed: Option<u64>,
) -> Box<dyn SplitAssigner> {
    log::info!(
        "Using {:?} split policy (train={}, validation={}, test={})",
        policy,
        fractions.train(),
        fractions.validation(),
        fractions.test()
    );
    match (policy, seed) {
        (SplitPolicy::Sequential, _) => Box::new(SequentialSplitAssigner::new(fractions)),
        (SplitPolicy::Random, Some(seed)) => {
            Box::new(RandomSplitAssigner::with_seed(fractions, seed))
        }
        (SplitPolicy::Random, None) => Box::new(RandomSplitAssigner::new(fractions)),
    }
}
