use crate::dataset::domain::split::{Split, SplitFractions};
use crate::dataset::domain::split_assigner::SplitAssigner;

/// Assigns by position within the group, so each group's frames form one
/// contiguous train run, then validation, then test.
pub struct SequentialSplitAssigner {
    fractions: SplitFractions,
    /// Group total and its cut points from the previous call.
    cuts: Option<(usize, (usize, usize))>,
}

impl SequentialSplitAssigner {
    pub fn new(fractions: SplitFractions) -> Self {
        Self {
            fractions,
            cuts: None,
        }
    }

    fn cut_points(&mut self, group_total: usize) -> (usize, usize) {
        match self.cuts {
            Some((total, cuts)) if total == group_total => cuts,
            _ => {
                let cuts = self.fractions.cut_points(group_total);
                self.cuts = Some((group_total, cuts));
                cuts
            }
        }
    }
}

impl SplitAssigner for SequentialSplitAssigner {
    fn assign(&mut self, sequence: usize, group_total: usize) -> Split {
        let (train_end, validation_end) = self.cut_points(group_total);
        if sequence < train_end {
            Split::Train
        } else if sequence < validation_end {
            Split::Validation
        } else {
            Split::Test
        }
    }
}
