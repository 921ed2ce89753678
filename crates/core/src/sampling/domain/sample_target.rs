use crate::sampling::domain::group_aggregate::GroupAggregate;

/// Number of frames every group should end up with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleTarget {
    Explicit(usize),
    /// Normalize every group down to the smallest group's usable total.
    GroupMinimum,
}

impl SampleTarget {
    /// `0` is the "no explicit count" sentinel used on the command line.
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            SampleTarget::GroupMinimum
        } else {
            SampleTarget::Explicit(count)
        }
    }
}

/// Target plus the tolerance below which a group is not upsampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetPolicy {
    pub target: SampleTarget,
    pub upsample_tolerance: usize,
}

impl TargetPolicy {
    pub fn new(target: SampleTarget, upsample_tolerance: usize) -> Self {
        Self {
            target,
            upsample_tolerance,
        }
    }

    /// Target for one group with `group_total` usable frames.
    ///
    /// A group short of the target by no more than the tolerance keeps its
    /// own size: every usable frame once, nothing synthesized.
    pub fn group_target(&self, group_total: usize, aggregate: &GroupAggregate) -> usize {
        let target = match self.target {
            SampleTarget::Explicit(count) => count,
            SampleTarget::GroupMinimum => aggregate.minimum().unwrap_or(0),
        };
        if target > group_total && target - group_total <= self.upsample_tolerance {
            group_total
        } else {
            target
        }
    }
}

impl Default for TargetPolicy {
    fn default() -> Self {
        Self::new(SampleTarget::GroupMinimum, 0)
    }
}
