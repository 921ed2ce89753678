use crate::sampling::domain::edge_trim::EdgeTrim;
use crate::sampling::domain::group_aggregate::GroupTotal;
use crate::shared::constants::MAX_TARGET_FRAMES;
use crate::shared::error::DatasetError;

/// A frame to extract and how many output frames it yields.
///
/// Multiplicity beyond 1 is filled with perturbed copies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleIndex {
    pub offset: usize,
    pub multiplicity: usize,
}

/// Frames to extract from one video, in strictly increasing offset order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SamplePlan {
    indices: Vec<SampleIndex>,
}

impl SamplePlan {
    pub fn indices(&self) -> &[SampleIndex] {
        &self.indices
    }

    /// Output frames the plan produces (sum of multiplicities).
    pub fn total_samples(&self) -> usize {
        self.indices.iter().map(|i| i.multiplicity).sum()
    }

    /// Output frames that will be synthesized rather than decoded.
    pub fn synthesized(&self) -> usize {
        self.indices.iter().map(|i| i.multiplicity - 1).sum()
    }

    pub fn last_offset(&self) -> Option<usize> {
        self.indices.last().map(|i| i.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Spreads a group's target over its videos and picks frame indices.
///
/// A video with `usable` of its group's `group_total` frames gets
/// `round(usable / group_total * target)` samples, at least one when it has
/// any usable frame. Samples are spaced evenly over the usable range with
/// both ends included; when there are more samples than frames, consecutive
/// samples land on the same frame and the extra ones become multiplicity.
#[derive(Clone, Copy, Debug)]
pub struct SampleIndexPlanner {
    leading_offset: usize,
}

impl SampleIndexPlanner {
    pub fn new(trim: &EdgeTrim) -> Self {
        Self {
            leading_offset: trim.leading_offset(),
        }
    }

    /// Proportional share of `target` for a video, rounded half up.
    ///
    /// Targets above [`MAX_TARGET_FRAMES`] are rejected before any plan is
    /// materialized.
    pub fn sample_count(
        &self,
        usable: usize,
        group_total: usize,
        target: usize,
    ) -> Result<usize, DatasetError> {
        check_share(usable, group_total)?;
        if target > MAX_TARGET_FRAMES {
            return Err(DatasetError::Config(format!(
                "target of {target} frames per group exceeds the limit of {MAX_TARGET_FRAMES}"
            )));
        }
        if usable == 0 {
            return Ok(0);
        }
        let (r, t, k) = (usable as u128, group_total as u128, target as u128);
        let rounded = r
            .checked_mul(k)
            .and_then(|rk| rk.checked_mul(2))
            .and_then(|rk2| rk2.checked_add(t))
            .map(|numerator| numerator / (2 * t))
            .ok_or_else(|| {
                DatasetError::Config(format!(
                    "sample count for {usable} of {group_total} frames at target {target} overflows"
                ))
            })?;
        Ok((rounded as usize).max(1))
    }

    /// Output frames a whole group will produce under `target`.
    pub fn planned_group_total(
        &self,
        group: &GroupTotal,
        target: usize,
    ) -> Result<usize, DatasetError> {
        group.videos.iter().try_fold(0, |sum, video| {
            Ok(sum + self.sample_count(video.usable_frames, group.total, target)?)
        })
    }

    pub fn plan(
        &self,
        usable: usize,
        group_total: usize,
        target: usize,
    ) -> Result<SamplePlan, DatasetError> {
        let samples = self.sample_count(usable, group_total, target)?;
        if samples == 0 {
            return Ok(SamplePlan::default());
        }

        let last = (usable - 1) as u128;
        let mut indices: Vec<SampleIndex> = Vec::new();
        for i in 0..samples {
            let relative = if samples == 1 {
                0
            } else {
                (i as u128 * last / (samples as u128 - 1)) as usize
            };
            let offset = self.leading_offset + relative.min(usable - 1);
            match indices.last_mut() {
                Some(prev) if prev.offset == offset => prev.multiplicity += 1,
                _ => indices.push(SampleIndex {
                    offset,
                    multiplicity: 1,
                }),
            }
        }
        Ok(SamplePlan { indices })
    }
}

fn check_share(usable: usize, group_total: usize) -> Result<(), DatasetError> {
    if group_total == 0 {
        return Err(DatasetError::Config(
            "cannot plan samples for a group with no usable frames".to_string(),
        ));
    }
    if usable > group_total {
        return Err(DatasetError::Config(format!(
            "video has {usable} usable frames, more than its group total of {group_total}"
        )));
    }
    Ok(())
}
