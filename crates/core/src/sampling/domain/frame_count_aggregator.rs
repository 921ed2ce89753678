use crate::catalog::domain::video_catalog::VideoCatalog;
use crate::sampling::domain::edge_trim::EdgeTrim;
use crate::sampling::domain::group_aggregate::GroupAggregate;
use crate::shared::error::DatasetError;

/// Counting pass: sums usable frames per group from container frame counts,
/// without decoding any pixels.
pub struct FrameCountAggregator {
    trim: EdgeTrim,
}

impl FrameCountAggregator {
    pub fn new(trim: EdgeTrim) -> Self {
        Self { trim }
    }

    pub fn aggregate(&self, catalog: &dyn VideoCatalog) -> Result<GroupAggregate, DatasetError> {
        let mut aggregate = GroupAggregate::new();

        for entry in catalog.scan()? {
            let (key, handle) = entry?;
            let raw = handle.raw_frame_count();
            let usable = self.trim.usable_frames(raw).ok_or_else(|| {
                DatasetError::Config(format!(
                    "{} has {raw} frames, fewer than the {} trimmed from each video",
                    handle.path().display(),
                    self.trim.total_trim()
                ))
            })?;
            log::debug!(
                "{key}: {} contributes {usable} usable of {raw} frames",
                handle.path().display()
            );
            aggregate.record(key, handle.path(), usable);
        }

        if let Some((key, _)) = aggregate.groups().find(|(_, g)| g.total == 0) {
            return Err(DatasetError::Config(format!(
                "group {key} has no usable frames after trimming"
            )));
        }

        log::info!(
            "Counted {} groups, smallest has {} usable frames",
            aggregate.len(),
            aggregate.minimum().unwrap_or(0)
        );
        Ok(aggregate)
    }
}
