use crate::dataset::domain::split::Split;
use crate::shared::error::DatasetError;

/// Decides which split each produced frame of a group goes to.
///
/// `sequence` is the frame's zero-based number within its group and
/// `group_total` the number of frames the group will produce in this run.
pub trait SplitAssigner {
    fn assign(&mut self, sequence: usize, group_total: usize) -> Split;
}

/// How frames are distributed across splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Contiguous runs per group: the first frames go to train, then
    /// validation, then test.
    Sequential,
    /// An independent uniform draw per frame.
    Random,
}

impl SplitPolicy {
    pub fn parse(name: &str) -> Result<Self, DatasetError> {
        match name.to_ascii_lowercase().as_str() {
            "sequential" => Ok(SplitPolicy::Sequential),
            "random" => Ok(SplitPolicy::Random),
            other => Err(DatasetError::Config(format!(
                "unknown split policy '{other}', expected 'sequential' or 'random'"
            ))),
        }
    }
}
