use crate::catalog::domain::group_key::GroupKey;
use crate::shared::frame::Frame;

/// A frame ready to be written: its group, its number within that group and
/// whether it is an original (`augmentation_rank == 0`) or a perturbed copy.
#[derive(Debug)]
pub struct ProducedFrame {
    pub group: GroupKey,
    pub frame: Frame,
    pub sequence: usize,
    pub augmentation_rank: usize,
    pub source_offset: usize,
}

impl ProducedFrame {
    pub fn is_synthesized(&self) -> bool {
        self.augmentation_rank > 0
    }
}
