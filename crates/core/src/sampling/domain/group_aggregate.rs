use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::domain::group_key::GroupKey;

/// One video's share of its group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoContribution {
    pub path: PathBuf,
    pub usable_frames: usize,
}

/// Usable frame total of one group and the videos it came from, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupTotal {
    pub total: usize,
    pub videos: Vec<VideoContribution>,
}

impl GroupTotal {
    pub fn usable_frames_of(&self, path: &Path) -> Option<usize> {
        self.videos
            .iter()
            .find(|v| v.path == path)
            .map(|v| v.usable_frames)
    }
}

/// Group key → usable frame total, built by the counting pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupAggregate {
    groups: BTreeMap<GroupKey, GroupTotal>,
}

impl GroupAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: GroupKey, path: &Path, usable_frames: usize) {
        let group = self.groups.entry(key).or_default();
        group.total += usable_frames;
        group.videos.push(VideoContribution {
            path: path.to_path_buf(),
            usable_frames,
        });
    }

    pub fn group(&self, key: &GroupKey) -> Option<&GroupTotal> {
        self.groups.get(key)
    }

    pub fn total(&self, key: &GroupKey) -> Option<usize> {
        self.groups.get(key).map(|g| g.total)
    }

    /// Smallest group total, the default normalization target.
    pub fn minimum(&self) -> Option<usize> {
        self.groups.values().map(|g| g.total).min()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, &GroupTotal)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
