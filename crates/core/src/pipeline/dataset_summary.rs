use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::domain::group_key::GroupKey;
use crate::dataset::domain::split::Split;

/// What a finished build wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    per_split: BTreeMap<Split, usize>,
    per_group: BTreeMap<GroupKey, usize>,
    synthesized: usize,
    videos: usize,
}

impl DatasetSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_video(&mut self) {
        self.videos += 1;
    }

    pub fn record_frame(&mut self, split: Split, group: &GroupKey, synthesized: bool) {
        *self.per_split.entry(split).or_default() += 1;
        *self.per_group.entry(group.clone()).or_default() += 1;
        if synthesized {
            self.synthesized += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.per_split.values().sum()
    }

    pub fn split_count(&self, split: Split) -> usize {
        self.per_split.get(&split).copied().unwrap_or(0)
    }

    pub fn group_count(&self, group: &GroupKey) -> usize {
        self.per_group.get(group).copied().unwrap_or(0)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, usize)> {
        self.per_group.iter().map(|(k, &v)| (k, v))
    }

    /// Perturbed copies among the written frames.
    pub fn synthesized(&self) -> usize {
        self.synthesized
    }

    pub fn videos(&self) -> usize {
        self.videos
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} frames from {} videos ({} synthesized)",
            self.total(),
            self.videos,
            self.synthesized
        )?;
        for split in Split::ALL {
            writeln!(f, "  {:<12}{}", split.dir_name(), self.split_count(split))?;
        }
        for (group, count) in &self.per_group {
            writeln!(f, "  {:<24}{count}", group.to_string())?;
        }
        Ok(())
    }
}
