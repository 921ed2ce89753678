use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Instant;

use crate::augmentation::domain::frame_perturber::FramePerturber;
use crate::catalog::domain::group_key::GroupKey;
use crate::catalog::domain::video_catalog::VideoCatalog;
use crate::dataset::domain::produced_frame::ProducedFrame;
use crate::dataset::domain::split_assigner::SplitAssigner;
use crate::dataset::infrastructure::dataset_writer::DatasetWriter;
use crate::pipeline::dataset_summary::DatasetSummary;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::sampling::domain::edge_trim::EdgeTrim;
use crate::sampling::domain::frame_count_aggregator::FrameCountAggregator;
use crate::sampling::domain::group_aggregate::{GroupAggregate, VideoContribution};
use crate::sampling::domain::sample_index_planner::SampleIndexPlanner;
use crate::sampling::domain::sample_target::TargetPolicy;
use crate::sampling::domain::sampled_frames::SampledFrames;
use crate::shared::error::DatasetError;

/// Run-wide sampling settings shared by both catalog passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub trim: EdgeTrim,
    pub target: TargetPolicy,
}

/// Resolved output of one group before extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPlan {
    pub key: GroupKey,
    pub usable_total: usize,
    pub target: usize,
    /// Frames the group will actually produce (sum of rounded per-video shares).
    pub planned_total: usize,
    pub synthesized: usize,
    pub videos: Vec<VideoContribution>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DatasetPlan {
    groups: BTreeMap<GroupKey, GroupPlan>,
}

impl DatasetPlan {
    pub fn group(&self, key: &GroupKey) -> Option<&GroupPlan> {
        self.groups.get(key)
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupPlan> {
        self.groups.values()
    }

    pub fn total_planned(&self) -> usize {
        self.groups.values().map(|g| g.planned_total).sum()
    }

    pub fn total_synthesized(&self) -> usize {
        self.groups.values().map(|g| g.synthesized).sum()
    }
}

impl fmt::Display for DatasetPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24}{:>8}{:>8}{:>10}{:>8}{:>13}",
            "group", "videos", "usable", "target", "output", "synthesized"
        )?;
        for g in self.groups.values() {
            writeln!(
                f,
                "{:<24}{:>8}{:>8}{:>10}{:>8}{:>13}",
                g.key.to_string(),
                g.videos.len(),
                g.usable_total,
                g.target,
                g.planned_total,
                g.synthesized
            )?;
        }
        writeln!(
            f,
            "{} groups, {} output frames ({} synthesized)",
            self.groups.len(),
            self.total_planned(),
            self.total_synthesized()
        )
    }
}

/// Two-pass dataset build: count → plan → extract, perturb, split, write.
pub struct BuildDatasetUseCase {
    catalog: Box<dyn VideoCatalog>,
    perturber: Box<dyn FramePerturber>,
    assigner: Box<dyn SplitAssigner>,
    writer: DatasetWriter,
    logger: Box<dyn PipelineLogger>,
    config: BuildConfig,
}

impl BuildDatasetUseCase {
    pub fn new(
        catalog: Box<dyn VideoCatalog>,
        perturber: Box<dyn FramePerturber>,
        assigner: Box<dyn SplitAssigner>,
        writer: DatasetWriter,
        logger: Box<dyn PipelineLogger>,
        config: BuildConfig,
    ) -> Self {
        Self {
            catalog,
            perturber,
            assigner,
            writer,
            logger,
            config,
        }
    }

    /// Runs the counting pass and resolves every group's target and output
    /// size. Reads container metadata only and writes nothing.
    pub fn plan(&self) -> Result<DatasetPlan, DatasetError> {
        let aggregate = FrameCountAggregator::new(self.config.trim).aggregate(self.catalog.as_ref())?;
        if aggregate.is_empty() {
            return Err(DatasetError::Config(
                "no videos found in the source directory".to_string(),
            ));
        }
        self.resolve(&aggregate)
    }

    fn resolve(&self, aggregate: &GroupAggregate) -> Result<DatasetPlan, DatasetError> {
        let planner = SampleIndexPlanner::new(&self.config.trim);
        let mut groups = BTreeMap::new();

        for (key, group) in aggregate.groups() {
            let target = self.config.target.group_target(group.total, aggregate);
            let mut planned_total = 0;
            let mut synthesized = 0;
            for video in &group.videos {
                let plan = planner.plan(video.usable_frames, group.total, target)?;
                log::debug!(
                    "{key}: {} -> {} samples from {} frames ({} synthesized)",
                    video.path.display(),
                    plan.total_samples(),
                    plan.indices().len(),
                    plan.synthesized()
                );
                planned_total += plan.total_samples();
                synthesized += plan.synthesized();
            }
            if planned_total != target {
                log::debug!("{key}: rounding yields {planned_total} frames for target {target}");
            }
            groups.insert(
                key.clone(),
                GroupPlan {
                    key: key.clone(),
                    usable_total: group.total,
                    target,
                    planned_total,
                    synthesized,
                    videos: group.videos.clone(),
                },
            );
        }
        Ok(DatasetPlan { groups })
    }

    /// Builds the dataset. Any failure aborts the run and is returned as is;
    /// frames written before it stay on disk.
    pub fn execute(&mut self) -> Result<DatasetSummary, DatasetError> {
        self.writer.ensure_fresh()?;

        self.logger.info("Counting frames");
        let plan = self.plan()?;
        self.logger.info(&format!(
            "Planned {} groups, {} frames ({} synthesized)",
            plan.groups.len(),
            plan.total_planned(),
            plan.total_synthesized()
        ));

        self.writer.create_layout()?;

        let Self {
            catalog,
            perturber,
            assigner,
            writer,
            logger,
            config,
        } = self;
        let planner = SampleIndexPlanner::new(&config.trim);
        let total_planned = plan.total_planned();
        let mut sequences: HashMap<GroupKey, usize> = HashMap::new();
        let mut summary = DatasetSummary::new();

        for entry in catalog.scan()? {
            let (key, mut handle) = entry?;
            let group = plan.group(&key).ok_or_else(|| {
                DatasetError::Config(format!(
                    "{} appeared after frames were counted",
                    handle.path().display()
                ))
            })?;

            let raw = handle.raw_frame_count();
            let usable = config.trim.usable_frames(raw);
            let counted = group
                .videos
                .iter()
                .find(|v| v.path == handle.path())
                .map(|v| v.usable_frames);
            if usable.is_none() || usable != counted {
                return Err(DatasetError::Config(format!(
                    "frame count of {} changed between passes ({raw} raw frames now)",
                    handle.path().display()
                )));
            }
            let usable = usable.unwrap_or_default();

            let sample_plan = planner.plan(usable, group.usable_total, group.target)?;
            if sample_plan.is_empty() {
                log::warn!("{} contributes no frames", handle.path().display());
                continue;
            }
            logger.video_started(&key.to_string(), handle.path(), sample_plan.total_samples());
            summary.record_video();

            let mut frames = SampledFrames::new(&mut handle, &sample_plan, perturber.as_mut());
            loop {
                let started = Instant::now();
                let Some(sampled) = frames.next() else {
                    break;
                };
                let sampled = sampled?;
                let stage = if sampled.rank == 0 { "decode" } else { "perturb" };
                logger.timing(stage, elapsed_ms(started));

                let counter = sequences.entry(key.clone()).or_insert(0);
                let sequence = *counter;
                *counter += 1;

                let split = assigner.assign(sequence, group.planned_total);
                let produced = ProducedFrame {
                    group: key.clone(),
                    frame: sampled.frame,
                    sequence,
                    augmentation_rank: sampled.rank,
                    source_offset: sampled.offset,
                };

                let started = Instant::now();
                writer.write(split, &produced)?;
                logger.timing("write", elapsed_ms(started));
                logger.frame_written(split);

                summary.record_frame(split, &key, produced.is_synthesized());
                logger.progress(summary.total(), total_planned);
            }
        }

        logger.summary();
        log::info!("Wrote {}", summary);
        Ok(summary)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
