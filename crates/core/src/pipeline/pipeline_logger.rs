use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;

use crate::dataset::domain::split::Split;

/// Cross-cutting logger for dataset build events.
///
/// Keeps the orchestration code free of any particular output mechanism;
/// the CLI reports through `log`, tests discard everything.
pub trait PipelineLogger {
    /// A video is about to be sampled for `planned` output frames.
    fn video_started(&mut self, group: &str, path: &Path, planned: usize);

    /// Report frame-level progress across the whole run.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &'static str, duration_ms: f64);

    /// One frame landed in `split`.
    fn frame_written(&mut self, split: Split);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn video_started(&mut self, _group: &str, _path: &Path, _planned: usize) {}
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &'static str, _duration_ms: f64) {}
    fn frame_written(&mut self, _split: Split) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that keeps a running call count and total duration
/// per stage alongside per-split counts, and reports a summary when the run
/// completes.
///
/// Progress output is throttled to every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<&'static str, (usize, f64)>,
    split_counts: BTreeMap<Split, usize>,
    start_time: Instant,
    total_frames: usize,
    videos: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            split_counts: BTreeMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
            videos: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.split_counts.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let written: usize = self.split_counts.values().sum();
        let mut lines = Vec::new();

        lines.push(format!(
            "Build summary ({written} frames from {} videos, {:.1}s total):",
            self.videos,
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by_key(|(stage, _)| **stage);
        for (stage, &(count, total_ms)) in stages {
            let avg_ms = if count == 0 {
                0.0
            } else {
                total_ms / count as f64
            };
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        for (split, count) in &self.split_counts {
            lines.push(format!("  {:12}: {count} frames", split.dir_name()));
        }

        if written > 0 && elapsed_ms > 0.0 {
            let fps = written as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} frames/s"));
        }

        Some(lines.join("\n"))
    }

    /// Number of recorded calls and their summed duration for `stage`.
    pub fn stage_stats(&self, stage: &str) -> Option<(usize, f64)> {
        self.timings.get(stage).copied()
    }

    pub fn split_count(&self, split: Split) -> usize {
        self.split_counts.get(&split).copied().unwrap_or(0)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn video_started(&mut self, group: &str, path: &Path, planned: usize) {
        self.videos += 1;
        log::info!("[{group}] {} -> {planned} frames", path.display());
    }

    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Writing: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &'static str, duration_ms: f64) {
        let (count, total_ms) = self.timings.entry(stage).or_insert((0, 0.0));
        *count += 1;
        *total_ms += duration_ms;
    }

    fn frame_written(&mut self, split: Split) {
        *self.split_counts.entry(split).or_default() += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
