use crate::augmentation::domain::frame_perturber::FramePerturber;
use crate::catalog::domain::video_handle::VideoHandle;
use crate::sampling::domain::sample_index_planner::{SampleIndex, SamplePlan};
use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;

/// One output frame of a video's plan.
///
/// Rank 0 is the decoded frame itself; ranks `1..multiplicity` are
/// perturbed copies of it.
#[derive(Debug)]
pub struct SampledFrame {
    pub offset: usize,
    pub rank: usize,
    pub frame: Frame,
}

struct Pending {
    frame: Frame,
    offset: usize,
    next_rank: usize,
    multiplicity: usize,
}

/// Walks a video forward once, yielding the frames its plan selects.
///
/// Frames between planned offsets are skipped without being converted to
/// RGB, and decoding stops after the last planned offset. The first error
/// ends the sequence.
pub struct SampledFrames<'a> {
    handle: &'a mut VideoHandle,
    perturber: &'a mut dyn FramePerturber,
    indices: std::slice::Iter<'a, SampleIndex>,
    decoded: usize,
    pending: Option<Pending>,
    failed: bool,
}

impl<'a> SampledFrames<'a> {
    pub fn new(
        handle: &'a mut VideoHandle,
        plan: &'a SamplePlan,
        perturber: &'a mut dyn FramePerturber,
    ) -> Self {
        Self {
            handle,
            perturber,
            indices: plan.indices().iter(),
            decoded: 0,
            pending: None,
            failed: false,
        }
    }

    /// Advances the cursor until it sits on `offset` (counted from zero).
    fn seek(&mut self, offset: usize) -> Result<(), DatasetError> {
        while self.decoded <= offset {
            let advanced = self.handle.advance().map_err(|source| DatasetError::Decode {
                path: self.handle.path().to_path_buf(),
                frame: self.decoded,
                source,
            })?;
            if !advanced {
                return Err(DatasetError::Decode {
                    path: self.handle.path().to_path_buf(),
                    frame: offset,
                    source: format!("stream ended after {} frames", self.decoded).into(),
                });
            }
            self.decoded += 1;
        }
        Ok(())
    }

    fn extract(&mut self, index: SampleIndex) -> Result<SampledFrame, DatasetError> {
        self.seek(index.offset)?;
        let frame = self
            .handle
            .materialize()
            .map_err(|source| DatasetError::Decode {
                path: self.handle.path().to_path_buf(),
                frame: index.offset,
                source,
            })?;
        if index.multiplicity > 1 {
            self.pending = Some(Pending {
                frame: frame.clone(),
                offset: index.offset,
                next_rank: 1,
                multiplicity: index.multiplicity,
            });
        }
        Ok(SampledFrame {
            offset: index.offset,
            rank: 0,
            frame,
        })
    }

    fn next_perturbed(&mut self) -> Option<SampledFrame> {
        let pending = self.pending.as_mut()?;
        let sampled = SampledFrame {
            offset: pending.offset,
            rank: pending.next_rank,
            frame: self.perturber.perturb(&pending.frame),
        };
        pending.next_rank += 1;
        if pending.next_rank >= pending.multiplicity {
            self.pending = None;
        }
        Some(sampled)
    }
}

impl Iterator for SampledFrames<'_> {
    type Item = Result<SampledFrame, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(sampled) = self.next_perturbed() {
            return Some(Ok(sampled));
        }
        let index = *self.indices.next()?;
        let result = self.extract(index);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
