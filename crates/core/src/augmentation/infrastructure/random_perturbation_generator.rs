use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::augmentation::domain::affine_warp::{warp, Perturbation};
use crate::augmentation::domain::frame_perturber::FramePerturber;
use crate::shared::constants::{MAX_ANGLE_DEGREES, MAX_ANGLE_LIMIT, MAX_TRANSLATION_PIXELS};
use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;

/// Symmetric bounds for the random draws, in whole degrees and pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerturbationBounds {
    pub max_angle_degrees: i32,
    pub max_translation_pixels: i32,
}

impl PerturbationBounds {
    pub fn new(max_angle_degrees: i32, max_translation_pixels: i32) -> Result<Self, DatasetError> {
        if max_angle_degrees < 0 || max_translation_pixels < 0 {
            return Err(DatasetError::Config(format!(
                "perturbation bounds must be non-negative, got angle {max_angle_degrees}, translation {max_translation_pixels}"
            )));
        }
        if max_angle_degrees >= MAX_ANGLE_LIMIT {
            return Err(DatasetError::Config(format!(
                "max angle must be below {MAX_ANGLE_LIMIT} degrees, got {max_angle_degrees}"
            )));
        }
        Ok(Self {
            max_angle_degrees,
            max_translation_pixels,
        })
    }
}

impl Default for PerturbationBounds {
    fn default() -> Self {
        Self {
            max_angle_degrees: MAX_ANGLE_DEGREES,
            max_translation_pixels: MAX_TRANSLATION_PIXELS,
        }
    }
}

/// Rotates and shifts frames by independent uniform integer draws within
/// `±bounds`.
pub struct RandomPerturbationGenerator {
    bounds: PerturbationBounds,
    rng: StdRng,
}

impl RandomPerturbationGenerator {
    pub fn new(bounds: PerturbationBounds) -> Self {
        Self {
            bounds,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible draws for a given seed.
    pub fn with_seed(bounds: PerturbationBounds, seed: u64) -> Self {
        Self {
            bounds,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn draw(&mut self) -> Perturbation {
        let angle = self.bounds.max_angle_degrees;
        let shift = self.bounds.max_translation_pixels;
        Perturbation {
            angle_degrees: self.rng.gen_range(-angle..=angle),
            dx: self.rng.gen_range(-shift..=shift),
            dy: self.rng.gen_range(-shift..=shift),
        }
    }
}

impl FramePerturber for RandomPerturbationGenerator {
    fn perturb(&mut self, frame: &Frame) -> Frame {
        let perturbation = self.draw();
        log::trace!("Perturbing frame {} with {perturbation:?}", frame.index());
        warp(frame, &perturbation)
    }
}
