/// Extensions (lowercase) the catalog treats as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "m4v", "webm"];

/// Frame rate used to convert the edge trim from seconds to frames.
pub const DEFAULT_TRIM_FPS: f64 = 30.0;
pub const DEFAULT_TRIM_SECONDS: f64 = 1.0;

/// Perturbation bounds for synthesized frames.
pub const MAX_ANGLE_DEGREES: i32 = 6;
pub const MAX_TRANSLATION_PIXELS: i32 = 8;
/// Exclusive upper limit for a configured rotation bound.
pub const MAX_ANGLE_LIMIT: i32 = 180;

/// Largest per-group frame target a run accepts.
pub const MAX_TARGET_FRAMES: usize = 100_000_000;

/// Groups this close below the target are not upsampled.
pub const DEFAULT_UPSAMPLE_TOLERANCE: usize = 10;

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.15;
pub const DEFAULT_TEST_FRACTION: f64 = 0.15;

/// Allowed deviation of the split fraction sum from 1.
pub const SPLIT_SUM_TOLERANCE: f64 = 1e-6;

pub const DEFAULT_FRAME_EXTENSION: &str = "png";
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
