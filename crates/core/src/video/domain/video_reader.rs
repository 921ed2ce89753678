use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Cursor-based access to the frames of a video.
///
/// Advancing is separate from materializing so that callers sampling a
/// sparse subset of frames only pay for RGB conversion on the frames they
/// keep. Implementations handle codec and container details.
pub trait VideoReader {
    /// Opens a video file and returns its metadata, including the raw frame count.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Moves the cursor to the next frame. Returns `false` at end of stream.
    fn advance(&mut self) -> Result<bool, Box<dyn std::error::Error>>;

    /// Returns the pixels of the frame under the cursor as RGB.
    ///
    /// Fails if `advance` has not yet returned `true`.
    fn materialize(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Releases any resources held by the reader. Safe to call more than once.
    fn close(&mut self);
}
