use std::path::Path;

use crate::shared::frame::Frame;

/// Encodes a single frame to an image file.
pub trait ImageWriter {
    /// Writes a frame to a path that must not exist yet, optionally resizing
    /// to the given dimensions. The format follows the path's extension.
    ///
    /// An occupied path fails with an `std::io::Error` of kind
    /// `AlreadyExists` and leaves the existing file untouched.
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
