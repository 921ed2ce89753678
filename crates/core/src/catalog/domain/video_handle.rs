use std::path::{Path, PathBuf};

use crate::shared::error::DatasetError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// An opened video, owned by whoever pulled it from a catalog pass.
///
/// The underlying reader is closed when the handle is dropped, so a handle
/// abandoned by an early `?` return is released like any other.
pub struct VideoHandle {
    reader: Box<dyn VideoReader>,
    metadata: VideoMetadata,
    path: PathBuf,
}

impl VideoHandle {
    pub fn open(mut reader: Box<dyn VideoReader>, path: &Path) -> Result<Self, DatasetError> {
        let metadata = reader.open(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Opened {} ({} frames, {}x{}, {:.1}s)",
            path.display(),
            metadata.total_frames,
            metadata.width,
            metadata.height,
            metadata.duration_secs().unwrap_or(0.0)
        );
        Ok(Self {
            reader,
            metadata,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn raw_frame_count(&self) -> usize {
        self.metadata.total_frames
    }

    /// Moves the decode cursor one frame forward; `false` at end of stream.
    pub fn advance(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        self.reader.advance()
    }

    /// RGB pixels of the frame under the cursor.
    pub fn materialize(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        self.reader.materialize()
    }
}

impl Drop for VideoHandle {
    fn drop(&mut self) {
        self.reader.close();
        log::debug!("Released {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct StubReader {
        total_frames: usize,
        closed: Rc<Cell<usize>>,
        fail_open: bool,
    }

    impl VideoReader for StubReader {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("unsupported codec".into());
            }
            Ok(VideoMetadata {
                width: 4,
                height: 2,
                fps: 30.0,
                total_frames: self.total_frames,
                source_path: Some(path.to_path_buf()),
            })
        }

        fn advance(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
            Ok(false)
        }

        fn materialize(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            Err("no frame".into())
        }

        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    fn stub(total_frames: usize, closed: &Rc<Cell<usize>>, fail_open: bool) -> Box<StubReader> {
        Box::new(StubReader {
            total_frames,
            closed: Rc::clone(closed),
            fail_open,
        })
    }

    #[test]
    fn test_open_exposes_metadata() {
        let closed = Rc::new(Cell::new(0));
        let handle = VideoHandle::open(stub(120, &closed, false), Path::new("B1H1_North.mp4")).unwrap();
        assert_eq!(handle.raw_frame_count(), 120);
        assert_eq!(handle.metadata().fps, 30.0);
        assert_eq!(handle.path(), Path::new("B1H1_North.mp4"));
    }

    #[test]
    fn test_drop_closes_reader() {
        let closed = Rc::new(Cell::new(0));
        {
            let _handle =
                VideoHandle::open(stub(10, &closed, false), Path::new("B1H1_North.mp4")).unwrap();
            assert_eq!(closed.get(), 0);
        }
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn test_open_failure_is_open_error() {
        let closed = Rc::new(Cell::new(0));
        let err = VideoHandle::open(stub(10, &closed, true), Path::new("B1H1_North.mp4"))
            .err()
            .unwrap();
        assert!(matches!(err, DatasetError::Open { .. }));
        assert!(err.to_string().contains("unsupported codec"));
    }
}
