use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::domain::group_key::GroupKey;
use crate::catalog::domain::video_catalog::{CatalogEntry, VideoCatalog};
use crate::catalog::domain::video_handle::VideoHandle;
use crate::shared::constants::VIDEO_EXTENSIONS;
use crate::shared::error::DatasetError;
use crate::video::domain::video_reader::VideoReader;
use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

/// Creates a fresh, unopened reader for every video a scan visits.
pub type ReaderFactory = Box<dyn Fn() -> Box<dyn VideoReader>>;

/// Catalog over a `<root>/<subdirectory>/<video>` tree.
///
/// Only immediate subdirectories of the root are visited, and inside them
/// only regular files with a video extension. Listings are sorted so both
/// passes of a build see videos in the same order. Names are resolved and
/// videos opened lazily, one per pulled entry.
pub struct DirectoryCatalog {
    root: PathBuf,
    reader_factory: ReaderFactory,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>, reader_factory: ReaderFactory) -> Self {
        Self {
            root: root.into(),
            reader_factory,
        }
    }

    /// Catalog that decodes with ffmpeg.
    pub fn with_ffmpeg(root: impl Into<PathBuf>) -> Self {
        Self::new(
            root,
            Box::new(|| -> Box<dyn VideoReader> { Box::new(FfmpegReader::new()) }),
        )
    }

    /// Sorted paths of every video the catalog would visit.
    pub fn video_paths(&self) -> Result<Vec<PathBuf>, DatasetError> {
        let mut paths = Vec::new();
        for dir in sorted_entries(&self.root)? {
            if !is_directory(&dir)? {
                log::debug!("Skipping non-directory {}", dir.display());
                continue;
            }
            for entry in sorted_entries(&dir)? {
                if is_video_file(&entry)? {
                    paths.push(entry);
                } else {
                    log::debug!("Skipping non-video entry {}", entry.display());
                }
            }
        }
        Ok(paths)
    }

    fn open_entry(&self, path: &Path) -> CatalogEntry {
        let key = GroupKey::from_file_name(path)?;
        let handle = VideoHandle::open((self.reader_factory)(), path)?;
        Ok((key, handle))
    }
}

impl VideoCatalog for DirectoryCatalog {
    fn scan(&self) -> Result<Box<dyn Iterator<Item = CatalogEntry> + '_>, DatasetError> {
        let paths = self.video_paths()?;
        log::debug!(
            "Catalog scan of {} found {} videos",
            self.root.display(),
            paths.len()
        );
        Ok(Box::new(
            paths.into_iter().map(move |path| self.open_entry(&path)),
        ))
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| DatasetError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DatasetError::io(dir, e))?;
    entries.sort();
    Ok(entries)
}

fn is_directory(path: &Path) -> Result<bool, DatasetError> {
    fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .map_err(|e| DatasetError::io(path, e))
}

fn is_video_file(path: &Path) -> Result<bool, DatasetError> {
    let is_file = fs::symlink_metadata(path)
        .map(|m| m.is_file())
        .map_err(|e| DatasetError::io(path, e))?;
    Ok(is_file && has_video_extension(path))
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use crate::shared::video_metadata::VideoMetadata;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Reader whose frame count is the file's byte length; records open/close events.
    struct StubReader {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl VideoReader for StubReader {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.events.borrow_mut().push(format!("open {name}"));
            Ok(VideoMetadata {
                width: 4,
                height: 4,
                fps: 30.0,
                total_frames: fs::metadata(path)?.len() as usize,
                source_path: Some(path.to_path_buf()),
            })
        }

        fn advance(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
            Ok(false)
        }

        fn materialize(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            Err("stub".into())
        }

        fn close(&mut self) {
            self.events.borrow_mut().push("close".to_string());
        }
    }

    fn stub_catalog(root: &Path) -> (DirectoryCatalog, Rc<RefCell<Vec<String>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let factory_events = Rc::clone(&events);
        let catalog = DirectoryCatalog::new(
            root,
            Box::new(move || -> Box<dyn VideoReader> {
                Box::new(StubReader {
                    events: Rc::clone(&factory_events),
                })
            }),
        );
        (catalog, events)
    }

    fn touch(path: &Path, frames: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; frames]).unwrap();
    }

    #[test]
    fn test_scan_yields_keys_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("B6/B6H3_South.mp4"), 3);
        touch(&dir.path().join("B6/B6H3_North2.MOV"), 5);
        touch(&dir.path().join("B1/B1H1_East.avi"), 7);

        let (catalog, _) = stub_catalog(dir.path());
        let entries: Vec<(String, usize)> = catalog
            .scan()
            .unwrap()
            .map(|e| {
                let (key, handle) = e.unwrap();
                (key.to_string(), handle.raw_frame_count())
            })
            .collect();

        assert_eq!(
            entries,
            vec![
                ("B1H1_East".to_string(), 7),
                ("B6H3_North".to_string(), 5),
                ("B6H3_South".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_skips_non_video_and_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("B6/B6H3_North.mp4"), 2);
        touch(&dir.path().join("B6/notes.txt"), 2);
        touch(&dir.path().join("B6/deeper/B6H3_South.mp4"), 2);
        touch(&dir.path().join("B7H1_West.mp4"), 2);
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let (catalog, _) = stub_catalog(dir.path());
        let paths = catalog.video_paths().unwrap();
        assert_eq!(paths, vec![dir.path().join("B6/B6H3_North.mp4")]);
    }

    #[test]
    fn test_directory_with_video_extension_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("B6/B6H3_North.mp4")).unwrap();

        let (catalog, _) = stub_catalog(dir.path());
        assert!(catalog.video_paths().unwrap().is_empty());
    }

    #[test]
    fn test_scan_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("B6/B6H3_North.mp4"), 4);
        touch(&dir.path().join("B6/B6H3_North2.mp4"), 6);

        let (catalog, events) = stub_catalog(dir.path());
        let first: usize = catalog
            .scan()
            .unwrap()
            .map(|e| e.unwrap().1.raw_frame_count())
            .sum();
        let second: usize = catalog
            .scan()
            .unwrap()
            .map(|e| e.unwrap().1.raw_frame_count())
            .sum();

        assert_eq!(first, 10);
        assert_eq!(second, 10);
        assert_eq!(events.borrow().iter().filter(|e| e.starts_with("open")).count(), 4);
    }

    #[test]
    fn test_handle_released_before_next_open() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("B6/B6H3_North.mp4"), 1);
        touch(&dir.path().join("B6/B6H3_South.mp4"), 1);

        let (catalog, events) = stub_catalog(dir.path());
        for entry in catalog.scan().unwrap() {
            let _ = entry.unwrap();
        }

        assert_eq!(
            *events.borrow(),
            vec![
                "open B6H3_North.mp4".to_string(),
                "close".to_string(),
                "open B6H3_South.mp4".to_string(),
                "close".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_name_fails_without_opening() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("B6/lobby.mp4"), 1);

        let (catalog, events) = stub_catalog(dir.path());
        let err = catalog.scan().unwrap().next().unwrap().err().unwrap();
        assert!(matches!(err, DatasetError::Format { .. }));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let (catalog, _) = stub_catalog(Path::new("/nonexistent/videos"));
        assert!(matches!(catalog.scan().err().unwrap(), DatasetError::Io { .. }));
    }
}
