use std::io::ErrorKind;
use std::path::PathBuf;

use crate::dataset::domain::produced_frame::ProducedFrame;
use crate::dataset::domain::split::Split;
use crate::shared::constants::{DEFAULT_FRAME_EXTENSION, FRAME_EXTENSIONS};
use crate::shared::error::DatasetError;
use crate::video::domain::image_writer::ImageWriter;

/// Lays out produced frames as `<root>/<split>/<group>/<group>_<seq>.<ext>`.
///
/// Perturbed copies carry an `-up<rank>` suffix after the sequence number.
/// Nothing is ever overwritten: the root must not exist before the run and
/// every file is created fresh.
pub struct DatasetWriter {
    root: PathBuf,
    image_writer: Box<dyn ImageWriter>,
    size: Option<(u32, u32)>,
    extension: String,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>, image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            root: root.into(),
            image_writer,
            size: None,
            extension: DEFAULT_FRAME_EXTENSION.to_string(),
        }
    }

    /// Resizes every frame to `width x height` before encoding.
    pub fn with_size(mut self, size: Option<(u32, u32)>) -> Result<Self, DatasetError> {
        if let Some((w, h)) = size {
            if w == 0 || h == 0 {
                return Err(DatasetError::Config(format!(
                    "output size must be positive, got {w}x{h}"
                )));
            }
        }
        self.size = size;
        Ok(self)
    }

    /// Image format by file extension (`png`, `jpg`, `jpeg`).
    pub fn with_extension(mut self, extension: &str) -> Result<Self, DatasetError> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if !FRAME_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DatasetError::Config(format!(
                "unsupported image format '{extension}', expected one of {}",
                FRAME_EXTENSIONS.join(", ")
            )));
        }
        self.extension = extension;
        Ok(self)
    }

    /// Fails if the destination root is already present.
    pub fn ensure_fresh(&self) -> Result<(), DatasetError> {
        let exists = self
            .root
            .try_exists()
            .map_err(|e| DatasetError::io(&self.root, e))?;
        if exists {
            return Err(DatasetError::DestinationExists(self.root.clone()));
        }
        Ok(())
    }

    /// Creates the root and its split directories.
    pub fn create_layout(&self) -> Result<(), DatasetError> {
        for split in Split::ALL {
            let dir = self.root.join(split.dir_name());
            std::fs::create_dir_all(&dir).map_err(|e| DatasetError::io(&dir, e))?;
        }
        log::debug!("Created dataset layout under {}", self.root.display());
        Ok(())
    }

    pub fn output_path(&self, split: Split, produced: &ProducedFrame) -> PathBuf {
        let group = produced.group.to_string();
        let file_name = if produced.augmentation_rank == 0 {
            format!("{group}_{:06}.{}", produced.sequence, self.extension)
        } else {
            format!(
                "{group}_{:06}-up{}.{}",
                produced.sequence, produced.augmentation_rank, self.extension
            )
        };
        self.root.join(split.dir_name()).join(&group).join(file_name)
    }

    /// Encodes `produced` under `split` and returns the path written.
    pub fn write(&self, split: Split, produced: &ProducedFrame) -> Result<PathBuf, DatasetError> {
        let path = self.output_path(split, produced);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| DatasetError::io(dir, e))?;
        }
        if path.try_exists().map_err(|e| DatasetError::io(&path, e))? {
            return Err(DatasetError::WriteCollision(path));
        }

        match self.image_writer.write(&path, &produced.frame, self.size) {
            Ok(()) => {
                log::debug!(
                    "{} <- frame {} (copy {})",
                    path.display(),
                    produced.source_offset,
                    produced.augmentation_rank
                );
                Ok(path)
            }
            Err(source) if is_already_exists(source.as_ref()) => {
                Err(DatasetError::WriteCollision(path))
            }
            Err(source) => Err(DatasetError::Write { path, source }),
        }
    }
}

fn is_already_exists(err: &(dyn std::error::Error + 'static)) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::AlreadyExists)
}
