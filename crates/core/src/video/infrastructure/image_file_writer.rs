use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single frame to an image file using the `image` crate.
///
/// The file is created with `create_new`, so an occupied path is reported by
/// the filesystem itself rather than by a racy existence check.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let format = image::ImageFormat::from_path(path)?;

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let img = match size {
            Some((w, h)) if (w, h) != (frame.width(), frame.height()) => {
                image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle)
            }
            _ => img,
        };

        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut out = BufWriter::new(file);
        img.write_to(&mut out, format)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let data = [r, g, b].repeat((width * height) as usize);
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_write_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("B1H1_North_000000.png");
        let writer = ImageFileWriter::new();
        writer
            .write(&path, &make_frame(50, 40, 50, 100, 200), None)
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (50, 40));
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_write_with_resize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resized.png");
        let writer = ImageFileWriter::new();
        writer
            .write(&path, &make_frame(200, 100, 128, 128, 128), Some((64, 32)))
            .unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 32);
    }

    #[test]
    fn test_write_jpeg_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let writer = ImageFileWriter::new();
        writer
            .write(&path, &make_frame(16, 16, 10, 20, 30), None)
            .unwrap();

        assert_eq!(
            image::ImageReader::open(&path).unwrap().format(),
            Some(image::ImageFormat::Jpeg)
        );
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.png");
        std::fs::write(&path, b"original").unwrap();

        let writer = ImageFileWriter::new();
        let err = writer
            .write(&path, &make_frame(4, 4, 0, 0, 0), None)
            .unwrap_err();

        let io_err = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), std::io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn test_unknown_extension_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ImageFileWriter::new();
        assert!(writer
            .write(&dir.path().join("frame.xyz"), &make_frame(4, 4, 0, 0, 0), None)
            .is_err());
    }

    #[test]
    fn test_missing_parent_returns_error() {
        let writer = ImageFileWriter::new();
        assert!(writer
            .write(Path::new("/nonexistent/dir/out.png"), &make_frame(4, 4, 0, 0, 0), None)
            .is_err());
    }
}
