use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec).
///
/// `advance` decodes the next frame into an internal buffer; only
/// `materialize` pays for the RGB24 conversion and the copy into a [`Frame`].
pub struct FfmpegReader {
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<ffmpeg_next::decoder::Video>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    decoded: ffmpeg_next::util::frame::video::Video,
    video_stream_index: usize,
    width: u32,
    height: u32,
    /// Index of the frame under the cursor, `None` before the first advance.
    position: Option<usize>,
    flushing: bool,
    finished: bool,
}

impl FfmpegReader {
    pub fn new() -> Self {
        Self {
            input_ctx: None,
            decoder: None,
            scaler: None,
            decoded: ffmpeg_next::util::frame::video::Video::empty(),
            video_stream_index: 0,
            width: 0,
            height: 0,
            position: None,
            flushing: false,
            finished: false,
        }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        self.close();

        let ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.avg_frame_rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let total_frames = if stream.frames() > 0 {
            stream.frames() as usize
        } else {
            estimate_frame_count(&stream, ictx.duration(), fps)
        };

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg_next::format::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            total_frames,
            source_path: Some(path.to_path_buf()),
        };

        self.video_stream_index = video_stream_index;
        self.width = decoder.width();
        self.height = decoder.height();
        self.decoder = Some(decoder);
        self.scaler = Some(scaler);
        self.input_ctx = Some(ictx);

        Ok(metadata)
    }

    fn advance(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        if self.finished {
            return Ok(false);
        }
        let (Some(ictx), Some(decoder)) = (self.input_ctx.as_mut(), self.decoder.as_mut()) else {
            return Err("FfmpegReader: not opened".into());
        };

        loop {
            match decoder.receive_frame(&mut self.decoded) {
                Ok(()) => {
                    self.position = Some(self.position.map_or(0, |p| p + 1));
                    return Ok(true);
                }
                Err(ffmpeg_next::Error::Eof) => {
                    self.finished = true;
                    return Ok(false);
                }
                Err(ffmpeg_next::Error::Other { errno })
                    if errno == ffmpeg_next::util::error::EAGAIN && !self.flushing => {}
                Err(e) => return Err(Box::new(e)),
            }

            match ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.video_stream_index {
                        continue;
                    }
                    decoder.send_packet(&packet)?;
                }
                None => {
                    decoder.send_eof()?;
                    self.flushing = true;
                }
            }
        }
    }

    fn materialize(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let Some(index) = self.position else {
            return Err("FfmpegReader: no frame under cursor".into());
        };
        if self.finished {
            return Err("FfmpegReader: cursor is past the end of the stream".into());
        }
        let scaler = self.scaler.as_mut().ok_or("FfmpegReader: not opened")?;

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&self.decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        Ok(Frame::new(pixels, self.width, self.height, 3, index))
    }

    fn close(&mut self) {
        self.input_ctx = None;
        self.decoder = None;
        self.scaler = None;
        self.decoded = ffmpeg_next::util::frame::video::Video::empty();
        self.position = None;
        self.flushing = false;
        self.finished = false;
    }
}

/// Frame count for containers that do not record `nb_frames`, derived from
/// the stream duration (or the container duration) and the frame rate.
fn estimate_frame_count(
    stream: &ffmpeg_next::format::stream::Stream,
    container_duration: i64,
    fps: f64,
) -> usize {
    if fps <= 0.0 {
        return 0;
    }
    let time_base = stream.time_base();
    let seconds = if stream.duration() > 0 && time_base.denominator() != 0 {
        stream.duration() as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
    } else if container_duration > 0 {
        container_duration as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        0.0
    };
    (seconds * fps).round() as usize
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may pad each row (stride > width*3); the padding is dropped.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
