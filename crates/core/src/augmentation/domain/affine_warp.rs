use ndarray::ArrayView3;

use crate::shared::frame::Frame;

/// Rotation about the frame center followed by a translation.
///
/// Positive angles rotate counter-clockwise as displayed; positive offsets
/// move content right and down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Perturbation {
    pub angle_degrees: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Perturbation {
    pub fn is_identity(&self) -> bool {
        self.angle_degrees % 360 == 0 && self.dx == 0 && self.dy == 0
    }
}

/// Applies `perturbation` to `frame`, keeping its dimensions.
///
/// Each output pixel is sampled bilinearly from its inverse-mapped source
/// position. Source coordinates outside the frame are clamped to the border,
/// so exposed areas repeat edge pixels instead of introducing a background.
pub fn warp(frame: &Frame, perturbation: &Perturbation) -> Frame {
    if perturbation.is_identity() {
        return frame.clone();
    }

    let src = frame.as_ndarray();
    let (height, width, channels) = src.dim();
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let (sin, cos) = (perturbation.angle_degrees as f64).to_radians().sin_cos();

    let mut out = frame.blank_like();
    {
        let mut dst = out.as_ndarray_mut();
        for y in 0..height {
            for x in 0..width {
                // Undo the translation, then the rotation about the center.
                let rx = x as f64 - perturbation.dx as f64 - cx;
                let ry = y as f64 - perturbation.dy as f64 - cy;
                let sx = cos * rx - sin * ry + cx;
                let sy = sin * rx + cos * ry + cy;
                for c in 0..channels {
                    dst[[y, x, c]] = sample_replicated(&src, sx, sy, c);
                }
            }
        }
    }
    out
}

fn sample_replicated(src: &ArrayView3<'_, u8>, x: f64, y: f64, channel: usize) -> u8 {
    let (height, width, _) = src.dim();
    let max_x = (width - 1) as f64;
    let max_y = (height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as usize;
    let y0 = y0 as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);

    let p = |yy: usize, xx: usize| src[[yy, xx, channel]] as f64;
    let top = p(y0, x0) * (1.0 - fx) + p(y0, x1) * fx;
    let bottom = p(y1, x0) * (1.0 - fx) + p(y1, x1) * fx;
    (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-channel frame whose pixel at (row, col) is `row * width + col`.
    fn ramp(width: u32, height: u32) -> Frame {
        let data = (0..width * height).map(|v| v as u8).collect();
        Frame::new(data, width, height, 1, 3)
    }

    fn pixel(frame: &Frame, row: usize, col: usize) -> u8 {
        frame.as_ndarray()[[row, col, 0]]
    }

    #[test]
    fn test_identity_returns_same_pixels() {
        let frame = ramp(5, 4);
        assert_eq!(warp(&frame, &Perturbation::default()), frame);
    }

    #[test]
    fn test_translation_shifts_and_replicates_edge() {
        let frame = ramp(4, 3);
        let out = warp(
            &frame,
            &Perturbation {
                angle_degrees: 0,
                dx: 1,
                dy: 0,
            },
        );
        for row in 0..3 {
            // Column 0 is exposed and repeats the original left edge.
            assert_eq!(pixel(&out, row, 0), pixel(&frame, row, 0));
            for col in 1..4 {
                assert_eq!(pixel(&out, row, col), pixel(&frame, row, col - 1));
            }
        }
    }

    #[test]
    fn test_vertical_translation_replicates_bottom_edge() {
        let frame = ramp(3, 4);
        let out = warp(
            &frame,
            &Perturbation {
                angle_degrees: 0,
                dx: 0,
                dy: -2,
            },
        );
        for col in 0..3 {
            assert_eq!(pixel(&out, 0, col), pixel(&frame, 2, col));
            assert_eq!(pixel(&out, 1, col), pixel(&frame, 3, col));
            assert_eq!(pixel(&out, 2, col), pixel(&frame, 3, col));
            assert_eq!(pixel(&out, 3, col), pixel(&frame, 3, col));
        }
    }

    #[test]
    fn test_half_turn_about_center_of_odd_frame() {
        let frame = ramp(3, 3);
        let out = warp(
            &frame,
            &Perturbation {
                angle_degrees: 180,
                dx: 0,
                dy: 0,
            },
        );
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(pixel(&out, row, col), pixel(&frame, 2 - row, 2 - col));
            }
        }
    }

    #[test]
    fn test_quarter_turn_is_counter_clockwise() {
        let frame = ramp(3, 3);
        let out = warp(
            &frame,
            &Perturbation {
                angle_degrees: 90,
                dx: 0,
                dy: 0,
            },
        );
        // The top-right corner moves to the top-left.
        assert_eq!(pixel(&out, 0, 0), pixel(&frame, 0, 2));
        assert_eq!(pixel(&out, 1, 1), pixel(&frame, 1, 1));
    }

    #[test]
    fn test_uniform_frame_stays_uniform() {
        let frame = Frame::new(vec![90u8; 8 * 6 * 3], 8, 6, 3, 0);
        let out = warp(
            &frame,
            &Perturbation {
                angle_degrees: 6,
                dx: -8,
                dy: 8,
            },
        );
        assert!(out.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_output_keeps_dimensions_and_index() {
        let frame = Frame::new(vec![10u8; 7 * 5 * 3], 7, 5, 3, 42);
        let out = warp(
            &frame,
            &Perturbation {
                angle_degrees: -4,
                dx: 3,
                dy: -1,
            },
        );
        assert_eq!((out.width(), out.height(), out.channels()), (7, 5, 3));
        assert_eq!(out.index(), 42);
    }

    #[test]
    fn test_full_turn_is_identity() {
        assert!(Perturbation {
            angle_degrees: 360,
            dx: 0,
            dy: 0
        }
        .is_identity());
    }
}
