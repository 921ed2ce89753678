use crate::shared::constants::{DEFAULT_TRIM_FPS, DEFAULT_TRIM_SECONDS};
use crate::shared::error::DatasetError;

/// Which ends of a video lose `frames_per_edge` frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimEdges {
    Leading,
    Both,
}

impl TrimEdges {
    pub fn parse(name: &str) -> Result<Self, DatasetError> {
        match name.to_ascii_lowercase().as_str() {
            "leading" => Ok(TrimEdges::Leading),
            "both" => Ok(TrimEdges::Both),
            other => Err(DatasetError::Config(format!(
                "unknown trim edges '{other}', expected 'leading' or 'both'"
            ))),
        }
    }
}

/// Run-wide edge trim, shared by counting and sampling so both passes agree
/// on every video's usable range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeTrim {
    frames_per_edge: usize,
    edges: TrimEdges,
}

impl EdgeTrim {
    pub fn new(frames_per_edge: usize, edges: TrimEdges) -> Self {
        Self {
            frames_per_edge,
            edges,
        }
    }

    /// Trim of `seconds` per edge at `fps` frames per second.
    pub fn from_seconds(seconds: f64, fps: f64, edges: TrimEdges) -> Result<Self, DatasetError> {
        if !(seconds >= 0.0 && seconds.is_finite()) {
            return Err(DatasetError::Config(format!(
                "trim seconds must be a non-negative number, got {seconds}"
            )));
        }
        if !(fps > 0.0 && fps.is_finite()) {
            return Err(DatasetError::Config(format!(
                "trim fps must be positive, got {fps}"
            )));
        }
        Ok(Self::new((seconds * fps).round() as usize, edges))
    }

    pub fn none() -> Self {
        Self::new(0, TrimEdges::Both)
    }

    pub fn frames_per_edge(&self) -> usize {
        self.frames_per_edge
    }

    pub fn edges(&self) -> TrimEdges {
        self.edges
    }

    /// First usable frame index.
    pub fn leading_offset(&self) -> usize {
        self.frames_per_edge
    }

    /// Frames removed from every video.
    pub fn total_trim(&self) -> usize {
        match self.edges {
            TrimEdges::Leading => self.frames_per_edge,
            TrimEdges::Both => self.frames_per_edge * 2,
        }
    }

    /// Raw count minus the trim, or `None` when the video is shorter than the trim.
    pub fn usable_frames(&self, raw_frames: usize) -> Option<usize> {
        raw_frames.checked_sub(self.total_trim())
    }
}

impl Default for EdgeTrim {
    fn default() -> Self {
        Self::from_seconds(DEFAULT_TRIM_SECONDS, DEFAULT_TRIM_FPS, TrimEdges::Both)
            .unwrap_or_else(|_| Self::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_one_second_at_30fps_on_both_edges() {
        let trim = EdgeTrim::default();
        assert_eq!(trim.frames_per_edge(), 30);
        assert_eq!(trim.edges(), TrimEdges::Both);
        assert_eq!(trim.total_trim(), 60);
        assert_eq!(trim.leading_offset(), 30);
    }

    #[rstest]
    #[case::leading(TrimEdges::Leading, 100, Some(70))]
    #[case::both(TrimEdges::Both, 100, Some(40))]
    #[case::exactly_consumed(TrimEdges::Both, 60, Some(0))]
    #[case::shorter_than_trim(TrimEdges::Both, 59, None)]
    fn test_usable_frames(
        #[case] edges: TrimEdges,
        #[case] raw: usize,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(EdgeTrim::new(30, edges).usable_frames(raw), expected);
    }

    #[test]
    fn test_from_seconds_rounds_to_frames() {
        let trim = EdgeTrim::from_seconds(0.5, 29.97, TrimEdges::Leading).unwrap();
        assert_eq!(trim.frames_per_edge(), 15);
    }

    #[rstest]
    #[case::negative_seconds(-1.0, 30.0)]
    #[case::zero_fps(1.0, 0.0)]
    #[case::nan_seconds(f64::NAN, 30.0)]
    fn test_from_seconds_rejects_invalid(#[case] seconds: f64, #[case] fps: f64) {
        assert!(matches!(
            EdgeTrim::from_seconds(seconds, fps, TrimEdges::Both),
            Err(DatasetError::Config(_))
        ));
    }

    #[rstest]
    #[case::leading("leading", TrimEdges::Leading)]
    #[case::both("both", TrimEdges::Both)]
    #[case::mixed_case("Both", TrimEdges::Both)]
    #[case::upper_case("LEADING", TrimEdges::Leading)]
    fn test_parse_trim_edges(#[case] name: &str, #[case] expected: TrimEdges) {
        assert_eq!(TrimEdges::parse(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown_edges() {
        assert!(matches!(
            TrimEdges::parse("trailing"),
            Err(DatasetError::Config(_))
        ));
    }

    #[test]
    fn test_none_keeps_everything() {
        assert_eq!(EdgeTrim::none().usable_frames(5), Some(5));
        assert_eq!(EdgeTrim::none().leading_offset(), 0);
    }
}
