use crate::shared::frame::Frame;

/// Produces a synthetic variant of a sampled frame for upsampling.
///
/// Implementations may be stateful (e.g. holding a random number
/// generator), hence `&mut self`. The output has the input's dimensions.
pub trait FramePerturber {
    fn perturb(&mut self, frame: &Frame) -> Frame;
}
