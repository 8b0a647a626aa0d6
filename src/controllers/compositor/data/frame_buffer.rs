use crate::core::actions::resample::resample::resample;
use crate::core::data::frame_tag::FrameTag;
use crate::core::data::pixel_buffer::PixelBuffer;

/// Pixels plus the plane placement they were rendered for.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub pixels: PixelBuffer,
    pub tag: FrameTag,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(pixels: PixelBuffer, tag: FrameTag) -> Self {
        Self { pixels, tag }
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Draws this frame into `target` as seen through `target_tag`.
    pub fn draw_into(&self, target: &mut PixelBuffer, target_tag: &FrameTag) {
        resample(&self.pixels, &self.tag, target, target_tag);
    }
}
