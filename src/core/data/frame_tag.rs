use crate::core::data::viewport::Viewport;

/// Where a rendered buffer sits in the plane.
///
/// `viewport` is the visible view the buffer was rendered for; `pixel_step` is
/// the plane distance between neighbouring buffer pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTag {
    pub viewport: Viewport,
    pub pixel_step: f64,
}

impl FrameTag {
    #[must_use]
    pub fn new(viewport: Viewport, pixel_step: f64) -> Self {
        Self {
            viewport,
            pixel_step,
        }
    }

    /// Tag for a buffer showing `viewport` at its own height.
    #[must_use]
    pub fn for_canvas(viewport: Viewport, canvas_height: u32) -> Self {
        Self::new(viewport, viewport.pixel_step(canvas_height))
    }
}
