use crate::core::data::pixel_buffer::PixelBuffer;

/// The 2D surface the compositor draws its visible frame onto.
pub trait SurfacePresenterPort {
    fn present(&mut self, frame: &PixelBuffer);
}
