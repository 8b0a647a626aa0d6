use crate::core::data::pixel_buffer::PixelBufferError;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::fractals::escape_time::algorithm::INSIDE;

/// Row-major smooth iteration values, one per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationBuffer {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl IterationBuffer {
    /// Every value starts as the inside sentinel.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![INSIDE; width as usize * height as usize],
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn blit(&mut self, rect: PixelRect, values: &[f64]) -> Result<(), PixelBufferError> {
        if !rect.fits_within(self.width, self.height) {
            return Err(PixelBufferError::RectOutsideBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }

        let expected = rect.area() as usize;
        if values.len() != expected {
            return Err(PixelBufferError::BoundsMismatch {
                expected,
                actual: values.len(),
            });
        }

        let row_len = rect.width as usize;
        for (row, source) in values.chunks_exact(row_len).enumerate() {
            let start = (rect.y as usize + row) * self.width as usize + rect.x as usize;
            self.values[start..start + row_len].copy_from_slice(source);
        }

        Ok(())
    }
}
