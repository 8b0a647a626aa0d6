use crate::core::data::colour::Colour;
use crate::core::data::pixel_rect::PixelRect;
use thiserror::Error;

pub const BYTES_PER_PIXEL: usize = 4;

fn buffer_size_for(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PixelBufferError {
    #[error("pixel at x:{x}, y:{y} outside of {width}x{height} buffer")]
    PixelOutsideBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("expected {expected} bytes of pixel data, got {actual}")]
    BoundsMismatch { expected: usize, actual: usize },
    #[error(
        "rect {}x{} at ({}, {}) does not fit a {width}x{height} buffer",
        rect.width, rect.height, rect.x, rect.y
    )]
    RectOutsideBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },
}

pub type PixelBufferData = Vec<u8>;

/// Row-major RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    buffer: PixelBufferData,
}

impl PixelBuffer {
    /// Fully transparent black.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; buffer_size_for(width, height)],
        }
    }

    #[must_use]
    pub fn filled(width: u32, height: u32, colour: Colour) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(colour);
        buffer
    }

    pub fn from_data(
        width: u32,
        height: u32,
        buffer: PixelBufferData,
    ) -> Result<Self, PixelBufferError> {
        let expected = buffer_size_for(width, height);

        if expected != buffer.len() {
            return Err(PixelBufferError::BoundsMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn buffer(&self) -> &PixelBufferData {
        &self.buffer
    }

    #[must_use]
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn into_data(self) -> PixelBufferData {
        self.buffer
    }

    pub fn fill(&mut self, colour: Colour) {
        let rgba = colour.to_rgba();
        for pixel in self.buffer.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&rgba);
        }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = self.index_of(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.buffer[index..index + BYTES_PER_PIXEL]);
        Some(rgba)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Colour) -> Result<(), PixelBufferError> {
        if x >= self.width || y >= self.height {
            return Err(PixelBufferError::PixelOutsideBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let index = self.index_of(x, y);
        self.buffer[index..index + BYTES_PER_PIXEL].copy_from_slice(&colour.to_rgba());

        Ok(())
    }

    /// Copies a tightly packed RGBA block into `rect`.
    pub fn blit(&mut self, rect: PixelRect, pixels: &[u8]) -> Result<(), PixelBufferError> {
        if !rect.fits_within(self.width, self.height) {
            return Err(PixelBufferError::RectOutsideBounds {
                rect,
                width: self.width,
                height: self.height,
            });
        }

        let expected = buffer_size_for(rect.width, rect.height);
        if pixels.len() != expected {
            return Err(PixelBufferError::BoundsMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let row_bytes = rect.width as usize * BYTES_PER_PIXEL;
        for (row, source) in pixels.chunks_exact(row_bytes).enumerate() {
            let start = self.index_of(rect.x, rect.y + row as u32);
            self.buffer[start..start + row_bytes].copy_from_slice(source);
        }

        Ok(())
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}
