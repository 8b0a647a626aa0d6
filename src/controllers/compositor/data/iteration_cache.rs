use crate::core::data::iteration_buffer::IterationBuffer;
use crate::core::data::pixel_rect::PixelRect;

/// Smooth iteration values behind the overscan pixels of one request.
///
/// Usable for recolouring only once every tile arrived with its values.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationCache {
    values: IterationBuffer,
    max_iterations: u32,
    complete: bool,
    missing_values: bool,
}

impl IterationCache {
    #[must_use]
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            values: IterationBuffer::new(width, height),
            max_iterations,
            complete: false,
            missing_values: false,
        }
    }

    /// Stores one tile's values. A tile without usable values spoils the cache.
    pub fn store(&mut self, rect: PixelRect, iterations: &[f64]) {
        if iterations.is_empty() || self.values.blit(rect, iterations).is_err() {
            self.missing_values = true;
        }
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.values.dimensions()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        self.values.values()
    }

    /// Whether the cache can stand in for a full re-render of a
    /// `width` x `height` overscan.
    #[must_use]
    pub fn is_usable_for(&self, width: u32, height: u32) -> bool {
        self.complete && !self.missing_values && self.dimensions() == (width, height)
    }
}
