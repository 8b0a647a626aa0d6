use serde::{Deserialize, Serialize};

use crate::core::data::complex::Complex;

/// Width of the complex-plane window spanned by the canvas height at zoom 1.
pub const BASE_PLANE_SPAN: f64 = 4.0;

/// What part of the complex plane the canvas shows.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center_x: -0.5,
            center_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(center_x: f64, center_y: f64, zoom: f64) -> Self {
        Self {
            center_x,
            center_y,
            zoom,
        }
    }

    #[must_use]
    pub fn center(&self) -> Complex {
        Complex::new(self.center_x, self.center_y)
    }

    /// Plane distance covered by the canvas height.
    #[must_use]
    pub fn scale(&self) -> f64 {
        BASE_PLANE_SPAN / self.zoom
    }

    /// Plane distance covered by one pixel of a canvas `canvas_height` pixels tall.
    #[must_use]
    pub fn pixel_step(&self, canvas_height: u32) -> f64 {
        self.scale() / f64::from(canvas_height.max(1))
    }

    #[must_use]
    pub fn with_zoom_clamped(self, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            zoom: self.zoom.clamp(min_zoom, max_zoom),
            ..self
        }
    }
}
