use crate::core::actions::colourise::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;
use crate::core::fractals::escape_time::algorithm::INSIDE;

const SATURATION: f64 = 0.85;

/// Maps smooth iteration values onto a hue wheel starting at `color_hue`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HueColourMap {
    max_iterations: u32,
    color_hue: f64,
}

impl HueColourMap {
    #[must_use]
    pub fn new(max_iterations: u32, color_hue: f64) -> Self {
        Self {
            max_iterations,
            color_hue,
        }
    }
}

impl ColourMap for HueColourMap {
    type T = f64;

    fn map(&self, smooth_iteration: f64) -> Colour {
        if smooth_iteration == INSIDE {
            return Colour::OPAQUE_BLACK;
        }

        let t = (smooth_iteration / f64::from(self.max_iterations.max(1)))
            .sqrt()
            .clamp(0.0, 1.0);
        let hue = (self.color_hue + t * 360.0).rem_euclid(360.0);
        let value = 0.5 + 0.5 * t;

        Colour::from_hsv(hue, SATURATION, value)
    }
}
