use serde::{Deserialize, Serialize};

use crate::core::data::complex::Complex;

/// Below this magnitude a seed component counts as "unset" for mode detection.
pub const TRIVIAL_SEED_THRESHOLD: f64 = 0.001;

const DEFAULT_COLOR_HUE: f64 = 200.0;

/// Which variable the screen point feeds into the recurrence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FractalMode {
    /// Screen point is `c`, iteration starts at the configured `z0`.
    Mandelbrot,
    /// Screen point is `z0`, `c` is the configured constant.
    Julia,
}

impl FractalMode {
    #[must_use]
    pub fn is_julia(self) -> bool {
        matches!(self, Self::Julia)
    }
}

/// Parameters of the generalized recurrence `z ← z^k + c`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FractalParams {
    pub real_z0: f64,
    pub imag_z0: f64,
    pub real_c: f64,
    pub imag_c: f64,
    pub exponent: f64,
    pub imag_exponent: f64,
    pub color_hue: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            real_z0: 0.0,
            imag_z0: 0.0,
            real_c: 0.0,
            imag_c: 0.0,
            exponent: 2.0,
            imag_exponent: 0.0,
            color_hue: DEFAULT_COLOR_HUE,
        }
    }
}

impl FractalParams {
    #[must_use]
    pub fn z0(&self) -> Complex {
        Complex::new(self.real_z0, self.imag_z0)
    }

    #[must_use]
    pub fn c(&self) -> Complex {
        Complex::new(self.real_c, self.imag_c)
    }

    /// Julia when `c` is set and `z0` is not, Mandelbrot otherwise.
    ///
    /// This is a threshold heuristic: with both seeds set it falls back to
    /// Mandelbrot with a non-zero starting point.
    #[must_use]
    pub fn mode(&self) -> FractalMode {
        let c_set = self.real_c.abs() > TRIVIAL_SEED_THRESHOLD
            || self.imag_c.abs() > TRIVIAL_SEED_THRESHOLD;
        let z0_unset = self.real_z0.abs() < TRIVIAL_SEED_THRESHOLD
            && self.imag_z0.abs() < TRIVIAL_SEED_THRESHOLD;

        if c_set && z0_unset {
            FractalMode::Julia
        } else {
            FractalMode::Mandelbrot
        }
    }

    /// Applies the fields present in `update`, returning what kind of change it was.
    pub fn apply(&mut self, update: &FractalParamsUpdate) -> ParamsChange {
        let before = *self;

        if let Some(value) = update.real_z0 {
            self.real_z0 = value;
        }
        if let Some(value) = update.imag_z0 {
            self.imag_z0 = value;
        }
        if let Some(value) = update.real_c {
            self.real_c = value;
        }
        if let Some(value) = update.imag_c {
            self.imag_c = value;
        }
        if let Some(value) = update.exponent {
            self.exponent = value;
        }
        if let Some(value) = update.imag_exponent {
            self.imag_exponent = value;
        }
        if let Some(value) = update.color_hue {
            self.color_hue = value;
        }

        let hue_changed = before.color_hue != self.color_hue;
        let shape_changed = FractalParams {
            color_hue: self.color_hue,
            ..before
        } != *self;

        match (shape_changed, hue_changed) {
            (false, false) => ParamsChange::None,
            (false, true) => ParamsChange::HueOnly,
            (true, _) => ParamsChange::Shape,
        }
    }
}

/// Partial parameter update, as sent by slider handlers.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FractalParamsUpdate {
    pub real_z0: Option<f64>,
    pub imag_z0: Option<f64>,
    pub real_c: Option<f64>,
    pub imag_c: Option<f64>,
    pub exponent: Option<f64>,
    pub imag_exponent: Option<f64>,
    pub color_hue: Option<f64>,
}

impl FractalParamsUpdate {
    #[must_use]
    pub fn hue(color_hue: f64) -> Self {
        Self {
            color_hue: Some(color_hue),
            ..Self::default()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParamsChange {
    None,
    HueOnly,
    Shape,
}
