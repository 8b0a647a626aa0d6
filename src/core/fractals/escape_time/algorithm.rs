use crate::core::actions::compute_tile::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::complex::Complex;
use crate::core::data::fractal_params::{FractalMode, FractalParams};

/// Returned for points that never escape (or are known to lie inside the set).
pub const INSIDE: f64 = -1.0;

const ESCAPE_RADIUS_SQUARED: f64 = 4.0;
const MIN_POLAR_RADIUS: f64 = 1e-10;

/// Shape of the exponent `k`, which selects how `z^k` is evaluated.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ExponentPath {
    /// `k = 2`: plain complex squaring.
    Quadratic,
    /// `k = a`, real and not 2: polar power.
    Real(f64),
    /// `k = a + bi`: full complex power.
    Complex { real: f64, imag: f64 },
}

impl ExponentPath {
    #[must_use]
    pub fn for_params(params: &FractalParams) -> Self {
        if params.imag_exponent != 0.0 {
            Self::Complex {
                real: params.exponent,
                imag: params.imag_exponent,
            }
        } else if params.exponent == 2.0 {
            Self::Quadratic
        } else {
            Self::Real(params.exponent)
        }
    }
}

#[must_use]
pub fn in_main_cardioid(x: f64, y: f64) -> bool {
    let q = (x - 0.25) * (x - 0.25) + y * y;
    q * (q + x - 0.25) < 0.25 * y * y
}

#[must_use]
pub fn in_period_two_bulb(x: f64, y: f64) -> bool {
    (x + 1.0) * (x + 1.0) + y * y < 0.0625
}

/// Escape-time value of `(x0, y0)`: [`INSIDE`] or a smooth iteration count in
/// `[0, max_iterations + 1)`.
#[must_use]
pub fn smooth_iteration(
    x0: f64,
    y0: f64,
    params: &FractalParams,
    max_iterations: u32,
    use_julia: bool,
) -> f64 {
    let point = Complex::new(x0, y0);

    let (mut z, c) = if use_julia {
        (point, params.c())
    } else {
        if in_main_cardioid(x0, y0) || in_period_two_bulb(x0, y0) {
            return INSIDE;
        }
        (params.z0(), point)
    };

    let path = ExponentPath::for_params(params);

    for iteration in 0..max_iterations {
        let magnitude_squared = z.magnitude_squared();
        if magnitude_squared > ESCAPE_RADIUS_SQUARED {
            return smooth_escape_value(iteration, magnitude_squared);
        }

        z = match path {
            ExponentPath::Quadratic => z * z + c,
            ExponentPath::Real(exponent) => {
                let (radius, angle) = z.to_polar();
                let next = Complex::from_polar(radius.powf(exponent), angle * exponent) + c;
                if !next.is_finite() {
                    return f64::from(iteration);
                }
                next
            }
            ExponentPath::Complex { real, imag } => {
                let (radius, angle) = z.to_polar();
                if radius < MIN_POLAR_RADIUS {
                    return INSIDE;
                }

                let magnitude = radius.powf(real) * (-imag * angle).exp();
                let rotated = real * angle + imag * radius.ln();
                if !magnitude.is_finite() || !rotated.is_finite() {
                    return f64::from(iteration);
                }

                let next = Complex::from_polar(magnitude, rotated) + c;
                if !next.is_finite() {
                    return f64::from(iteration);
                }
                next
            }
        };
    }

    INSIDE
}

fn smooth_escape_value(iteration: u32, magnitude_squared: f64) -> f64 {
    let value = f64::from(iteration) + 1.0 - (magnitude_squared.log2() / 2.0).log2();
    value.max(0.0)
}

/// [`smooth_iteration`] bound to one set of parameters and an iteration budget.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EscapeTimeAlgorithm {
    params: FractalParams,
    max_iterations: u32,
    mode: FractalMode,
}

impl EscapeTimeAlgorithm {
    /// Resolves the fractal mode once; it stays fixed for the whole pass.
    #[must_use]
    pub fn new(params: FractalParams, max_iterations: u32) -> Self {
        Self {
            params,
            max_iterations,
            mode: params.mode(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> FractalMode {
        self.mode
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl FractalAlgorithm for EscapeTimeAlgorithm {
    type Success = f64;

    #[inline]
    fn compute(&self, point: Complex) -> f64 {
        smooth_iteration(
            point.real,
            point.imag,
            &self.params,
            self.max_iterations,
            self.mode.is_julia(),
        )
    }
}
