use crate::core::data::complex::Complex;
use crate::core::data::viewport::Viewport;

/// Maps a canvas pixel to its point in the complex plane.
///
/// The canvas height spans `viewport.scale()`; the width spans the same scale
/// times the aspect ratio. Screen y grows downward, plane y grows upward.
#[must_use]
pub fn pixel_to_complex_coords(
    px: u32,
    py: u32,
    canvas_width: u32,
    canvas_height: u32,
    viewport: &Viewport,
) -> Complex {
    let width = f64::from(canvas_width.max(1));
    let height = f64::from(canvas_height.max(1));
    let scale = viewport.scale();
    let aspect_ratio = width / height;

    Complex {
        real: viewport.center_x + (f64::from(px) / width - 0.5) * scale * aspect_ratio,
        imag: viewport.center_y - (f64::from(py) / height - 0.5) * scale,
    }
}
