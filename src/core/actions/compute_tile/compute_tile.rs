use rayon::prelude::*;

use crate::core::actions::colourise::colourise::colourise;
use crate::core::actions::colourise::ports::colour_map::ColourMap;
use crate::core::actions::compute_tile::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::fractal_params::FractalParams;
use crate::core::data::pixel_buffer::PixelBufferData;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::viewport::Viewport;
use crate::core::fractals::escape_time::algorithm::EscapeTimeAlgorithm;
use crate::core::fractals::escape_time::colour_map::HueColourMap;
use crate::core::util::pixel_to_complex_coords::pixel_to_complex_coords;

/// A finished tile: its place on the canvas, the raw values and the RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedTile {
    pub rect: PixelRect,
    pub iterations: Vec<f64>,
    pub pixels: PixelBufferData,
}

/// Evaluates `algorithm` for every pixel of `rect`, rows in parallel.
///
/// Returns row-major results for the tile only, not the whole canvas.
pub fn compute_tile_values<Alg>(
    rect: PixelRect,
    canvas_width: u32,
    canvas_height: u32,
    viewport: &Viewport,
    algorithm: &Alg,
) -> Vec<Alg::Success>
where
    Alg: FractalAlgorithm,
{
    let rows: Vec<Vec<Alg::Success>> = (rect.y..rect.bottom())
        .into_par_iter()
        .map(|py| {
            (rect.x..rect.right())
                .map(|px| {
                    let point =
                        pixel_to_complex_coords(px, py, canvas_width, canvas_height, viewport);
                    algorithm.compute(point)
                })
                .collect()
        })
        .collect();

    rows.into_iter().flatten().collect()
}

/// Computes and colours one tile with an algorithm and colour map prepared by the caller.
pub fn compute_tile_with<Alg, CMap>(
    rect: PixelRect,
    canvas_width: u32,
    canvas_height: u32,
    viewport: &Viewport,
    algorithm: &Alg,
    colour_map: &CMap,
) -> ComputedTile
where
    Alg: FractalAlgorithm<Success = f64>,
    CMap: ColourMap<T = f64>,
{
    let iterations = compute_tile_values(rect, canvas_width, canvas_height, viewport, algorithm);
    let pixels = colourise(&iterations, colour_map);

    ComputedTile {
        rect,
        iterations,
        pixels,
    }
}

/// Computes and colours one tile of the escape-time fractal.
pub fn compute_tile(
    rect: PixelRect,
    canvas_width: u32,
    canvas_height: u32,
    viewport: &Viewport,
    params: &FractalParams,
    max_iterations: u32,
) -> ComputedTile {
    let algorithm = EscapeTimeAlgorithm::new(*params, max_iterations);
    let colour_map = HueColourMap::new(max_iterations, params.color_hue);

    compute_tile_with(
        rect,
        canvas_width,
        canvas_height,
        viewport,
        &algorithm,
        &colour_map,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::complex::Complex;
    use crate::core::fractals::escape_time::algorithm::INSIDE;

    #[derive(Debug)]
    struct StubCoordinateAlgorithm {}

    impl FractalAlgorithm for StubCoordinateAlgorithm {
        type Success = (f64, f64);

        fn compute(&self, point: Complex) -> Self::Success {
            (point.real, point.imag)
        }
    }

    #[test]
    fn test_values_are_row_major_for_tile_only() {
        let viewport = Viewport::new(0.0, 0.0, 1.0);
        let rect = PixelRect::new(2, 3, 3, 2).unwrap();

        let values = compute_tile_values(rect, 10, 10, &viewport, &StubCoordinateAlgorithm {});

        assert_eq!(values.len(), 6);
        let expected: Vec<(f64, f64)> = (3..5)
            .flat_map(|py| (2..5).map(move |px| (px, py)))
            .map(|(px, py)| {
                let point = pixel_to_complex_coords(px, py, 10, 10, &viewport);
                (point.real, point.imag)
            })
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_tile_buffer_sizes() {
        let rect = PixelRect::new(0, 0, 7, 5).unwrap();
        let tile = compute_tile(
            rect,
            20,
            20,
            &Viewport::default(),
            &FractalParams::default(),
            32,
        );

        assert_eq!(tile.iterations.len(), 35);
        assert_eq!(tile.pixels.len(), 7 * 5 * 4);
        assert!(tile.pixels.chunks_exact(4).all(|p| p[3] == 255));
    }

    #[test]
    fn test_centre_pixel_of_scenario_a_is_black() {
        let params = FractalParams::default();
        let viewport = Viewport::new(0.0, 0.0, 1.0);
        let rect = PixelRect::new(50, 50, 1, 1).unwrap();

        let tile = compute_tile(rect, 100, 100, &viewport, &params, 64);

        assert_eq!(tile.iterations, vec![INSIDE]);
        assert_eq!(tile.pixels, vec![0, 0, 0, 255]);
    }

    #[test]
    fn test_tiles_agree_with_whole_canvas() {
        let params = FractalParams::default();
        let viewport = Viewport::new(-0.5, 0.1, 1.5);
        let whole = compute_tile(
            PixelRect::new(0, 0, 16, 12).unwrap(),
            16,
            12,
            &viewport,
            &params,
            48,
        );
        let part = compute_tile(
            PixelRect::new(4, 6, 8, 3).unwrap(),
            16,
            12,
            &viewport,
            &params,
            48,
        );

        for row in 0..3usize {
            for col in 0..8usize {
                let whole_index = (6 + row) * 16 + 4 + col;
                assert_eq!(
                    part.iterations[row * 8 + col].to_bits(),
                    whole.iterations[whole_index].to_bits()
                );
                assert_eq!(
                    &part.pixels[(row * 8 + col) * 4..(row * 8 + col) * 4 + 4],
                    &whole.pixels[whole_index * 4..whole_index * 4 + 4]
                );
            }
        }
    }

    #[test]
    fn test_compute_tile_is_deterministic() {
        let params = FractalParams {
            exponent: 3.0,
            real_c: -0.5,
            imag_c: 0.5,
            ..FractalParams::default()
        };
        let rect = PixelRect::new(0, 0, 32, 32).unwrap();
        let viewport = Viewport::new(0.0, 0.0, 1.0);

        let first = compute_tile(rect, 32, 32, &viewport, &params, 80);
        let second = compute_tile(rect, 32, 32, &viewport, &params, 80);

        assert_eq!(first, second);
    }
}
