use rayon::prelude::*;

use crate::core::data::colour::Colour;
use crate::core::data::frame_tag::FrameTag;
use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer};

/// Nearest source pixel for one target pixel centre, if the source covers it.
#[inline]
fn source_index(
    target: (u32, u32),
    target_size: (u32, u32),
    target_tag: &FrameTag,
    source_size: (u32, u32),
    source_tag: &FrameTag,
) -> Option<(u32, u32)> {
    let (px, py) = target;
    let (tw, th) = target_size;
    let (sw, sh) = source_size;

    let plane_x = target_tag.viewport.center_x
        + (f64::from(px) + 0.5 - f64::from(tw) / 2.0) * target_tag.pixel_step;
    let plane_y = target_tag.viewport.center_y
        - (f64::from(py) + 0.5 - f64::from(th) / 2.0) * target_tag.pixel_step;

    let sx = ((plane_x - source_tag.viewport.center_x) / source_tag.pixel_step
        + f64::from(sw) / 2.0)
        .floor();
    let sy = ((source_tag.viewport.center_y - plane_y) / source_tag.pixel_step
        + f64::from(sh) / 2.0)
        .floor();

    if sx >= 0.0 && sy >= 0.0 && sx < f64::from(sw) && sy < f64::from(sh) {
        Some((sx as u32, sy as u32))
    } else {
        None
    }
}

/// Redraws `source` into `target` under the translate + uniform scale mapping
/// implied by their tags.
///
/// Target pixels with no source pixel behind them become opaque black.
pub fn resample(
    source: &PixelBuffer,
    source_tag: &FrameTag,
    target: &mut PixelBuffer,
    target_tag: &FrameTag,
) {
    let target_size = target.dimensions();
    let source_size = source.dimensions();
    let source_width = source_size.0 as usize;
    let source_data = source.buffer();
    let black = Colour::OPAQUE_BLACK.to_rgba();
    let row_bytes = target_size.0 as usize * BYTES_PER_PIXEL;

    if row_bytes == 0 {
        return;
    }

    target
        .buffer_mut()
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let found = source_index(
                    (px as u32, py as u32),
                    target_size,
                    target_tag,
                    source_size,
                    source_tag,
                );

                match found {
                    Some((sx, sy)) => {
                        let start = (sy as usize * source_width + sx as usize) * BYTES_PER_PIXEL;
                        pixel.copy_from_slice(&source_data[start..start + BYTES_PER_PIXEL]);
                    }
                    None => pixel.copy_from_slice(&black),
                }
            }
        });
}

/// Allocates a `width` x `height` buffer for `target_tag` and resamples into it.
#[must_use]
pub fn resampled(
    source: &PixelBuffer,
    source_tag: &FrameTag,
    width: u32,
    height: u32,
    target_tag: &FrameTag,
) -> PixelBuffer {
    let mut target = PixelBuffer::new(width, height);
    resample(source, source_tag, &mut target, target_tag);
    target
}
