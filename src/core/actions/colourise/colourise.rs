use rayon::prelude::*;

use crate::core::actions::colourise::ports::colour_map::ColourMap;
use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBufferData};

/// Maps every value to a tightly packed RGBA pixel, preserving order.
///
/// Both the tile path and the compositor's recolor path go through here, so a
/// recolor from cached values is byte-identical to a fresh render.
pub fn colourise<T, CMap>(values: &[T], mapper: &CMap) -> PixelBufferData
where
    T: Copy + Sync,
    CMap: ColourMap<T = T>,
{
    let mut pixels = vec![0; values.len() * BYTES_PER_PIXEL];

    pixels
        .par_chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(values.par_iter())
        .for_each(|(pixel, &value)| pixel.copy_from_slice(&mapper.map(value).to_rgba()));

    pixels
}
