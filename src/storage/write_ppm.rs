use std::io::Write;

use crate::core::data::pixel_buffer::{BYTES_PER_PIXEL, PixelBuffer};

/// Writes `buffer` as a binary PPM, dropping the alpha channel.
pub fn write_ppm(buffer: &PixelBuffer, mut output: impl Write) -> std::io::Result<()> {
    let (width, height) = buffer.dimensions();

    // PPM header: P6 means binary RGB, then width, height and max_colour
    writeln!(output, "P6")?;
    writeln!(output, "{width} {height}")?;
    writeln!(output, "255")?;

    let rgb: Vec<u8> = buffer
        .buffer()
        .chunks_exact(BYTES_PER_PIXEL)
        .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
        .collect();
    output.write_all(&rgb)?;
    output.flush()
}
