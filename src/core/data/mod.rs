pub mod colour;
pub mod complex;
pub mod fractal_params;
pub mod frame_tag;
pub mod iteration_buffer;
pub mod pixel_buffer;
pub mod pixel_rect;
pub mod render_quality;
pub mod viewport;
