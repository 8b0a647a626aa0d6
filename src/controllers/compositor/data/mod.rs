pub mod frame_buffer;
pub mod iteration_cache;
pub mod renderer_config;
