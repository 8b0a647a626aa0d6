mod adapters;
mod controllers;
mod core;
mod presenters;
mod storage;

pub use adapters::clock::manual_clock::ManualClock;
pub use adapters::clock::system_clock::SystemClock;
pub use controllers::cli::still::{StillRenderController, StillRenderError};
pub use controllers::compositor::compositor::Compositor;
pub use controllers::compositor::data::frame_buffer::FrameBuffer;
pub use controllers::compositor::data::iteration_cache::IterationCache;
pub use controllers::compositor::data::renderer_config::RendererConfig;
pub use controllers::compositor::errors::config::ConfigError;
pub use controllers::compositor::ports::clock::Clock;
pub use controllers::compositor::ports::surface_presenter::SurfacePresenterPort;
pub use controllers::ports::file_presenter::FilePresenterPort;
pub use controllers::worker::codec::{
    ProtocolError, decode_request, decode_response, encode_request, encode_response,
};
pub use controllers::worker::errors::WorkerError;
pub use controllers::worker::inline_worker::InlineWorker;
pub use controllers::worker::messages::{
    CancelRequest, RenderRequest, RequestId, Tile, TileResponse, WorkerRequest, WorkerResponse,
};
pub use controllers::worker::ports::response_sink::{JsonLinesSink, ResponseSink};
pub use controllers::worker::ports::worker_port::WorkerPort;
pub use controllers::worker::scheduler::{BatchOutcome, RenderScheduler, SchedulerState};
pub use controllers::worker::stdio::run_stdio_worker;
pub use controllers::worker::thread_worker::ThreadWorker;
pub use crate::core::actions::colourise::colourise::colourise;
pub use crate::core::actions::colourise::ports::colour_map::ColourMap;
pub use crate::core::actions::compute_tile::compute_tile::{
    ComputedTile, compute_tile, compute_tile_values, compute_tile_with,
};
pub use crate::core::actions::compute_tile::ports::fractal_algorithm::FractalAlgorithm;
pub use crate::core::actions::generate_tiles::generate_tiles::{
    GridTile, generate_tile_grid, generate_tiles, sort_centre_out,
};
pub use crate::core::actions::resample::resample::{resample, resampled};
pub use crate::core::data::colour::Colour;
pub use crate::core::data::complex::Complex;
pub use crate::core::data::fractal_params::{
    FractalMode, FractalParams, FractalParamsUpdate, ParamsChange, TRIVIAL_SEED_THRESHOLD,
};
pub use crate::core::data::frame_tag::FrameTag;
pub use crate::core::data::iteration_buffer::IterationBuffer;
pub use crate::core::data::pixel_buffer::{
    BYTES_PER_PIXEL, PixelBuffer, PixelBufferData, PixelBufferError,
};
pub use crate::core::data::pixel_rect::{PixelRect, PixelRectError};
pub use crate::core::data::render_quality::{QualityProfile, RenderQuality};
pub use crate::core::data::viewport::{BASE_PLANE_SPAN, Viewport};
pub use crate::core::fractals::escape_time::algorithm::{
    EscapeTimeAlgorithm, ExponentPath, INSIDE, in_main_cardioid, in_period_two_bulb,
    smooth_iteration,
};
pub use crate::core::fractals::escape_time::colour_map::HueColourMap;
pub use crate::core::util::pixel_to_complex_coords::pixel_to_complex_coords;
pub use presenters::capture::frame_capture::FrameCapturePresenter;
pub use presenters::file::ppm::PpmFilePresenter;
pub use storage::write_ppm::write_ppm;
