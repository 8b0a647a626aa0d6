use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use thiserror::Error;

use crate::adapters::clock::system_clock::SystemClock;
use crate::controllers::compositor::compositor::Compositor;
use crate::controllers::compositor::data::renderer_config::RendererConfig;
use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::controllers::worker::errors::WorkerError;
use crate::controllers::worker::thread_worker::ThreadWorker;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::presenters::capture::frame_capture::FrameCapturePresenter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum StillRenderError {
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("render did not settle within {0:?}")]
    TimedOut(Duration),
    #[error("no frame was rendered")]
    NoFrame,
}

/// Renders the default view once, through the compositor and a worker
/// thread, and hands the settled frame to a file presenter.
pub struct StillRenderController<P: FilePresenterPort> {
    presenter: P,
    config: RendererConfig,
    width: u32,
    height: u32,
    timeout: Duration,
    buffer: Option<PixelBuffer>,
}

impl<P: FilePresenterPort> StillRenderController<P> {
    pub fn new(presenter: P, config: RendererConfig, width: u32, height: u32) -> Self {
        Self {
            presenter,
            config,
            width,
            height,
            timeout: DEFAULT_TIMEOUT,
            buffer: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    pub fn generate(&mut self) -> Result<(), StillRenderError> {
        let worker = ThreadWorker::spawn()?;
        let mut compositor = Compositor::new(
            self.config.clone(),
            worker,
            FrameCapturePresenter::new(),
            SystemClock::new(),
            self.width,
            self.height,
        );

        let quality = self.config.final_quality_for_zoom(compositor.viewport().zoom);
        info!("Rendering fractal...");
        info!("Image size: {}x{}", self.width, self.height);
        info!("Max iterations: {}", quality.max_iterations);

        let start = Instant::now();
        compositor.render();
        while !compositor.is_settled() {
            if start.elapsed() > self.timeout {
                compositor.destroy();
                return Err(StillRenderError::TimedOut(self.timeout));
            }
            thread::sleep(FRAME_INTERVAL);
            compositor.pump();
        }

        info!(
            "Duration: {:?} ({} frames presented)",
            start.elapsed(),
            compositor.presenter().frames_presented()
        );

        self.buffer = compositor.presenter().frame().cloned();
        compositor.destroy();

        if self.buffer.is_none() {
            return Err(StillRenderError::NoFrame);
        }
        Ok(())
    }

    pub fn write(&self, filepath: impl AsRef<Path>) -> std::io::Result<()> {
        if let Some(buffer) = &self.buffer {
            self.presenter.present(buffer, filepath)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingFilePresenter {
        written: RefCell<Vec<(String, (u32, u32))>>,
    }

    impl FilePresenterPort for RecordingFilePresenter {
        fn present(&self, buffer: &PixelBuffer, filepath: impl AsRef<Path>) -> std::io::Result<()> {
            self.written.borrow_mut().push((
                filepath.as_ref().display().to_string(),
                buffer.dimensions(),
            ));
            Ok(())
        }
    }

    #[test]
    fn test_generate_then_write_presents_settled_frame() {
        let mut controller = StillRenderController::new(
            RecordingFilePresenter::default(),
            RendererConfig::default(),
            48,
            32,
        );

        controller.generate().unwrap();
        controller.write("out/still.ppm").unwrap();

        let frame = controller.buffer().unwrap();
        assert_eq!(frame.dimensions(), (48, 32));
        // Default view is centred inside the main cardioid.
        assert_eq!(frame.pixel(24, 16), Some([0, 0, 0, 255]));
        assert_eq!(
            controller.presenter.written.borrow().as_slice(),
            &[("out/still.ppm".to_string(), (48, 32))]
        );
    }

    #[test]
    fn test_write_before_generate_is_a_noop() {
        let controller = StillRenderController::new(
            RecordingFilePresenter::default(),
            RendererConfig::default(),
            8,
            8,
        );

        controller.write("never.ppm").unwrap();

        assert!(controller.presenter.written.borrow().is_empty());
    }
}
