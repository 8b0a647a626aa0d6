use crate::controllers::compositor::ports::surface_presenter::SurfacePresenterPort;
use crate::core::data::pixel_buffer::PixelBuffer;

/// Keeps the most recent frame instead of drawing it anywhere.
#[derive(Debug, Default)]
pub struct FrameCapturePresenter {
    frame: Option<PixelBuffer>,
    frames_presented: usize,
}

impl FrameCapturePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frame(&self) -> Option<&PixelBuffer> {
        self.frame.as_ref()
    }

    #[must_use]
    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }
}

impl SurfacePresenterPort for FrameCapturePresenter {
    fn present(&mut self, frame: &PixelBuffer) {
        self.frames_presented += 1;
        let same_size = self
            .frame
            .as_mut()
            .filter(|kept| kept.dimensions() == frame.dimensions());

        if let Some(kept) = same_size {
            kept.buffer_mut().copy_from_slice(frame.buffer());
        } else {
            self.frame = Some(frame.clone());
        }
    }
}
