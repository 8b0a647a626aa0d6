use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::controllers::compositor::data::frame_buffer::FrameBuffer;
use crate::controllers::compositor::data::iteration_cache::IterationCache;
use crate::controllers::compositor::data::renderer_config::RendererConfig;
use crate::controllers::compositor::ports::clock::Clock;
use crate::controllers::compositor::ports::surface_presenter::SurfacePresenterPort;
use crate::controllers::worker::messages::{
    CancelRequest, RenderRequest, RequestId, TileResponse, WorkerRequest, WorkerResponse,
};
use crate::controllers::worker::ports::worker_port::WorkerPort;
use crate::core::actions::colourise::colourise::colourise;
use crate::core::data::colour::Colour;
use crate::core::data::fractal_params::{FractalParams, FractalParamsUpdate, ParamsChange};
use crate::core::data::frame_tag::FrameTag;
use crate::core::data::pixel_buffer::PixelBuffer;
use crate::core::data::render_quality::QualityProfile;
use crate::core::data::viewport::Viewport;
use crate::core::fractals::escape_time::colour_map::HueColourMap;

/// Fraction of a pixel the coverage check tolerates for rounding.
const COVERAGE_SLACK: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct ActiveRequest {
    id: RequestId,
    profile: QualityProfile,
    complete: bool,
}

#[derive(Debug, Copy, Clone, Default)]
struct Interaction {
    active: bool,
    ended_at: Option<Duration>,
}

impl Interaction {
    /// A gesture is running or its debounce window has not elapsed yet.
    fn is_pending(&self) -> bool {
        self.active || self.ended_at.is_some()
    }
}

/// Keeps the visible surface stable while the view changes.
///
/// Renders go to an overscan buffer larger than the visible surface; the
/// visible frame is always a crop of it. New overscan buffers start as a
/// resampled copy of the last settled render (or the previous overscan), so
/// the screen never flashes to black while tiles stream in.
pub struct Compositor<W, P, C>
where
    W: WorkerPort,
    P: SurfacePresenterPort,
    C: Clock,
{
    config: RendererConfig,
    worker: W,
    presenter: P,
    clock: C,
    display_width: u32,
    display_height: u32,
    resolution: f64,
    viewport: Viewport,
    params: FractalParams,
    visible: PixelBuffer,
    overscan: Option<FrameBuffer>,
    background: Option<FrameBuffer>,
    cache: Option<IterationCache>,
    request_counter: RequestId,
    active: Option<ActiveRequest>,
    interaction: Interaction,
    destroyed: bool,
}

impl<W, P, C> Compositor<W, P, C>
where
    W: WorkerPort,
    P: SurfacePresenterPort,
    C: Clock,
{
    /// Sets up an idle compositor; nothing is requested until [`Self::render`].
    pub fn new(
        config: RendererConfig,
        worker: W,
        presenter: P,
        clock: C,
        display_width: u32,
        display_height: u32,
    ) -> Self {
        let resolution = 1.0_f64.clamp(config.min_resolution, config.max_resolution);
        let viewport = Viewport::default().with_zoom_clamped(config.min_zoom, config.max_zoom);
        let display_width = display_width.max(1);
        let display_height = display_height.max(1);
        let (width, height) = scaled_size(display_width, display_height, resolution);

        Self {
            config,
            worker,
            presenter,
            clock,
            display_width,
            display_height,
            resolution,
            viewport,
            params: FractalParams::default(),
            visible: PixelBuffer::filled(width, height, Colour::OPAQUE_BLACK),
            overscan: None,
            background: None,
            cache: None,
            request_counter: 0,
            active: None,
            interaction: Interaction::default(),
            destroyed: false,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn params(&self) -> FractalParams {
        self.params
    }

    #[must_use]
    pub fn visible(&self) -> &PixelBuffer {
        &self.visible
    }

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[must_use]
    pub fn worker(&self) -> &W {
        &self.worker
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[must_use]
    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width, self.display_height)
    }

    /// Size of the visible surface in pixels: display size times resolution.
    #[must_use]
    pub fn render_size(&self) -> (u32, u32) {
        self.visible.dimensions()
    }

    #[must_use]
    pub fn overscan_size(&self) -> (u32, u32) {
        let (width, height) = self.render_size();
        (
            self.config.overscan_length(width),
            self.config.overscan_length(height),
        )
    }

    #[must_use]
    pub fn background(&self) -> Option<&FrameBuffer> {
        self.background.as_ref()
    }

    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    #[must_use]
    pub fn active_request_id(&self) -> Option<RequestId> {
        self.active.map(|active| active.id)
    }

    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.interaction.active
    }

    /// The last request finished at final quality and no gesture is pending.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.interaction.is_pending()
            && self
                .active
                .is_some_and(|active| active.complete && active.profile == QualityProfile::Final)
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Requests a render of the current view: interactive quality while a
    /// gesture is pending, final quality otherwise.
    pub fn render(&mut self) {
        if self.destroyed {
            return;
        }

        let profile = if self.interaction.is_pending() {
            QualityProfile::Interactive
        } else {
            QualityProfile::Final
        };
        self.issue_render(profile);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }

        self.display_width = width.max(1);
        self.display_height = height.max(1);
        self.reallocate_visible();
        self.render();
    }

    /// Sets the render size as a multiple of the display size.
    pub fn set_resolution(&mut self, multiplier: f64) {
        if self.destroyed || !multiplier.is_finite() {
            return;
        }

        self.resolution = multiplier.clamp(self.config.min_resolution, self.config.max_resolution);
        self.reallocate_visible();
        self.render();
    }

    /// Moves the view by a drag of `dx`, `dy` display pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if self.destroyed {
            return;
        }

        let step = self.viewport.scale() / f64::from(self.display_height);
        self.viewport.center_x -= dx * step;
        self.viewport.center_y += dy * step;

        if self.overscan_covers_view() {
            trace!(
                "pan served from overscan at ({}, {})",
                self.viewport.center_x, self.viewport.center_y
            );
            self.recrop();
        } else {
            self.render();
        }
    }

    /// Multiplies the zoom by `factor`. With an `origin` in display pixels,
    /// the plane point under it stays put on screen.
    pub fn zoom(&mut self, factor: f64, origin: Option<(f64, f64)>) {
        if self.destroyed || !(factor.is_finite() && factor > 0.0) {
            return;
        }

        let before = self.viewport;
        let after = Viewport {
            zoom: before.zoom * factor,
            ..before
        }
        .with_zoom_clamped(self.config.min_zoom, self.config.max_zoom);

        if after.zoom == before.zoom {
            return;
        }

        self.viewport = match origin {
            Some((x, y)) => {
                let height = f64::from(self.display_height);
                let offset_x = x - f64::from(self.display_width) / 2.0;
                let offset_y = y - height / 2.0;
                let old_step = before.scale() / height;
                let new_step = after.scale() / height;

                Viewport {
                    center_x: before.center_x + offset_x * (old_step - new_step),
                    center_y: before.center_y - offset_y * (old_step - new_step),
                    zoom: after.zoom,
                }
            }
            None => after,
        };

        self.render();
    }

    /// Applies a partial parameter change. A hue-only change over a complete
    /// render is recoloured locally without asking the worker.
    pub fn update_params(&mut self, update: &FractalParamsUpdate) {
        if self.destroyed {
            return;
        }

        match self.params.apply(update) {
            ParamsChange::None => {}
            ParamsChange::HueOnly => {
                if !self.recolour_from_cache() {
                    self.render();
                }
            }
            ParamsChange::Shape => self.render(),
        }
    }

    pub fn start_interaction(&mut self) {
        if self.destroyed {
            return;
        }

        self.interaction = Interaction {
            active: true,
            ended_at: None,
        };
    }

    /// Ends the gesture; the final render follows once the debounce elapses.
    pub fn end_interaction(&mut self) {
        if self.destroyed {
            return;
        }

        self.interaction = Interaction {
            active: false,
            ended_at: Some(self.clock.now()),
        };
    }

    /// Fires the final render once the debounce window after a gesture has passed.
    pub fn tick(&mut self) {
        if self.destroyed {
            return;
        }

        let Some(ended_at) = self.interaction.ended_at else {
            return;
        };

        if self.clock.now().saturating_sub(ended_at) >= self.config.debounce() {
            self.interaction.ended_at = None;
            debug!("interaction settled, requesting final render");
            self.issue_render(QualityProfile::Final);
        }
    }

    /// Handles every response the worker has ready, then runs [`Self::tick`].
    pub fn pump(&mut self) {
        if self.destroyed {
            return;
        }

        while let Some(response) = self.worker.try_recv() {
            self.handle_response(response);
        }
        self.tick();
    }

    pub fn handle_response(&mut self, response: WorkerResponse) {
        if self.destroyed {
            return;
        }

        let WorkerResponse::Tile(TileResponse {
            tile,
            request_id,
            is_complete,
        }) = response;

        let Some(active) = self.active.filter(|active| active.id == request_id) else {
            trace!("discarding stale tile for request {request_id}");
            return;
        };
        let Some(overscan) = self.overscan.as_mut() else {
            return;
        };

        if let Err(err) = overscan.pixels.blit(tile.rect, &tile.pixels) {
            warn!("dropping tile for request {request_id}: {err}");
            return;
        }
        if let Some(cache) = self.cache.as_mut() {
            cache.store(tile.rect, &tile.iterations);
        }

        if is_complete {
            self.active = Some(ActiveRequest {
                complete: true,
                ..active
            });
            if let Some(cache) = self.cache.as_mut() {
                cache.mark_complete();
            }
            debug!("request {request_id} complete");

            if active.profile == QualityProfile::Final && !self.interaction.active {
                self.background = self.overscan.clone();
                if let Some(background) = &self.background {
                    let view = background.tag.viewport;
                    info!(
                        "background updated at ({}, {}) zoom {}",
                        view.center_x, view.center_y, view.zoom
                    );
                }
            }
        }

        self.recrop();
    }

    /// Cancels outstanding work and shuts the worker down. Every later call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        self.cancel_active();
        self.worker.terminate();
        self.destroyed = true;
        debug!("compositor destroyed after {} requests", self.request_counter);
    }

    fn issue_render(&mut self, profile: QualityProfile) {
        self.cancel_active();

        self.request_counter += 1;
        let request_id = self.request_counter;

        let (width, height) = self.render_size();
        let (overscan_width, overscan_height) = self.overscan_size();
        let tag = FrameTag::for_canvas(self.viewport, height);

        let mut pixels = PixelBuffer::filled(overscan_width, overscan_height, Colour::OPAQUE_BLACK);
        if let Some(seed) = self.background.as_ref().or(self.overscan.as_ref()) {
            seed.draw_into(&mut pixels, &tag);
        }

        let quality = match profile {
            QualityProfile::Interactive => self.config.interactive_quality,
            QualityProfile::Final => self.config.final_quality_for_zoom(self.viewport.zoom),
        };

        // Same pixel step as the visible surface, over the larger canvas.
        let request_viewport = Viewport {
            zoom: self.viewport.zoom * f64::from(height) / f64::from(overscan_height),
            ..self.viewport
        };

        debug!(
            "request {request_id}: {profile:?} {width}x{height}, overscan {overscan_width}x{overscan_height}, {} iterations",
            quality.max_iterations
        );

        self.overscan = Some(FrameBuffer::new(pixels, tag));
        self.cache = Some(IterationCache::new(
            overscan_width,
            overscan_height,
            quality.max_iterations,
        ));
        self.active = Some(ActiveRequest {
            id: request_id,
            profile,
            complete: false,
        });

        self.worker.post(WorkerRequest::Render(RenderRequest {
            canvas_width: overscan_width,
            canvas_height: overscan_height,
            viewport: request_viewport,
            params: self.params,
            quality,
            request_id,
        }));

        self.recrop();
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            if !active.complete {
                debug!("cancelling request {}", active.id);
                self.worker
                    .post(WorkerRequest::Cancel(CancelRequest { request_id: active.id }));
            }
        }
    }

    /// Whether the current overscan can serve the view by recropping alone.
    fn overscan_covers_view(&self) -> bool {
        let Some(overscan) = &self.overscan else {
            return false;
        };
        if overscan.dimensions() != self.overscan_size() {
            return false;
        }

        let rendered = overscan.tag.viewport;
        let zoom_drift = (self.viewport.zoom / rendered.zoom - 1.0).abs();
        if zoom_drift > self.config.pan_zoom_tolerance {
            return false;
        }

        let (width, height) = self.render_size();
        let shift_x = (self.viewport.center_x - rendered.center_x).abs();
        let shift_y = (self.viewport.center_y - rendered.center_y).abs();
        let tolerance = self.config.pan_shift_tolerance * self.viewport.scale();
        let aspect_ratio = f64::from(width) / f64::from(height);
        if shift_x > tolerance * aspect_ratio || shift_y > tolerance {
            return false;
        }

        // The shifted visible frame must still lie inside the rendered overscan.
        let step = self.viewport.pixel_step(height);
        let rendered_step = overscan.tag.pixel_step;
        let (overscan_width, overscan_height) = overscan.dimensions();
        let covers = |shift: f64, visible: u32, rendered: u32| {
            shift + f64::from(visible) * step / 2.0
                <= f64::from(rendered) * rendered_step / 2.0 + rendered_step * COVERAGE_SLACK
        };

        covers(shift_x, width, overscan_width) && covers(shift_y, height, overscan_height)
    }

    fn recolour_from_cache(&mut self) -> bool {
        let (Some(overscan), Some(cache)) = (self.overscan.as_mut(), self.cache.as_ref()) else {
            return false;
        };

        let (width, height) = overscan.dimensions();
        if !cache.is_usable_for(width, height) {
            return false;
        }

        let colour_map = HueColourMap::new(cache.max_iterations(), self.params.color_hue);
        match PixelBuffer::from_data(width, height, colourise(cache.values(), &colour_map)) {
            Ok(pixels) => overscan.pixels = pixels,
            Err(err) => {
                warn!("recolour failed: {err}");
                return false;
            }
        }

        debug!("recoloured {width}x{height} overscan to hue {}", self.params.color_hue);
        self.recrop();
        true
    }

    fn reallocate_visible(&mut self) {
        let (width, height) =
            scaled_size(self.display_width, self.display_height, self.resolution);
        self.visible = PixelBuffer::filled(width, height, Colour::OPAQUE_BLACK);
    }

    fn recrop(&mut self) {
        let tag = FrameTag::for_canvas(self.viewport, self.visible.height());

        match &self.overscan {
            Some(overscan) => overscan.draw_into(&mut self.visible, &tag),
            None => self.visible.fill(Colour::OPAQUE_BLACK),
        }

        self.presenter.present(&self.visible);
    }
}

fn scaled_size(width: u32, height: u32, resolution: f64) -> (u32, u32) {
    let scale = |length: u32| ((f64::from(length) * resolution).floor() as u32).max(1);
    (scale(width), scale(height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::manual_clock::ManualClock;
    use crate::controllers::worker::codec::decode_response;
    use crate::controllers::worker::inline_worker::InlineWorker;
    use crate::controllers::worker::messages::Tile;
    use crate::core::actions::compute_tile::compute_tile::compute_tile;
    use crate::core::actions::resample::resample::resampled;
    use crate::core::data::pixel_rect::PixelRect;
    use crate::core::data::render_quality::RenderQuality;

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[derive(Default)]
    struct RecordingPresenter {
        frames: usize,
        last: Option<PixelBuffer>,
    }

    impl SurfacePresenterPort for RecordingPresenter {
        fn present(&mut self, frame: &PixelBuffer) {
            self.frames += 1;
            self.last = Some(frame.clone());
        }
    }

    type TestCompositor = Compositor<InlineWorker, RecordingPresenter, ManualClock>;

    fn test_config() -> RendererConfig {
        RendererConfig {
            interactive_quality: RenderQuality {
                max_iterations: 24,
                tile_size: 16,
                tiles_per_frame: 4,
            },
            final_quality: RenderQuality {
                max_iterations: 48,
                tile_size: 32,
                tiles_per_frame: 2,
            },
            ..RendererConfig::default()
        }
    }

    /// 40x30 display: overscan is 60x46 with margins of 10 and 8 pixels.
    fn compositor() -> (TestCompositor, ManualClock) {
        let clock = ManualClock::new();
        let compositor = Compositor::new(
            test_config(),
            InlineWorker::new(),
            RecordingPresenter::default(),
            clock.clone(),
            40,
            30,
        );
        (compositor, clock)
    }

    fn posted(compositor: &TestCompositor) -> &[WorkerRequest] {
        compositor.worker().posted()
    }

    fn last_render(compositor: &TestCompositor) -> &RenderRequest {
        posted(compositor)
            .iter()
            .rev()
            .find_map(|request| match request {
                WorkerRequest::Render(render) => Some(render),
                WorkerRequest::Cancel(_) => None,
            })
            .expect("a render request was posted")
    }

    fn settled() -> (TestCompositor, ManualClock) {
        let (mut compositor, clock) = compositor();
        compositor.render();
        compositor.pump();
        assert!(compositor.is_settled());
        (compositor, clock)
    }

    fn plane_point_under(viewport: Viewport, display: (u32, u32), x: f64, y: f64) -> (f64, f64) {
        let step = viewport.scale() / f64::from(display.1);
        (
            viewport.center_x + (x - f64::from(display.0) / 2.0) * step,
            viewport.center_y - (y - f64::from(display.1) / 2.0) * step,
        )
    }

    #[test]
    fn test_new_compositor_is_idle() {
        let (compositor, _) = compositor();

        assert!(posted(&compositor).is_empty());
        assert_eq!(compositor.render_size(), (40, 30));
        assert_eq!(compositor.viewport(), Viewport::default());
        assert!(!compositor.is_settled());
    }

    #[test]
    fn test_render_requests_overscan_canvas_at_same_pixel_step() {
        let (mut compositor, _) = compositor();
        compositor.render();

        let request = last_render(&compositor);
        assert_eq!((request.canvas_width, request.canvas_height), (60, 46));
        assert_eq!(request.request_id, 1);
        assert_eq!(request.quality, test_config().final_quality);
        let step_gap = request.viewport.pixel_step(46) - compositor.viewport().pixel_step(30);
        assert!(step_gap.abs() < 1e-15);
        assert_eq!(request.viewport.center(), compositor.viewport().center());
    }

    #[test]
    fn test_first_render_shows_black_until_tiles_arrive() {
        let (mut compositor, _) = compositor();
        compositor.render();

        let frame = compositor.presenter().last.as_ref().unwrap();
        assert!(frame.buffer().chunks_exact(4).all(|p| p == BLACK));
    }

    #[test]
    fn test_settled_view_is_exact_crop_of_overscan_render() {
        let (compositor, _) = settled();
        let request = last_render(&compositor);

        let full = compute_tile(
            PixelRect::new(0, 0, 60, 46).unwrap(),
            60,
            46,
            &request.viewport,
            &request.params,
            request.quality.max_iterations,
        );
        let overscan = PixelBuffer::from_data(60, 46, full.pixels).unwrap();

        for y in 0..30 {
            for x in 0..40 {
                assert_eq!(
                    compositor.visible().pixel(x, y),
                    overscan.pixel(x + 10, y + 8),
                    "pixel ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_default_view_centre_is_black_and_corner_is_coloured() {
        let (compositor, _) = settled();

        assert_eq!(compositor.visible().pixel(20, 15), Some(BLACK));
        assert_ne!(compositor.visible().pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn test_final_completion_snapshots_background() {
        let (compositor, _) = settled();
        let background = compositor.background().unwrap();

        assert_eq!(background.dimensions(), (60, 46));
        assert_eq!(background.tag.viewport, compositor.viewport());
    }

    #[test]
    fn test_small_pan_recrops_without_worker_messages() {
        let (mut compositor, _) = settled();
        let before = compositor.visible().clone();
        let posted_before = posted(&compositor).len();
        let frames_before = compositor.presenter().frames;

        compositor.pan(5.0, 3.0);

        assert_eq!(posted(&compositor).len(), posted_before);
        assert_eq!(compositor.presenter().frames, frames_before + 1);
        for y in 3..30 {
            for x in 5..40 {
                assert_eq!(compositor.visible().pixel(x, y), before.pixel(x - 5, y - 3));
            }
        }
    }

    fn settled_with(config: RendererConfig, width: u32, height: u32) -> TestCompositor {
        let mut compositor = Compositor::new(
            config,
            InlineWorker::new(),
            RecordingPresenter::default(),
            ManualClock::new(),
            width,
            height,
        );
        compositor.render();
        compositor.pump();
        assert!(compositor.is_settled());
        compositor
    }

    #[test]
    fn test_portrait_pan_past_horizontal_margin_requests_new_render() {
        // 30x60 display: overscan 46x90, horizontal margin 8 pixels.
        let mut compositor = settled_with(RendererConfig::default(), 30, 60);
        let posted_before = posted(&compositor).len();

        compositor.pan(10.0, 0.0);

        assert_eq!(posted(&compositor).len(), posted_before + 1);
        assert_eq!(last_render(&compositor).request_id, 2);
    }

    #[test]
    fn test_portrait_pan_within_horizontal_margin_crops_rendered_pixels() {
        let mut compositor = settled_with(RendererConfig::default(), 30, 60);
        let posted_before = posted(&compositor).len();
        let request = last_render(&compositor).clone();
        let full = compute_tile(
            PixelRect::new(0, 0, 46, 90).unwrap(),
            46,
            90,
            &request.viewport,
            &request.params,
            request.quality.max_iterations,
        );
        let overscan = PixelBuffer::from_data(46, 90, full.pixels).unwrap();

        compositor.pan(5.0, 0.0);

        assert_eq!(posted(&compositor).len(), posted_before);
        for y in 0..60 {
            for x in 0..30 {
                assert_eq!(
                    compositor.visible().pixel(x, y),
                    overscan.pixel(x + 3, y + 15),
                    "pixel ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_pan_beyond_overscan_renders_even_with_loose_tolerance() {
        let config = RendererConfig {
            pan_shift_tolerance: 1.0,
            ..test_config()
        };
        let mut compositor = settled_with(config, 40, 30);
        let posted_before = posted(&compositor).len();

        // Margins are 10 and 8 pixels.
        compositor.pan(0.0, 9.0);

        assert_eq!(posted(&compositor).len(), posted_before + 1);
    }

    #[test]
    fn test_pan_moves_centre_against_drag() {
        let (mut compositor, _) = settled();
        let step = compositor.viewport().scale() / 30.0;

        compositor.pan(3.0, 2.0);

        let viewport = compositor.viewport();
        assert!((viewport.center_x - (-0.5 - 3.0 * step)).abs() < 1e-12);
        assert!((viewport.center_y - 2.0 * step).abs() < 1e-12);
    }

    #[test]
    fn test_large_pan_requests_new_render() {
        let (mut compositor, _) = settled();
        let posted_before = posted(&compositor).len();

        compositor.pan(20.0, 0.0);

        // The previous request is complete, so there is nothing to cancel.
        assert_eq!(posted(&compositor).len(), posted_before + 1);
        assert_eq!(last_render(&compositor).request_id, 2);
    }

    #[test]
    fn test_new_render_cancels_unfinished_request() {
        let (mut compositor, _) = compositor();
        compositor.render();
        compositor.render();

        assert!(matches!(
            posted(&compositor),
            [
                WorkerRequest::Render(_),
                WorkerRequest::Cancel(CancelRequest { request_id: 1 }),
                WorkerRequest::Render(RenderRequest { request_id: 2, .. })
            ]
        ));
    }

    #[test]
    fn test_stale_tiles_are_discarded() {
        let (mut compositor, _) = compositor();
        compositor.render();
        compositor.render();
        let visible_before = compositor.visible().clone();
        let frames_before = compositor.presenter().frames;

        compositor.handle_response(WorkerResponse::Tile(TileResponse {
            tile: Tile {
                rect: PixelRect::new(0, 0, 60, 46).unwrap(),
                pixels: vec![255; 60 * 46 * 4],
                iterations: vec![1.0; 60 * 46],
            },
            request_id: 1,
            is_complete: true,
        }));

        assert_eq!(compositor.visible(), &visible_before);
        assert_eq!(compositor.presenter().frames, frames_before);
        assert!(!compositor.has_background());
    }

    #[test]
    fn test_mismatched_tile_is_dropped() {
        let (mut compositor, _) = compositor();
        compositor.render();
        let frames_before = compositor.presenter().frames;

        compositor.handle_response(WorkerResponse::Tile(TileResponse {
            tile: Tile {
                rect: PixelRect::new(50, 40, 20, 20).unwrap(),
                pixels: vec![255; 20 * 20 * 4],
                iterations: Vec::new(),
            },
            request_id: 1,
            is_complete: false,
        }));

        assert_eq!(compositor.presenter().frames, frames_before);
    }

    #[test]
    fn test_empty_wire_tile_is_dropped() {
        let (mut compositor, _) = compositor();
        compositor.render();
        let visible_before = compositor.visible().clone();
        let frames_before = compositor.presenter().frames;

        let response = decode_response(
            r#"{"type":"tile","tile":{"x":0,"y":0,"width":0,"height":3,"pixels":[]},"requestId":1,"isComplete":false}"#,
        )
        .unwrap()
        .unwrap();
        compositor.handle_response(response);

        assert_eq!(compositor.visible(), &visible_before);
        assert_eq!(compositor.presenter().frames, frames_before);
    }

    #[test]
    fn test_overflowing_wire_tile_is_dropped() {
        let (mut compositor, _) = compositor();
        compositor.render();
        let frames_before = compositor.presenter().frames;

        let response = decode_response(
            r#"{"type":"tile","tile":{"x":4294967295,"y":0,"width":2,"height":1,"pixels":[0,0,0,0,0,0,0,0]},"requestId":1,"isComplete":true}"#,
        )
        .unwrap()
        .unwrap();
        compositor.handle_response(response);

        assert_eq!(compositor.presenter().frames, frames_before);
        assert!(!compositor.has_background());
    }

    #[test]
    fn test_zoom_seeds_new_overscan_from_background() {
        let (mut compositor, _) = settled();
        let background = compositor.background().unwrap().clone();

        compositor.zoom(2.0, None);

        let tag = FrameTag::for_canvas(compositor.viewport(), 30);
        let expected = resampled(&background.pixels, &background.tag, 40, 30, &tag);
        assert_eq!(compositor.visible(), &expected);
        assert!(compositor.visible().buffer().chunks_exact(4).any(|p| p != BLACK));
    }

    #[test]
    fn test_zoom_keeps_origin_point_fixed() {
        let (mut compositor, _) = settled();
        let origin = (10.0, 5.0);
        let before = plane_point_under(compositor.viewport(), (40, 30), origin.0, origin.1);

        compositor.zoom(4.0, Some(origin));

        let after = plane_point_under(compositor.viewport(), (40, 30), origin.0, origin.1);
        assert_eq!(compositor.viewport().zoom, 4.0);
        assert!((before.0 - after.0).abs() < 1e-12);
        assert!((before.1 - after.1).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_is_clamped_and_noop_at_bound() {
        let (mut compositor, _) = settled();

        compositor.zoom(1e-6, None);
        assert_eq!(compositor.viewport().zoom, 0.5);

        let posted_before = posted(&compositor).len();
        compositor.zoom(0.5, None);
        assert_eq!(posted(&compositor).len(), posted_before);
    }

    #[test]
    fn test_final_quality_scales_with_zoom() {
        let (mut compositor, _) = settled();

        compositor.zoom(8.0, None);

        assert_eq!(last_render(&compositor).quality.max_iterations, 48 + 3 * 64);
    }

    #[test]
    fn test_interactive_render_does_not_replace_background() {
        let (mut compositor, _) = compositor();
        compositor.start_interaction();
        compositor.render();
        compositor.pump();

        assert_eq!(last_render(&compositor).quality, test_config().interactive_quality);
        assert!(!compositor.has_background());
        assert!(!compositor.is_settled());
    }

    #[test]
    fn test_final_render_finishing_mid_gesture_is_not_snapshotted() {
        let (mut compositor, _) = compositor();
        compositor.render();
        compositor.start_interaction();
        compositor.pump();

        assert!(!compositor.has_background());
    }

    #[test]
    fn test_debounce_fires_final_render_from_tick() {
        let (mut compositor, clock) = compositor();
        compositor.start_interaction();
        compositor.zoom(2.0, None);
        compositor.pump();
        compositor.end_interaction();
        let posted_before = posted(&compositor).len();

        compositor.tick();
        clock.advance(Duration::from_millis(149));
        compositor.tick();
        assert_eq!(posted(&compositor).len(), posted_before);

        clock.advance(Duration::from_millis(1));
        compositor.tick();
        assert_eq!(posted(&compositor).len(), posted_before + 1);
        assert_eq!(
            last_render(&compositor).quality,
            test_config().final_quality_for_zoom(2.0)
        );

        compositor.pump();
        assert!(compositor.is_settled());
        assert!(compositor.has_background());
    }

    #[test]
    fn test_renders_during_debounce_stay_interactive() {
        let (mut compositor, _) = compositor();
        compositor.start_interaction();
        compositor.end_interaction();

        compositor.render();

        assert_eq!(last_render(&compositor).quality, test_config().interactive_quality);
    }

    #[test]
    fn test_hue_change_recolours_without_worker() {
        let (mut compositor, _) = settled();
        let posted_before = posted(&compositor).len();
        let before = compositor.visible().clone();

        compositor.update_params(&FractalParamsUpdate::hue(30.0));

        assert_eq!(posted(&compositor).len(), posted_before);
        assert_ne!(compositor.visible(), &before);
        assert_eq!(compositor.params().color_hue, 30.0);
    }

    #[test]
    fn test_recolour_matches_full_render_with_same_hue() {
        let (mut recoloured, _) = settled();
        recoloured.update_params(&FractalParamsUpdate::hue(30.0));

        let (mut rendered, _) = compositor();
        rendered.update_params(&FractalParamsUpdate::hue(30.0));
        rendered.pump();

        assert!(rendered.is_settled());
        assert_eq!(recoloured.visible(), rendered.visible());
    }

    #[test]
    fn test_hue_change_during_render_requests_new_render() {
        let (mut compositor, _) = compositor();
        compositor.render();

        compositor.update_params(&FractalParamsUpdate::hue(90.0));

        let request = last_render(&compositor);
        assert_eq!(request.request_id, 2);
        assert_eq!(request.params.color_hue, 90.0);
    }

    #[test]
    fn test_shape_change_requests_new_render() {
        let (mut compositor, _) = settled();

        compositor.update_params(&FractalParamsUpdate {
            exponent: Some(3.0),
            ..FractalParamsUpdate::default()
        });

        assert_eq!(last_render(&compositor).params.exponent, 3.0);
    }

    #[test]
    fn test_unchanged_params_do_nothing() {
        let (mut compositor, _) = settled();
        let posted_before = posted(&compositor).len();

        compositor.update_params(&FractalParamsUpdate::hue(200.0));
        compositor.update_params(&FractalParamsUpdate::default());

        assert_eq!(posted(&compositor).len(), posted_before);
    }

    #[test]
    fn test_resize_reallocates_and_rerenders() {
        let (mut compositor, _) = settled();

        compositor.resize(80, 60);

        assert_eq!(compositor.render_size(), (80, 60));
        assert_eq!(compositor.visible().dimensions(), (80, 60));
        let request = last_render(&compositor);
        assert_eq!((request.canvas_width, request.canvas_height), (120, 90));
    }

    #[test]
    fn test_set_resolution_scales_and_clamps() {
        let (mut compositor, _) = compositor();

        compositor.set_resolution(0.5);
        assert_eq!(compositor.render_size(), (20, 15));

        compositor.set_resolution(10.0);
        assert_eq!(compositor.resolution(), 2.0);
        assert_eq!(compositor.render_size(), (80, 60));

        compositor.set_resolution(0.0);
        assert_eq!(compositor.resolution(), 0.25);
        assert_eq!(compositor.render_size(), (10, 7));
    }

    #[test]
    fn test_render_size_is_at_least_one_pixel() {
        let (mut compositor, _) = compositor();

        compositor.resize(0, 1);
        compositor.set_resolution(0.25);

        assert_eq!(compositor.render_size(), (1, 1));
        compositor.pump();
        assert!(compositor.is_settled());
    }

    #[test]
    fn test_destroy_cancels_and_silences_everything() {
        let (mut compositor, _) = compositor();
        compositor.render();

        compositor.destroy();

        assert!(compositor.is_destroyed());
        assert!(compositor.worker().is_terminated());
        assert!(matches!(
            posted(&compositor).last(),
            Some(WorkerRequest::Cancel(CancelRequest { request_id: 1 }))
        ));

        let frames = compositor.presenter().frames;
        let posted_count = posted(&compositor).len();
        compositor.render();
        compositor.pan(100.0, 0.0);
        compositor.zoom(2.0, Some((1.0, 1.0)));
        compositor.update_params(&FractalParamsUpdate::hue(10.0));
        compositor.resize(10, 10);
        compositor.set_resolution(2.0);
        compositor.start_interaction();
        compositor.end_interaction();
        compositor.pump();
        compositor.destroy();

        assert_eq!(compositor.presenter().frames, frames);
        assert_eq!(posted(&compositor).len(), posted_count);
        assert_eq!(compositor.render_size(), (40, 30));
    }
}
