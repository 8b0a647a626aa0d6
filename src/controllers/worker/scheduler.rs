use log::{debug, trace};
use rayon::prelude::*;

use crate::controllers::worker::messages::{
    RenderRequest, RequestId, Tile, TileResponse, WorkerRequest, WorkerResponse,
};
use crate::core::actions::compute_tile::compute_tile::{ComputedTile, compute_tile_with};
use crate::core::actions::generate_tiles::generate_tiles::generate_tiles;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::fractals::escape_time::algorithm::EscapeTimeAlgorithm;
use crate::core::fractals::escape_time::colour_map::HueColourMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
    Batching,
    Complete,
    Cancelled,
}

/// What the worker loop should do after a batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Tiles remain; requeue a continuation for the same id.
    Continue,
    /// The last tile was emitted.
    Finished,
    /// The id is no longer active; nothing was emitted.
    Stale,
}

struct RenderJob {
    request: RenderRequest,
    algorithm: EscapeTimeAlgorithm,
    colour_map: HueColourMap,
    tiles: Vec<PixelRect>,
    emitted: usize,
}

impl RenderJob {
    fn new(request: RenderRequest) -> Self {
        let tiles = generate_tiles(
            request.canvas_width,
            request.canvas_height,
            request.quality.tile_size,
        );
        let max_iterations = request.quality.max_iterations;

        Self {
            algorithm: EscapeTimeAlgorithm::new(request.params, max_iterations),
            colour_map: HueColourMap::new(max_iterations, request.params.color_hue),
            tiles,
            emitted: 0,
            request,
        }
    }

    fn compute(&self, rect: PixelRect) -> ComputedTile {
        compute_tile_with(
            rect,
            self.request.canvas_width,
            self.request.canvas_height,
            &self.request.viewport,
            &self.algorithm,
            &self.colour_map,
        )
    }
}

/// Progressive tile renderer driven one batch at a time.
///
/// Only the most recent render request is active. Between batches the owner
/// hands over any pending messages, so a newer request or a cancel takes
/// effect before the next batch starts.
pub struct RenderScheduler {
    active_id: Option<RequestId>,
    job: Option<RenderJob>,
    state: SchedulerState,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active_id: None,
            job: None,
            state: SchedulerState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn active_id(&self) -> Option<RequestId> {
        self.active_id
    }

    /// Whether a render still has tiles left to emit.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Applies a request. Returns the id a continuation should be queued for.
    pub fn handle(&mut self, request: WorkerRequest) -> Option<RequestId> {
        match request {
            WorkerRequest::Render(render) => {
                let id = render.request_id;
                debug!(
                    "scheduling request {id}: {}x{} at zoom {}",
                    render.canvas_width, render.canvas_height, render.viewport.zoom
                );

                self.active_id = Some(id);
                self.job = Some(RenderJob::new(render));
                self.state = SchedulerState::Scheduled;
                Some(id)
            }
            WorkerRequest::Cancel(cancel) => {
                if self.active_id == Some(cancel.request_id) {
                    debug!("cancelling request {}", cancel.request_id);
                    self.active_id = None;
                    self.job = None;
                    self.state = SchedulerState::Cancelled;
                }
                None
            }
        }
    }

    /// Computes up to `tilesPerFrame` tiles for `id` and emits them in priority order.
    pub fn run_batch(
        &mut self,
        id: RequestId,
        mut emit: impl FnMut(WorkerResponse),
    ) -> BatchOutcome {
        if self.active_id != Some(id) {
            trace!("skipping continuation for inactive request {id}");
            return BatchOutcome::Stale;
        }
        let Some(job) = self.job.as_mut() else {
            return BatchOutcome::Stale;
        };

        self.state = SchedulerState::Batching;

        let total = job.tiles.len();
        let per_frame = job.request.quality.tiles_per_frame.max(1) as usize;
        let batch_size = per_frame.min(total - job.emitted);
        let batch = &job.tiles[job.emitted..job.emitted + batch_size];

        let computed: Vec<ComputedTile> = {
            let job = &*job;
            batch.par_iter().map(|&rect| job.compute(rect)).collect()
        };

        for tile in computed {
            job.emitted += 1;
            emit(WorkerResponse::Tile(TileResponse {
                tile: Tile::from(tile),
                request_id: id,
                is_complete: job.emitted == total,
            }));
        }

        trace!("request {id}: {}/{total} tiles emitted", job.emitted);

        if job.emitted == total {
            self.job = None;
            self.state = SchedulerState::Complete;
            BatchOutcome::Finished
        } else {
            BatchOutcome::Continue
        }
    }

    /// Runs batches for `id` until it finishes or goes stale.
    pub fn run_to_completion(&mut self, id: RequestId, mut emit: impl FnMut(WorkerResponse)) {
        while self.run_batch(id, &mut emit) == BatchOutcome::Continue {}
    }
}
