use serde::{Deserialize, Serialize};

use crate::core::actions::compute_tile::compute_tile::ComputedTile;
use crate::core::data::fractal_params::FractalParams;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::render_quality::RenderQuality;
use crate::core::data::viewport::Viewport;

pub type RequestId = u64;

/// Messages sent from the compositor to a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerRequest {
    Render(RenderRequest),
    Cancel(CancelRequest),
}

impl WorkerRequest {
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Render(render) => render.request_id,
            Self::Cancel(cancel) => cancel.request_id,
        }
    }
}

/// Render the whole canvas for `viewport`, superseding any earlier request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub viewport: Viewport,
    pub params: FractalParams,
    pub quality: RenderQuality,
    pub request_id: RequestId,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub request_id: RequestId,
}

/// Messages sent from a worker back to the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerResponse {
    Tile(TileResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileResponse {
    pub tile: Tile,
    pub request_id: RequestId,
    pub is_complete: bool,
}

/// One finished block of the canvas. `pixels` is RGBA8; `iterations` holds the
/// smooth values behind them and may be omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(flatten)]
    pub rect: PixelRect,
    pub pixels: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iterations: Vec<f64>,
}

impl From<ComputedTile> for Tile {
    fn from(tile: ComputedTile) -> Self {
        Self {
            rect: tile.rect,
            pixels: tile.pixels,
            iterations: tile.iterations,
        }
    }
}
