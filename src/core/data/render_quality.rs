use serde::{Deserialize, Serialize};

/// Cost knobs for one render pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQuality {
    pub max_iterations: u32,
    pub tile_size: u32,
    pub tiles_per_frame: u32,
}

impl RenderQuality {
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            max_iterations: 96,
            tile_size: 64,
            tiles_per_frame: 16,
        }
    }

    #[must_use]
    pub fn final_quality() -> Self {
        Self {
            max_iterations: 256,
            tile_size: 128,
            tiles_per_frame: 4,
        }
    }

    /// Raises `max_iterations` by `iterations_per_octave` for every doubling of
    /// zoom beyond 1, never above `cap`.
    #[must_use]
    pub fn scaled_for_zoom(self, zoom: f64, iterations_per_octave: u32, cap: u32) -> Self {
        let octaves = if zoom > 1.0 { zoom.log2() } else { 0.0 };
        let extra = (octaves * f64::from(iterations_per_octave)).floor();
        let scaled = (f64::from(self.max_iterations) + extra).min(f64::from(cap));

        Self {
            max_iterations: scaled as u32,
            ..self
        }
    }
}

/// Which quality profile a request was issued with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QualityProfile {
    Interactive,
    Final,
}
