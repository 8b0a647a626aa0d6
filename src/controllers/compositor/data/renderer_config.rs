use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controllers::compositor::errors::config::ConfigError;
use crate::core::data::render_quality::RenderQuality;

/// Tunables of the compositor. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererConfig {
    /// Overscan buffer size relative to the render size, per axis.
    pub overscan_factor: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub interactive_quality: RenderQuality,
    pub final_quality: RenderQuality,
    /// Extra final-quality iterations for every doubling of zoom.
    pub iterations_per_octave: u32,
    pub max_iterations_cap: u32,
    /// Quiet period after a gesture ends before the final render starts.
    pub debounce_ms: u64,
    /// Largest relative zoom change a pan may carry and still reuse the overscan.
    pub pan_zoom_tolerance: f64,
    /// Largest centre shift, as a fraction of the visible scale, served by recropping.
    pub pan_shift_tolerance: f64,
    pub min_resolution: f64,
    pub max_resolution: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            overscan_factor: 1.5,
            min_zoom: 0.5,
            max_zoom: 1e12,
            interactive_quality: RenderQuality::interactive(),
            final_quality: RenderQuality::final_quality(),
            iterations_per_octave: 64,
            max_iterations_cap: 4096,
            debounce_ms: 150,
            pan_zoom_tolerance: 0.01,
            pan_shift_tolerance: 0.2,
            min_resolution: 0.25,
            max_resolution: 2.0,
        }
    }
}

impl RendererConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.overscan_factor >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "overscanFactor must be at least 1, got {}",
                self.overscan_factor
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < minZoom <= maxZoom, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.min_resolution > 0.0 && self.min_resolution <= self.max_resolution) {
            return Err(ConfigError::Invalid(format!(
                "resolution bounds must satisfy 0 < minResolution <= maxResolution, got [{}, {}]",
                self.min_resolution, self.max_resolution
            )));
        }
        for (name, quality) in [
            ("interactiveQuality", &self.interactive_quality),
            ("finalQuality", &self.final_quality),
        ] {
            if quality.tile_size == 0 || quality.tiles_per_frame == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} needs a positive tileSize and tilesPerFrame"
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Final quality with its iteration budget raised for `zoom`.
    #[must_use]
    pub fn final_quality_for_zoom(&self, zoom: f64) -> RenderQuality {
        self.final_quality
            .scaled_for_zoom(zoom, self.iterations_per_octave, self.max_iterations_cap)
    }

    /// Overscan length for a render length: the margin on each side is a whole
    /// number of pixels.
    #[must_use]
    pub fn overscan_length(&self, length: u32) -> u32 {
        let margin = (f64::from(length) * (self.overscan_factor - 1.0) / 2.0).ceil();
        length + margin.max(0.0) as u32 * 2
    }
}
