use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::region::ZoomLimits;
use crate::data::source::SyntheticSource;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "WALS_EXPLORER_CONFIG";

/// Tunables for the explorer. Every field has a default, so a config file
/// only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Languages produced by the synthetic source.
    pub language_count: usize,
    pub seed: u64,
    /// Simulated fetch delay of the synthetic source.
    pub load_latency_ms: u64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Bounding-box span (degrees) that maps to zoom 1.0.
    pub reference_span_deg: f64,
    pub family_chart_top_n: usize,
    /// Rows in the side panel statistics block.
    pub stats_top_n: usize,
    pub window_size: [f32; 2],
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            language_count: 300,
            seed: 42,
            load_latency_ms: 1500,
            zoom_min: 0.8,
            zoom_max: 2.5,
            reference_span_deg: 90.0,
            family_chart_top_n: 12,
            stats_top_n: 5,
            window_size: [1280.0, 800.0],
        }
    }
}

impl AtlasConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Config from the file in [`CONFIG_ENV`], or defaults.
    ///
    /// A missing or malformed file is never fatal.
    pub fn load_from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            log::info!("{CONFIG_ENV} not set, using default configuration");
            return Self::default();
        };
        let path = Path::new(&path);
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Falling back to default configuration: {e:#}");
                Self::default()
            }
        }
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        let (min, max) = if self.zoom_min <= self.zoom_max {
            (self.zoom_min, self.zoom_max)
        } else {
            (self.zoom_max, self.zoom_min)
        };
        ZoomLimits {
            min,
            max,
            reference_span_deg: self.reference_span_deg,
        }
    }

    pub fn synthetic_source(&self) -> Arc<SyntheticSource> {
        Arc::new(SyntheticSource {
            count: self.language_count,
            seed: self.seed,
            latency: Duration::from_millis(self.load_latency_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{"language_count": 50, "zoom_max": 3.0}"#).unwrap();
        assert_eq!(config.language_count, 50);
        assert_eq!(config.zoom_max, 3.0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.family_chart_top_n, 12);
    }

    #[test]
    fn swapped_zoom_bounds_are_ordered() {
        let config = AtlasConfig {
            zoom_min: 3.0,
            zoom_max: 1.0,
            ..AtlasConfig::default()
        };
        let limits = config.zoom_limits();
        assert_eq!((limits.min, limits.max), (1.0, 3.0));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AtlasConfig::from_file(Path::new("/nonexistent/wals.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
