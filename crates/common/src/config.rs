//! Application configuration.

use crate::error::GazeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scoring engine constants.
    pub scoring: ScoringConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tunable constants for the attention-scoring engine.
///
/// Defaults reproduce the reference study configuration. All values are
/// injected into the engine by the caller; nothing in the core reads
/// configuration globally.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Geometric decay ratio applied when saturating overlapping
    /// contributions. Must be in (0, 1); caps accumulated heat at
    /// `1 / (1 - decay_ratio)`.
    pub decay_ratio: f64,

    /// Fraction of the saturation cap at which a region counts as
    /// fully examined.
    pub threshold_ratio: f64,

    /// Covering samples required per region before visit-order
    /// inference stops scanning.
    pub min_covering_samples: usize,

    /// Maximum number of clusters produced by scanpath simplification.
    pub cluster_cap: usize,

    /// Base duration (marker weight) assigned per clustered scanpath
    /// point, multiplied by cluster size.
    pub point_duration: f64,

    /// Maximum zoom level the viewer supports.
    pub max_zoom: u8,

    /// Zoom levels at or below this are too coarse to carry spatial
    /// weight and never receive a kernel.
    pub min_kernel_zoom: u8,

    /// Kernel standard deviation is `footprint / sigma_divisor`,
    /// floor-clamped to 1.
    pub sigma_divisor: f64,

    /// Inter-sample gaps at or above this (ms) are treated as the user
    /// being away and excluded from time-spent totals.
    pub afk_gap_ms: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazetrace=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            decay_ratio: 0.95,
            threshold_ratio: 0.9,
            min_covering_samples: 10,
            cluster_cap: 50,
            point_duration: 20.0,
            max_zoom: 10,
            min_kernel_zoom: 3,
            sigma_divisor: 6.0,
            afk_gap_ms: 6000.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ScoringConfig {
    /// Asymptotic maximum a single cell can accumulate under the
    /// saturating aggregator: `sum(r^i) = 1 / (1 - r)`.
    pub fn saturation_cap(&self) -> f64 {
        1.0 / (1.0 - self.decay_ratio)
    }

    /// Heat value at which a region scores 1.0 without a click.
    pub fn heat_threshold(&self) -> f64 {
        self.threshold_ratio * self.saturation_cap()
    }

    /// Validate constants that the engine depends on.
    pub fn validate(&self) -> Result<(), GazeError> {
        if !(self.decay_ratio > 0.0 && self.decay_ratio < 1.0) {
            return Err(GazeError::config(format!(
                "decay_ratio must be in (0, 1), got {}",
                self.decay_ratio
            )));
        }
        if !(self.threshold_ratio > 0.0 && self.threshold_ratio <= 1.0) {
            return Err(GazeError::config(format!(
                "threshold_ratio must be in (0, 1], got {}",
                self.threshold_ratio
            )));
        }
        if self.min_kernel_zoom >= self.max_zoom {
            return Err(GazeError::config(format!(
                "min_kernel_zoom {} must be below max_zoom {}",
                self.min_kernel_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gazetrace").join("config.json")
}
