//! File configuration (`{data_dir}/config.yaml`) and CLI overrides.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! A file that exists but cannot be read or parsed is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use scoredist_core::layout::{CanvasSize, Margins, PlotFrame};
use scoredist_core::model::{DEFAULT_INDEX, DEFAULT_METRIC, SelectionContext, TimeRange};
use scoredist_core::playback::DEFAULT_TICK_INTERVAL_MS;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Indices cycled with `[` and `]`.
    pub indices: Vec<String>,
    pub metrics: Vec<String>,
    pub default_range: TimeRange,
    pub tick_interval_ms: u64,
    pub canvas: CanvasSize,
    pub margins: Margins,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            indices: vec![DEFAULT_INDEX.to_string(), "NDX".to_string(), "CSI300".to_string()],
            metrics: vec![DEFAULT_METRIC.to_string(), "value".to_string(), "quality".to_string()],
            default_range: TimeRange::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            canvas: CanvasSize::default(),
            margins: Margins::default(),
            request_timeout_secs: 30,
        }
    }
}

/// Selection flags given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOverrides {
    pub index: Option<String>,
    pub metric: Option<String>,
    pub range: Option<TimeRange>,
}

impl AppConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_saphyr::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indices.iter().all(|i| i.trim().is_empty()) {
            return Err(ConfigError::Invalid("`indices` must name at least one index".into()));
        }
        if self.metrics.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid("`metrics` must name at least one metric".into()));
        }
        let frame = self.plot_frame();
        if frame.plot_width() <= 0.0 || frame.plot_height() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "canvas {}x{} leaves no room inside the margins",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("`request_timeout_secs` must be positive".into()));
        }
        Ok(())
    }

    pub fn plot_frame(&self) -> PlotFrame {
        PlotFrame::new(self.canvas, self.margins)
    }

    /// Apply CLI flags. An index or metric not already listed is put first.
    pub fn apply_overrides(&mut self, overrides: &SelectionOverrides) {
        if let Some(index) = &overrides.index {
            promote(&mut self.indices, index);
        }
        if let Some(metric) = &overrides.metric {
            promote(&mut self.metrics, metric);
        }
        if let Some(range) = overrides.range {
            self.default_range = range;
        }
    }

    /// Selection to load on startup: the first index and metric.
    pub fn initial_selection(&self) -> SelectionContext {
        SelectionContext::new(
            self.indices.first().map_or(DEFAULT_INDEX, String::as_str),
            self.metrics.first().map_or(DEFAULT_METRIC, String::as_str),
            self.default_range,
        )
    }
}

fn promote(list: &mut Vec<String>, value: &str) {
    list.retain(|v| v != value);
    list.insert(0, value.to_string());
}
