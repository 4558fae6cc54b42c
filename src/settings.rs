//! Settings Module
//! Layered dashboard configuration: built-in defaults, an optional
//! `dashboard.toml`, then `DASHBOARD_*` environment variables.

use crate::data::NormalizeOptions;
use crate::stats::ScatterFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory (extension optional).
pub const CONFIG_FILE_STEM: &str = "dashboard";
/// Environment prefix, e.g. `DASHBOARD_DATA__PATH=/tmp/amazon.csv`.
pub const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub dashboard: DashboardSettings,
    pub export: ExportSettings,
}

/// Where the sales export lives and how its numbers are formatted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub path: PathBuf,
    /// Stripped from `discounted_price` and `actual_price`.
    pub currency_symbol: String,
    /// Stripped from prices and `rating_count`.
    pub thousands_separator: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("amazon.csv"),
            currency_symbol: "₹".to_string(),
            thousands_separator: ",".to_string(),
        }
    }
}

impl DataSettings {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            currency_symbol: self.currency_symbol.clone(),
            thousands_separator: self.thousands_separator.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
    /// Lower bound (inclusive) on `discount_percentage` for the scatter chart.
    pub min_scatter_discount: f64,
    /// Diameter in pixels of the marker for the best-selling product.
    pub max_marker_size: f32,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Product Sales Dashboard".to_string(),
            min_scatter_discount: 20.0,
            max_marker_size: 20.0,
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl DashboardSettings {
    pub fn scatter_filter(&self) -> ScatterFilter {
        ScatterFilter {
            min_discount: self.min_scatter_discount,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
            chart_width: 1200,
            chart_height: 800,
        }
    }
}

impl Settings {
    /// Load settings from `dashboard.toml` (if present) and `DASHBOARD_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(Path::new(CONFIG_FILE_STEM)), Some(ENV_PREFIX))
    }

    /// Load settings from an optional config file and an optional env prefix.
    /// Nested keys use `__` in variable names (`<PREFIX>_EXPORT__CHART_WIDTH`).
    pub fn load_from(file: Option<&Path>, env_prefix: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(false));
        }
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        tracing::debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.thousands_separator.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.thousands_separator must not be empty".to_string(),
            ));
        }
        if self.data.currency_symbol.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.currency_symbol must not be empty".to_string(),
            ));
        }
        if !(self.dashboard.max_marker_size > 0.0) {
            return Err(ConfigError::ValidationError(
                "dashboard.max_marker_size must be positive".to_string(),
            ));
        }
        if self.export.chart_width == 0 || self.export.chart_height == 0 {
            return Err(ConfigError::ValidationError(
                "export.chart_width and export.chart_height must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
