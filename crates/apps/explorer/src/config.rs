use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use formats::{ChangeMapSchema, TabularSchema};
use foundation::geo::GeoPoint;
use layers::HighlightConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Map framing used when a region is searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub nationwide_center: GeoPoint,
    pub nationwide_zoom: u8,
    pub province_zoom: u8,
    pub municipality_zoom: u8,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            // Seoul city hall.
            nationwide_center: GeoPoint::from_lat_lon(37.5665, 126.9780),
            nationwide_zoom: 7,
            province_zoom: 10,
            municipality_zoom: 12,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub highlight: HighlightConfig,
    pub view: ViewConfig,
    pub change_map: ChangeMapSchema,
    pub tabular: TabularSchema,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ExplorerConfig {
    /// Defaults, then the optional JSON file, then `EXPLORER_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&payload).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from `lookup`. Unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let hl = &mut self.highlight;
        hl.fit_threshold_deg = env_var_or(&lookup, "EXPLORER_FIT_THRESHOLD_DEG", hl.fit_threshold_deg);
        hl.blink.repeats = env_var_or(&lookup, "EXPLORER_BLINK_REPEATS", hl.blink.repeats);
        hl.blink.delay_ms = env_var_or(&lookup, "EXPLORER_BLINK_DELAY_MS", hl.blink.delay_ms);
        hl.blink.tick_ms = env_var_or(&lookup, "EXPLORER_BLINK_TICK_MS", hl.blink.tick_ms);
        hl.blink.settle_opacity =
            env_var_or(&lookup, "EXPLORER_BLINK_SETTLE_OPACITY", hl.blink.settle_opacity);
        if let Some(label) = lookup("EXPLORER_ABSENT_LABEL") {
            hl.absent_label = label;
        }

        if let Some(key) = lookup("EXPLORER_BEFORE_KEY") {
            self.change_map.before_key = key;
        }
        if let Some(key) = lookup("EXPLORER_AFTER_KEY") {
            self.change_map.after_key = key;
        }
        if let Some(col) = lookup("EXPLORER_CATEGORY_COLUMN") {
            self.tabular.category_column = col;
        }
    }
}

fn env_var_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
