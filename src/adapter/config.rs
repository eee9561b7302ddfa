//! Configuration
//!
//! JSON設定ファイルの読み込み

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::dto::raster_options::{DEFAULT_POINTS_THRESHOLD, DEFAULT_RESOLUTION};

pub const DEFAULT_CONFIG_PATH: &str = "./.lidarset/config.json";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Searched first when resolving relative dataset names.
    pub data_directory: Option<String>,
    /// Where intermediate LAS files and rasters are written.
    pub temporary_directory: Option<String>,

    // External tools
    pub pdal_executable: String,
    pub gdaldem_executable: String,

    // Defaults for visualisation commands
    pub default_resolution: f64,
    pub points_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: None,
            temporary_directory: None,
            pdal_executable: "pdal".to_string(),
            gdaldem_executable: "gdaldem".to_string(),
            default_resolution: DEFAULT_RESOLUTION,
            points_threshold: DEFAULT_POINTS_THRESHOLD,
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn data_directory(&self) -> Option<PathBuf> {
        self.data_directory
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
    }

    pub fn temporary_directory(&self) -> PathBuf {
        match self.temporary_directory.as_deref() {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
            None => std::env::temp_dir().join("lidarset"),
        }
    }
}
