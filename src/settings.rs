//! Program settings, read from `eat_map.toml`.
use crate::data::DEFAULT_NAME_PROPERTY;
use crate::log::DEFAULT_LOG_LEVEL;
use crate::map::RenderOptions;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "eat_map.toml";

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_name_property() -> String {
    DEFAULT_NAME_PROPERTY.to_string()
}

fn default_legend_ticks() -> usize {
    RenderOptions::default().legend_ticks
}

/// Program settings from config file
#[derive(Debug, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// GeoJSON file with the state boundaries; built-in outlines when absent
    #[serde(default)]
    pub boundaries: Option<PathBuf>,
    /// Feature property holding the state name
    #[serde(default = "default_name_property")]
    pub name_property: String,
    /// Number of legend axis ticks
    #[serde(default = "default_legend_ticks")]
    pub legend_ticks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            boundaries: None,
            name_property: default_name_property(),
            legend_ticks: default_legend_ticks(),
        }
    }
}

impl Settings {
    /// Read settings from `eat_map.toml` in the working directory
    pub fn load() -> Result<Settings> {
        Self::load_from_path(Path::new(SETTINGS_FILE_NAME))
    }

    /// Read from the specified path. If the file is not present, defaults are used.
    pub fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Could not read {}", file_path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid settings in {}", file_path.display()))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            legend_ticks: self.legend_ticks,
        }
    }
}
