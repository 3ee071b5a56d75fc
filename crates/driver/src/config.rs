use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Driver and host tuning, loadable from a YAML file.
///
/// Every field has a default so partial files work; hosts layer CLI
/// overrides on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Frames swallowed after each FPS sample before full work resumes.
    /// Zero disables skipping.
    pub skip_frames: u32,
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub splash_color: [f32; 4],
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            skip_frames: 0,
            window_title: "cadence".to_string(),
            window_width: 1280,
            window_height: 720,
            splash_color: [0.06, 0.06, 0.09, 1.0],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DriverConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }
}
