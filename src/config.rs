//! Settings file
//!
//! A YAML document with optional `simulation` and `viewport` sections. Missing
//! fields take their defaults, so an empty file is a valid configuration.
//!
//! ```yaml
//! simulation:
//!   spring_constant: 0.5
//!   steps_per_second: 30
//! viewport:
//!   pixel_width: 1280
//!   pixel_height: 720
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{LayoutConfig, LayoutError};
use crate::viewport::ViewportConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("invalid viewport config: {0}")]
    Viewport(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: LayoutConfig,
    pub viewport: ViewportConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document instead of defaulting
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        let v = &self.viewport;
        let positive = [
            ("pixel_width", v.pixel_width),
            ("pixel_height", v.pixel_height),
            ("scale", v.scale),
            ("boundary", v.boundary),
        ];
        if let Some((name, value)) = positive
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(ConfigError::Viewport(format!(
                "{name} must be positive, got {value}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
        assert_eq!(Settings::from_yaml("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let settings = Settings::from_yaml(
            "simulation:\n  spring_constant: 0.5\n  steps_per_second: 30\nviewport:\n  pixel_width: 1280\n",
        )
        .unwrap();

        assert_eq!(settings.simulation.spring_constant, 0.5);
        assert_eq!(settings.simulation.steps_per_second, 30.0);
        assert_eq!(settings.simulation.gravity, 1.0);
        assert_eq!(settings.viewport.pixel_width, 1280.0);
        assert_eq!(settings.viewport.pixel_height, 1080.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Settings::from_yaml("simulation:\n  steps_per_second: 0\n"),
            Err(ConfigError::Layout(LayoutError::InvalidConfig(_)))
        ));
        assert!(matches!(
            Settings::from_yaml("viewport:\n  scale: -1\n"),
            Err(ConfigError::Viewport(_))
        ));
        assert!(matches!(
            Settings::from_yaml("simulation: [1, 2]\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        fs::write(&path, "simulation:\n  gravity: 0\n").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.simulation.gravity, 0.0);
    }
}
