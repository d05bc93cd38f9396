//! Configuration for G-code computation
//!
//! A [`Config`] value is passed by reference into every parsing, writing and
//! metadata entry point. There is no process-wide default instance.
//!
//! Configuration files may be TOML or JSON; missing keys fall back to their
//! defaults.

use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Highest accepted output precision
const MAX_PRECISION: usize = 12;

/// G-code configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of decimal digits written for coordinates
    pub precision: usize,
    /// Feed rate assumed before the first `F` word (mm/min)
    pub default_speed: f64,
    /// Arc subdivision step length (mm)
    pub step: f64,
    /// Write object start/end markers as live commands instead of comments
    pub enable_exclude_object: bool,
    /// Look-behind / look-ahead window of the keyword matcher (lines)
    pub keyword_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: 5,
            default_speed: 1200.0,
            step: 0.1,
            enable_exclude_object: true,
            keyword_window: 20,
        }
    }
}

impl Config {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_default_speed(mut self, speed: f64) -> Self {
        self.default_speed = speed;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_exclude_object(mut self, enable: bool) -> Self {
        self.enable_exclude_object = enable;
        self
    }

    pub fn with_keyword_window(mut self, window: usize) -> Self {
        self.keyword_window = window;
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::InvalidValue {
                key: "precision".to_string(),
                reason: format!("must be at most {}", MAX_PRECISION),
            });
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "step".to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "default_speed".to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        if self.keyword_window == 0 {
            return Err(ConfigError::InvalidValue {
                key: "keyword_window".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> std::result::Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let text = std::fs::read_to_string(path)?;
        let config = match format {
            Format::Toml => Self::from_toml_str(&text)?,
            Format::Json => Self::from_json_str(&text)?,
        };
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save to a `.toml` or `.json` file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = match Format::of(path)? {
            Format::Toml => self.to_toml_string()?,
            Format::Json => serde_json::to_string_pretty(self).map_err(ConfigError::from)?,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Default configuration file location (`<config dir>/gcodetools/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gcodetools").join("config.toml"))
    }

    /// Load the default configuration file, or defaults when it does not exist
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}

enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            other => Err(Error::Config(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            ))),
        }
    }
}
