//! # Console Configuration
//!
//! JSON configuration for the console. Every field is optional; missing
//! fields take the device defaults.
//!
//! ```json
//! {
//!   "cols": 40,
//!   "max_lines": 9,
//!   "poll_interval_ms": 5,
//!   "debounce_ms": 10,
//!   "max_input_len": 120,
//!   "banner": ["PYTHON REPL", "READY..."],
//!   "palette": { "normal": "#00FF00", "error": "#FF0000" }
//! }
//! ```

use console_core::{Banner, Palette, DEFAULT_COLS, DEFAULT_MAX_LINES};
use hal::{KeyboardTranslator, DEFAULT_DEBOUNCE_MS};
use repl_console::{ControllerOptions, DEFAULT_POLL_INTERVAL_MS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Transcript width in characters
    pub cols: usize,
    /// Transcript height in lines
    pub max_lines: usize,
    /// Pause between keyboard polls
    pub poll_interval_ms: u64,
    /// Contact-bounce window after a key release
    pub debounce_ms: u64,
    /// Optional input line cap, in characters
    pub max_input_len: Option<usize>,
    /// Lines shown at startup
    pub banner: Vec<String>,
    pub palette: Palette,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            max_lines: DEFAULT_MAX_LINES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_input_len: None,
            banner: Banner::default().lines().to_vec(),
            palette: Palette::default(),
        }
    }
}

impl ConsoleConfig {
    /// Parses and validates a JSON document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 {
            return Err(ConfigError::Invalid("cols must be at least 1".to_string()));
        }
        if self.max_lines == 0 {
            return Err(ConfigError::Invalid(
                "max_lines must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Controller options for this configuration
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            cols: self.cols,
            max_lines: self.max_lines,
            poll_interval_ms: self.poll_interval_ms,
            max_input_len: self.max_input_len,
            banner: Banner::from_lines(self.banner.iter().cloned()),
            palette: self.palette,
        }
    }

    /// Key translator with this configuration's debounce window
    pub fn translator(&self) -> KeyboardTranslator {
        KeyboardTranslator::with_debounce_ms(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_device() {
        let config = ConsoleConfig::default();
        assert_eq!(config.cols, 40);
        assert_eq!(config.max_lines, 9);
        assert_eq!(config.poll_interval_ms, 5);
        assert_eq!(config.banner, vec!["PYTHON REPL", "READY..."]);
        assert!(config.max_input_len.is_none());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(ConsoleConfig::from_json("{}").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config =
            ConsoleConfig::from_json(r##"{"cols": 20, "palette": {"dim": "#333333"}}"##).unwrap();
        assert_eq!(config.cols, 20);
        assert_eq!(config.max_lines, 9);
        assert_eq!(config.palette.dim.0.rgb(), 0x333333);
        assert_eq!(config.palette.normal, Palette::PHOSPHOR.normal);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            ConsoleConfig::from_json(r#"{"cols": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ConsoleConfig::from_json(r#"{"max_lines": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            ConsoleConfig::from_json(r#"{"colz": 10}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_color_rejected() {
        assert!(ConsoleConfig::from_json(r#"{"palette": {"error": "red"}}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_lines": 4, "max_input_len": 16}}"#).unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.max_lines, 4);

        let options = config.controller_options();
        assert_eq!(options.max_lines, 4);
        assert_eq!(options.max_input_len, Some(16));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConsoleConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = ConsoleConfig {
            debounce_ms: 25,
            ..ConsoleConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ConsoleConfig::from_json(&json).unwrap(), config);
    }
}
