//! Board configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest width or height an object may have, in pixels.
pub const MIN_OBJECT_SIZE: f64 = 20.0;
/// Smallest board width in pixels.
pub const MIN_BOARD_WIDTH: f64 = 200.0;
/// Smallest board height in pixels.
pub const MIN_BOARD_HEIGHT: f64 = 200.0;
/// Board width before the first generation.
pub const DEFAULT_BOARD_WIDTH: f64 = 375.0;
/// Board height before the first generation.
pub const DEFAULT_BOARD_HEIGHT: f64 = 667.0;
/// Distance from the north edge to the rotate handle, in pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 32.0;
/// Handle hit radius in pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Distance from the board edge to the outer side of a board resize grip.
pub const BOARD_HANDLE_GAP: f64 = 24.0;
/// Prefix for keys created by "add key" in the metadata panel.
pub const METADATA_KEY_PREFIX: &str = "key";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the board and its interactions.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// # use promptboard_core::BoardConfig;
/// let config = BoardConfig::from_json(r#"{ "min_object_size": 10 }"#).unwrap();
/// assert_eq!(config.min_object_size, 10.0);
/// assert_eq!(config.min_board_width, 200.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub min_object_size: f64,
    pub min_board_width: f64,
    pub min_board_height: f64,
    pub default_board_width: f64,
    pub default_board_height: f64,
    pub rotate_handle_offset: f64,
    pub handle_hit_tolerance: f64,
    pub board_handle_gap: f64,
    pub metadata_key_prefix: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            min_object_size: MIN_OBJECT_SIZE,
            min_board_width: MIN_BOARD_WIDTH,
            min_board_height: MIN_BOARD_HEIGHT,
            default_board_width: DEFAULT_BOARD_WIDTH,
            default_board_height: DEFAULT_BOARD_HEIGHT,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
            handle_hit_tolerance: HANDLE_HIT_TOLERANCE,
            board_handle_gap: BOARD_HANDLE_GAP,
            metadata_key_prefix: METADATA_KEY_PREFIX.to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all sizes are positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("min_object_size", self.min_object_size),
            ("min_board_width", self.min_board_width),
            ("min_board_height", self.min_board_height),
            ("default_board_width", self.default_board_width),
            ("default_board_height", self.default_board_height),
            ("handle_hit_tolerance", self.handle_hit_tolerance),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.rotate_handle_offset.is_finite() || !self.board_handle_gap.is_finite() {
            return Err(ConfigError::Invalid("handle offsets must be finite".to_string()));
        }
        if self.metadata_key_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "metadata_key_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BoardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{ "rotate_handle_offset": 40.0 }"#).unwrap();
        assert!((config.rotate_handle_offset - 40.0).abs() < f64::EPSILON);
        assert!((config.min_object_size - MIN_OBJECT_SIZE).abs() < f64::EPSILON);
        assert_eq!(config.metadata_key_prefix, "key");
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let result = BoardConfig::from_json(r#"{ "min_board_width": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = BoardConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
