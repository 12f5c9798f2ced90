//! Throttle configuration.

use std::path::Path;

use mc2_protocol::check_position;
use mc2_throttle_scale::{ThrottleScale, ThrottleScaleConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ThrottleError, ThrottleResult};

/// Settings for a [`Throttle`](crate::Throttle), stored as JSON.
///
/// ```json
/// { "zero_position": 10, "scale": { "zero_offset": 10, "step_count": 28 } }
/// ```
///
/// Missing fields take their defaults: zero position 0 and no scale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Lowest position the slider may rest at, `0..=255`.
    pub zero_position: i32,
    /// Position/step scale, if the application works in steps.
    pub scale: Option<ThrottleScaleConfig>,
}

impl ThrottleConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::Config`] on malformed JSON.
    pub fn from_json_str(json: &str) -> ThrottleResult<Self> {
        serde_json::from_str(json).map_err(|e| ThrottleError::Config(e.to_string()))
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::Config`] if serialization fails.
    pub fn to_json_string(&self) -> ThrottleResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ThrottleError::Config(e.to_string()))
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::Io`] if the file cannot be read and
    /// [`ThrottleError::Config`] if it is not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> ThrottleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        debug!("Loaded throttle config from {:?}", path);
        Ok(config)
    }

    /// Writes the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> ThrottleResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        debug!("Saved throttle config to {:?}", path);
        Ok(())
    }

    /// Checks the zero position and builds the scale, if any.
    ///
    /// # Errors
    ///
    /// Returns a protocol error for an invalid zero position and a scale
    /// error for an invalid scale.
    pub fn validate(&self) -> ThrottleResult<Option<ThrottleScale>> {
        check_position(self.zero_position)?;
        Ok(self.scale.map(|scale| scale.build()).transpose()?)
    }
}
