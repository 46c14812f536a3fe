use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{engine::TiltSettings, Result, TiltCardError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings every tilt engine instance is initialised with.
    pub tilt: TiltSettings,
    /// Number of `.tilt-layer` surfaces on the card.
    pub surfaces: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tilt: TiltSettings::default(),
            surfaces: 1,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if !(self.tilt.max.is_finite() && self.tilt.max > 0.0) {
            return Err(TiltCardError::InvalidInput("tilt.max must be a positive angle"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_card_setup() {
        let config = AppConfig::default();
        assert_eq!(config.surfaces, 1);
        assert_eq!(config.tilt.max, 32.0);
        assert_eq!(config.tilt.gyroscope_samples, 1);
        assert_eq!(config.tilt.perspective, 900.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(r#"{ "surfaces": 3, "tilt": { "max": 30 } }"#).unwrap();
        assert_eq!(config.surfaces, 3);
        assert_eq!(config.tilt.max, 30.0);
        assert_eq!(config.tilt.speed, 1400);
    }

    #[test]
    fn rejects_non_positive_max() {
        let err = AppConfig::from_json_str(r#"{ "tilt": { "max": 0 } }"#).unwrap_err();
        assert!(matches!(err, TiltCardError::InvalidInput(_)));
    }

    #[test]
    fn reports_malformed_json() {
        let err = AppConfig::from_json_str("{ surfaces: }").unwrap_err();
        assert!(matches!(err, TiltCardError::Json(_)));
    }
}
