//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum fix-mode calls per file after the initial generate call
    pub max_repair_attempts: u32,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Context window requested from the backend
    pub context_size: u32,

    /// Sampling temperature; 0.0 for deterministic decoding
    pub temperature: f32,

    /// Characters of raw model output kept in failure logs
    pub preview_chars: usize,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.context_size == 0 {
            return Err("context_size must be greater than 0".to_string());
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err("temperature must be a non-negative number".to_string());
        }
        if self.preview_chars == 0 {
            return Err("preview_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    ///
    /// Missing keys keep their default values.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// One repair attempt, 120s timeout, 8192-token context, greedy decoding
    fn default() -> Self {
        Self {
            max_repair_attempts: 1,
            request_timeout_secs: 120,
            context_size: 8192,
            temperature: 0.0,
            preview_chars: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_repair_attempts, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_zero_repair_attempts_is_valid() {
        let config = ExtractorConfig {
            max_repair_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ExtractorConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let config = ExtractorConfig {
            temperature: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExtractorConfig::from_toml("max_repair_attempts = 3").unwrap();
        assert_eq!(config.max_repair_attempts, 3);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.preview_chars, 2000);
    }

    #[test]
    fn test_negative_attempts_rejected_by_parser() {
        assert!(ExtractorConfig::from_toml("max_repair_attempts = -1").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            max_repair_attempts: 2,
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
