//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.submit.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "submit.timeout_secs must be > 0".into(),
            ));
        }
        if self.general.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "general.supported_formats must not be empty".into(),
            ));
        }
        if !matches!(self.llm.provider.as_str(), "gemini" | "ollama") {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be \"gemini\" or \"ollama\", got \"{}\"",
                self.llm.provider
            )));
        }
        if !matches!(
            self.logging.level.as_str(),
            "error" | "warn" | "info" | "debug" | "trace"
        ) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of error/warn/info/debug/trace, got \"{}\"",
                self.logging.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.submit.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.general.supported_formats.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supported_formats"));
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = Config::default();
        config.llm.provider = "palm".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.provider"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }
}
