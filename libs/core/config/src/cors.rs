use crate::{env_or_default, ConfigError, FromEnv};

/// Which browser origins may call the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    /// `*`: any origin, credentials disabled
    AnyOrigin,
    /// Explicit allow-list
    Origins(Vec<String>),
}

impl CorsConfig {
    /// Parses a comma-separated origin list. A lone `*` (or an entry of `*`)
    /// allows any origin.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::Invalid(
                "CORS_ORIGINS cannot be empty".to_string(),
            ));
        }

        if origins.iter().any(|o| o == "*") {
            Ok(CorsConfig::AnyOrigin)
        } else {
            Ok(CorsConfig::Origins(origins))
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig::AnyOrigin
    }
}

impl FromEnv for CorsConfig {
    /// Reads CORS_ORIGINS (default `*`).
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(&env_or_default("CORS_ORIGINS", "*"))
    }
}
