use std::time::Duration;

use thiserror::Error;

/// Prefix of factor description lines.
pub const DEFAULT_SENTINEL: &str = "#$";

/// How long an import waits for the vocabulary to finish loading.
pub const DEFAULT_VOCABULARY_TIMEOUT: Duration = Duration::from_secs(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterConfig {
    sentinel: String,
    vocabulary_timeout: Duration,
}

impl ImporterConfig {
    pub fn new(sentinel: &str, vocabulary_timeout: Duration) -> Result<Self, ConfigError> {
        if sentinel.is_empty() || sentinel.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidSentinel(sentinel.to_string()));
        }

        Ok(Self {
            sentinel: sentinel.to_string(),
            vocabulary_timeout,
        })
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn vocabulary_timeout(&self) -> Duration {
        self.vocabulary_timeout
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            vocabulary_timeout: DEFAULT_VOCABULARY_TIMEOUT,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid sentinel, must be non-empty and contain no whitespace. sentinel: '{0}'")]
    InvalidSentinel(String),
}
