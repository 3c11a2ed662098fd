//! Scoring error types

use thiserror::Error;

/// Errors surfaced by the scoring crate
///
/// The algorithms themselves are total. Errors only come from strict config
/// parsing and from external judges, and judge errors are always replaced by
/// the documented fallback after being logged.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// TOML config could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(String),

    /// JSON config could not be parsed
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Config parsed but holds unusable values
    #[error("Configuration error: {0}")]
    Config(String),

    /// External judge failed
    #[error("Judge error: {0}")]
    Judge(String),
}

impl From<toml::de::Error> for ScoringError {
    fn from(e: toml::de::Error) -> Self {
        ScoringError::TomlParse(e.to_string())
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(e: serde_json::Error) -> Self {
        ScoringError::JsonParse(e.to_string())
    }
}

/// Result alias for fallible scoring operations
pub type Result<T> = std::result::Result<T, ScoringError>;
