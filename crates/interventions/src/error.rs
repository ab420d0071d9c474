//! Error types for intervention checks

use thiserror::Error;
use webcompat_webdriver::WebDriverError;

#[derive(Error, Debug)]
pub enum InterventionError {
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Unexpected script result: {0}")]
    UnexpectedResult(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("WebDriver error: {0}")]
    Driver(#[from] WebDriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl InterventionError {
    /// Whether this is a plain check failure rather than a harness or browser error
    pub fn is_assertion(&self) -> bool {
        matches!(self, InterventionError::AssertionFailed(_))
    }
}

pub type InterventionResult<T> = Result<T, InterventionError>;
