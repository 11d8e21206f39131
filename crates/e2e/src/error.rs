//! Error types for E2E testing

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error(
        "Config file not found: {path}\n\
         Create it (or point SIGNVIEW_E2E_CONFIG at one) with contents like:\n\n{example}"
    )]
    ConfigMissing { path: PathBuf, example: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout after {waited_ms} ms waiting for: {what}")]
    Timeout { what: String, waited_ms: u64 },

    #[error("Element not found: {selector} (match #{number})")]
    ElementNotFound { selector: String, number: usize },

    #[error("Document {document} has no {party} party")]
    MissingParty { document: String, party: &'static str },

    #[error("API call {call} failed with status {status}: {body}")]
    ApiStatus {
        call: String,
        status: u16,
        body: String,
    },

    #[error("Scenario panicked: {0}")]
    Panicked(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Fail the current scenario with an [`E2eError::AssertionFailed`] unless the
/// condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::E2eError::AssertionFailed(format!($($arg)+)));
        }
    };
}
