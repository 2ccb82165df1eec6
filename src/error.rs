use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutosalesError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Completion timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Completion did not contain usable JSON")]
    NoJson,

    #[error("Data service error ({status}): {message}")]
    DataService { status: u16, message: String },

    #[error("Data service is not configured")]
    DataServiceUnavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AutosalesError>;
