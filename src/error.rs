use thiserror::Error;

#[derive(Error, Debug)]
pub enum FailtraceError {
    #[error("GitHub API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FailtraceError>;
