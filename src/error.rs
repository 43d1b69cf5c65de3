use thiserror::Error;

/// Text shown to the user for any failed run. The real cause is only logged.
pub const USER_FACING_ERROR: &str = "An error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum GrabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Destination directory error: {0}")]
    Directory(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Conversion error: {0}")]
    Convert(String),

    #[error("Cleanup error: {0}")]
    Cleanup(String),
}

pub type Result<T> = std::result::Result<T, GrabError>;
