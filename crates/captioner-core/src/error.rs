use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while turning transcript data into a subtitle document.
#[derive(Debug, Error, PartialEq)]
pub enum TranscriptError {
    #[error("invalid timestamp: {0} seconds")]
    InvalidTimestamp(f64),

    #[error("malformed transcript at segment {segment}: {reason}")]
    MalformedTranscript { segment: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch transcript: {0}")]
    FetchFailed(String),

    #[error("transcript body is not a JSON segment list: {0}")]
    MalformedBody(String),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publisher initialization failed: {0}")]
    InitializationFailed(String),

    #[error("failed to publish artifact: {0}")]
    PublishFailed(String),

    #[error("storage service rejected upload (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("publisher not found: {0}")]
    NotFound(String),
}
