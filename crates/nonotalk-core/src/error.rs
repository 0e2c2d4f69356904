use thiserror::Error;

/// Top-level error type for the NonoTalk client.
///
/// Covers the concerns shared by every crate in the workspace: configuration,
/// filesystem access and JSON handling. Network and flow errors live in the
/// gateway and chat crates, which wrap this type where they touch config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NonotalkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NonotalkError {
    fn from(err: toml::de::Error) -> Self {
        NonotalkError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NonotalkError {
    fn from(err: toml::ser::Error) -> Self {
        NonotalkError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NonotalkError {
    fn from(err: serde_json::Error) -> Self {
        NonotalkError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for NonoTalk core operations.
pub type Result<T> = std::result::Result<T, NonotalkError>;
