use thiserror::Error;

/// Top-level error type for Gamepal.
///
/// Subsystem crates define their own error types and implement
/// `From<GamepalError>` so the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GamepalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<toml::de::Error> for GamepalError {
    fn from(err: toml::de::Error) -> Self {
        GamepalError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GamepalError {
    fn from(err: toml::ser::Error) -> Self {
        GamepalError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GamepalError {
    fn from(err: serde_json::Error) -> Self {
        GamepalError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Gamepal operations.
pub type Result<T> = std::result::Result<T, GamepalError>;
