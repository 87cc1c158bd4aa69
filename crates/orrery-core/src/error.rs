//! Error types for Orrery

use thiserror::Error;

/// The main error type for Orrery operations
#[derive(Debug, Error)]
pub enum OrreryError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Texture error: {0}")]
    TextureError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for Orrery operations
pub type Result<T> = std::result::Result<T, OrreryError>;

impl From<toml::de::Error> for OrreryError {
    fn from(err: toml::de::Error) -> Self {
        OrreryError::ConfigError(err.to_string())
    }
}
