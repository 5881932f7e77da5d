//! Error types for larder-core.

use thiserror::Error;

use crate::config::ConfigValidationError;

/// Result type alias using larder-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for larder operations
#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Credential store lock poisoned")]
    LockPoisoned,

    #[error("Unknown service: {0}. Expected 'suggestion' or 'image'.")]
    UnknownService(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigValidationError),

    // HTTP client construction
    #[cfg(feature = "client")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an error for a file that failed to parse
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_path() {
        let err = Error::parse("/tmp/credentials.toml", "expected `=`");
        let text = err.to_string();
        assert!(text.contains("/tmp/credentials.toml"));
        assert!(text.contains("expected `=`"));
    }

    #[test]
    fn test_unknown_service_message() {
        let err = Error::UnknownService("flickr".into());
        assert!(err.to_string().contains("flickr"));
    }
}
