//! Error types for RateSmart

/// Result type alias using RateSmart's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for RateSmart operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Classifier construction errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Config file read errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("repetition_ratio must be in (0, 1]");
        assert_eq!(
            err.to_string(),
            "configuration error: repetition_ratio must be in (0, 1]"
        );

        let err = Error::classifier("bad pattern");
        assert_eq!(err.to_string(), "classifier error: bad pattern");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.yaml");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "io error: config.yaml");
    }
}
