use thiserror::Error;

/// Errors produced while loading or reading the configuration registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key was supplied by no source.
    #[error("Missing required key: {0}")]
    MissingKey(String),

    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// A credential is empty or still holds a sample value.
    #[error("Placeholder secret for {0}: supply the real credential")]
    PlaceholderSecret(String),

    /// Lookup of a key that is not declared in the schema.
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Value for {key} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Keys that only make sense together were partially supplied.
    #[error("Incomplete group: {present} is set but {missing} is not")]
    IncompleteGroup { present: String, missing: String },

    /// A declared optional key that no source supplied.
    #[error("Configuration key is not set: {0}")]
    Unset(String),

    /// A source could not produce its key/value pairs.
    #[error("Source {source_name} failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Whether loading again with the same input could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConfigError::Io(_))
    }

    pub(crate) fn type_mismatch(
        key: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_errors_are_retryable() {
        let io = ConfigError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk busy"));
        assert!(io.is_retryable());
        assert!(io.to_string().contains("disk busy"));
        assert!(!ConfigError::MissingKey("appId".into()).is_retryable());
    }
}
