//! Error types for the migration library.

use thiserror::Error;

/// Main error type for schema introspection, DDL generation, and migration.
#[derive(Error, Debug)]
pub enum MetaError {
    /// Configuration error (invalid batch size, identifier grammar violation,
    /// duplicate map keys, negative type parameters, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog row this reader cannot parse. Fatal: the live catalog does
    /// not match the expected shape.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A DataType variant with no rendering in the active dialect. Fatal,
    /// never silently approximated.
    #[error("Data type {data_type} is not supported by the {dialect} dialect")]
    UnsupportedType {
        data_type: String,
        dialect: &'static str,
    },

    /// A value whose shape cannot be coerced to a column's wire
    /// representation during parameter binding.
    #[error("Cannot bind {value} as {expected}")]
    TypeMismatch {
        expected: &'static str,
        value: String,
    },

    /// Any underlying connection or statement failure, propagated verbatim.
    #[error("Database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error (configuration file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MetaError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        MetaError::Config(message.into())
    }

    /// Create a Catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        MetaError::Catalog(message.into())
    }

    /// Wrap an underlying driver error.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        MetaError::Database(Box::new(err))
    }

    /// Wrap a plain driver error message.
    pub fn database_msg(message: impl Into<String>) -> Self {
        #[derive(Debug, Error)]
        #[error("{0}")]
        struct Message(String);
        MetaError::Database(Box::new(Message(message.into())))
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MetaError::config("batch size must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: batch size must be at least 1"
        );

        let err = MetaError::UnsupportedType {
            data_type: "Clob".to_string(),
            dialect: "base",
        };
        assert!(err.to_string().contains("Clob"));
        assert!(err.to_string().contains("base"));
    }

    #[test]
    fn test_database_error_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection closed");
        let err = MetaError::database(io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
