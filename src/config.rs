//! YAML configuration for a migration run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::traits::{MetaReader, MetaWriter};
use crate::drivers::{reader_for, writer_for, DialectKind};
use crate::error::{MetaError, Result};
use crate::orchestrator::{CopyMode, MigrationContext};

/// Migration run configuration.
///
/// ```yaml
/// source_dialect: mysql
/// target_dialect: postgres
/// batch_size: 500
/// copy_mode: truncate_first
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dialect of the source connection.
    pub source_dialect: DialectKind,

    /// Dialect of the target connection.
    pub target_dialect: DialectKind,

    /// Rows per insert batch and cursor fetch hint.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// How to treat pre-existing target rows when a created table is loaded.
    #[serde(default)]
    pub copy_mode: CopyMode,
}

fn default_batch_size() -> usize {
    MigrationContext::DEFAULT_BATCH_SIZE
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// A batch size below 1 is a configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            return Err(MetaError::config(format!(
                "data batch size must be at least 1, but is {}",
                self.batch_size
            )));
        }
        Ok(())
    }

    /// The catalog reader for the source dialect.
    #[must_use]
    pub fn source_reader(&self) -> &'static dyn MetaReader {
        reader_for(self.source_dialect)
    }

    /// The catalog reader for the target dialect.
    #[must_use]
    pub fn target_reader(&self) -> &'static dyn MetaReader {
        reader_for(self.target_dialect)
    }

    /// The DDL/DML writer for the target dialect.
    #[must_use]
    pub fn target_writer(&self) -> &'static dyn MetaWriter {
        writer_for(self.target_dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml(
            "source_dialect: mysql\n\
             target_dialect: postgres\n",
        )
        .unwrap();
        assert_eq!(config.source_dialect, DialectKind::MySql);
        assert_eq!(config.target_dialect, DialectKind::Postgres);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.copy_mode, CopyMode::None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml(
            "source_dialect: db2\n\
             target_dialect: postgresql\n\
             batch_size: 500\n\
             copy_mode: truncate_first\n",
        )
        .unwrap();
        assert_eq!(config.source_dialect, DialectKind::Db2);
        assert_eq!(config.target_dialect, DialectKind::Postgres);
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.copy_mode, CopyMode::TruncateFirst);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let err = Config::from_yaml(
            "source_dialect: mysql\n\
             target_dialect: postgres\n\
             batch_size: 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("batch size"));
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        assert!(Config::from_yaml(
            "source_dialect: oracle\n\
             target_dialect: postgres\n"
        )
        .is_err());
    }

    #[test]
    fn test_handles_match_dialects() {
        let config = Config::from_yaml(
            "source_dialect: mysql\n\
             target_dialect: db2\n",
        )
        .unwrap();
        assert_eq!(MetaReader::dialect(config.source_reader()), "mysql");
        assert_eq!(MetaWriter::dialect(config.target_writer()), "db2");
    }
}
