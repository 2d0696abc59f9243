//! Per-dialect catalog readers and DDL/DML writers.

pub mod db2;
pub mod mysql;
pub mod postgres;

use serde::{Deserialize, Serialize};

use crate::connect::Row;
use crate::core::traits::{MetaReader, MetaWriter};
use crate::error::{MetaError, Result};

/// The supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    MySql,
    #[serde(alias = "postgresql")]
    Postgres,
    Db2,
}

impl DialectKind {
    /// Parse a dialect name as it appears in configuration.
    ///
    /// # Errors
    ///
    /// Unrecognized names are a configuration error.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DialectKind::MySql),
            "postgres" | "postgresql" => Ok(DialectKind::Postgres),
            "db2" => Ok(DialectKind::Db2),
            other => Err(MetaError::config(format!(
                "Unknown dialect: {other} (expected mysql, postgres, or db2)"
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "postgres",
            DialectKind::Db2 => "db2",
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The catalog reader for a dialect. Readers are stateless.
#[must_use]
pub fn reader_for(kind: DialectKind) -> &'static dyn MetaReader {
    match kind {
        DialectKind::MySql => &mysql::MySqlMetaReader,
        DialectKind::Postgres => &postgres::PostgresMetaReader,
        DialectKind::Db2 => &db2::Db2MetaReader,
    }
}

/// The DDL/DML writer for a dialect. Writers are stateless.
#[must_use]
pub fn writer_for(kind: DialectKind) -> &'static dyn MetaWriter {
    match kind {
        DialectKind::MySql => &mysql::MySqlMetaWriter,
        DialectKind::Postgres => &postgres::PostgresMetaWriter,
        DialectKind::Db2 => &db2::Db2MetaWriter,
    }
}

/// A catalog column that must be present and non-null.
pub(crate) fn required_text(row: &dyn Row, column: &str) -> Result<String> {
    row.get_text(column)?
        .map(str::to_string)
        .ok_or_else(|| MetaError::catalog(format!("catalog column {column} is unexpectedly NULL")))
}

pub(crate) fn optional_text(row: &dyn Row, column: &str) -> Result<Option<String>> {
    Ok(row.get_text(column)?.map(str::to_string))
}

/// A numeric catalog column. NULL reads as 0, matching catalogs that omit
/// the value for inapplicable types.
pub(crate) fn int_or_zero(row: &dyn Row, column: &str) -> Result<i64> {
    match row.get_text(column)? {
        None => Ok(0),
        Some(text) => text.trim().parse().map_err(|_| {
            MetaError::catalog(format!(
                "catalog column {column} holds non-numeric value {text:?}"
            ))
        }),
    }
}
