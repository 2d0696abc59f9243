//! The connection seam between this library and a live database.
//!
//! Acquiring and configuring connections is the caller's responsibility.
//! Readers, writers, and the orchestrator speak to a database exclusively
//! through these object-safe traits, so any driver that can run SQL text and
//! hand back rows can be plugged in.
//!
//! Result values cross the seam as text (plus raw bytes for binary columns);
//! [`crate::datatype::DataType::extract`] parses them into typed values.

use std::sync::Arc;

use crate::core::value::SqlValue;
use crate::error::{MetaError, Result};

/// A single result row, addressed by column name.
///
/// Column name lookup is case-insensitive, matching catalog result sets that
/// report upper- or lower-cased names depending on the dialect.
pub trait Row {
    /// The column's value as text, or `None` for SQL NULL.
    ///
    /// # Errors
    ///
    /// Unknown column names are a catalog error; binary columns that have no
    /// text form are a type mismatch.
    fn get_text(&self, column: &str) -> Result<Option<&str>>;

    /// The column's value as raw bytes, or `None` for SQL NULL.
    fn get_bytes(&self, column: &str) -> Result<Option<&[u8]>>;
}

/// A forward-only cursor over a streamed result set.
pub trait RowStream {
    /// The next row, or `None` when the result set is exhausted.
    fn next_row(&mut self) -> Result<Option<Box<dyn Row>>>;
}

/// A prepared INSERT accumulating rows for batched execution.
pub trait InsertBatch {
    /// Buffer one row of bound parameter values.
    fn append(&mut self, values: Vec<SqlValue>) -> Result<()>;

    /// Execute everything buffered since the previous flush.
    ///
    /// Returns the number of rows written. Flushing an empty buffer is a
    /// no-op returning 0.
    fn flush(&mut self) -> Result<u64>;
}

/// An open database connection.
pub trait DbConnection {
    /// Run a statement that returns no rows (DDL, DELETE, TRUNCATE).
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Run a parameterized query and collect every row.
    ///
    /// Catalog queries are small; they are read eagerly.
    fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Box<dyn Row>>>;

    /// Open a forward-only, read-only stream over a query, fetching
    /// `fetch_size` rows per round trip where the driver supports it.
    fn open_stream(&mut self, sql: &str, fetch_size: usize) -> Result<Box<dyn RowStream + '_>>;

    /// Prepare an INSERT statement for batched execution.
    fn prepare_insert(&mut self, sql: &str) -> Result<Box<dyn InsertBatch + '_>>;
}

/// A result row materialized as decoded text.
///
/// The column name slice is shared across all rows of a result set.
#[derive(Debug, Clone)]
pub struct TextRow {
    names: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl TextRow {
    /// Pair a shared column name list with one row of decoded values.
    ///
    /// # Errors
    ///
    /// The value count must match the column count.
    pub fn new(names: Arc<[String]>, values: Vec<Option<String>>) -> Result<Self> {
        if names.len() != values.len() {
            return Err(MetaError::config(format!(
                "row has {} values for {} columns",
                values.len(),
                names.len()
            )));
        }
        Ok(TextRow { names, values })
    }

    fn index_of(&self, column: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(column))
            .ok_or_else(|| {
                MetaError::catalog(format!("no column named {column:?} in result set"))
            })
    }
}

impl Row for TextRow {
    fn get_text(&self, column: &str) -> Result<Option<&str>> {
        let idx = self.index_of(column)?;
        Ok(self.values[idx].as_deref())
    }

    fn get_bytes(&self, column: &str) -> Result<Option<&[u8]>> {
        let idx = self.index_of(column)?;
        // Text-decoded rows carry no separate binary form.
        Err(MetaError::TypeMismatch {
            expected: "bytes",
            value: match &self.values[idx] {
                Some(v) => v.clone(),
                None => return Ok(None),
            },
        })
    }
}
