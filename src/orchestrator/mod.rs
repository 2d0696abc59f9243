//! Table migration: additive structure reconciliation and batched data
//! transfer between two live connections.
//!
//! A [`MigrationContext`] bundles the per-invocation state (dialect handles,
//! the two connections, the batch size). It holds mutable borrows of both
//! connections, so one context serves one migration at a time; concurrent
//! table migrations each get their own context over their own connections.
//! No transaction control happens here: commit and rollback belong to the
//! caller.

use tracing::{debug, info, trace};

use crate::connect::DbConnection;
use crate::core::schema::Table;
use crate::core::traits::{MetaReader, MetaWriter};
use crate::error::{MetaError, Result};
use serde::{Deserialize, Serialize};

/// What to do with rows already in the target table before a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMode {
    /// Leave existing rows in place.
    #[default]
    None,
    /// TRUNCATE the target table first.
    TruncateFirst,
    /// DELETE every target row first.
    DeleteAllFirst,
}

/// How structure reconciliation left the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureOutcome {
    /// The table was absent and has been created.
    Created,
    /// The table was present; any missing columns and indexes were added.
    AlreadyExisted,
}

/// Per-invocation migration state.
pub struct MigrationContext<'a> {
    source_reader: &'a dyn MetaReader,
    source: &'a mut dyn DbConnection,
    target_reader: &'a dyn MetaReader,
    target_writer: &'a dyn MetaWriter,
    target: &'a mut dyn DbConnection,
    batch_size: usize,
}

impl<'a> MigrationContext<'a> {
    pub const DEFAULT_BATCH_SIZE: usize = 100;

    /// # Errors
    ///
    /// A batch size below 1 is a configuration error.
    pub fn new(
        source_reader: &'a dyn MetaReader,
        source: &'a mut dyn DbConnection,
        target_reader: &'a dyn MetaReader,
        target_writer: &'a dyn MetaWriter,
        target: &'a mut dyn DbConnection,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size < 1 {
            return Err(MetaError::config(format!(
                "data batch size must be at least 1, but is {batch_size}"
            )));
        }
        Ok(MigrationContext {
            source_reader,
            source,
            target_reader,
            target_writer,
            target,
            batch_size,
        })
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Reconcile the target's structure with the source table.
    ///
    /// The source table's columns and indexes are re-read fresh; the
    /// caller-supplied metadata is never trusted. When the target has no
    /// such table it is created wholesale. Otherwise the diff is strictly
    /// additive: columns and indexes the target lacks (matched by name,
    /// case-insensitively) are added, and nothing existing is altered or
    /// dropped.
    pub fn migrate_table_structure(&mut self, table: &Table) -> Result<StructureOutcome> {
        let source_table = self.read_source_table(table)?;

        let target_table = Table::new(table.schema(), table.name())?;
        let target_columns = self
            .target_reader
            .read_columns(&mut *self.target, &target_table)?;

        if target_columns.is_empty() {
            self.target_writer
                .create_table(&mut *self.target, &source_table)?;
            return Ok(StructureOutcome::Created);
        }

        for column in source_table.columns().values() {
            let present = target_columns
                .keys()
                .any(|name| name.eq_ignore_ascii_case(column.name()));
            if !present {
                self.target_writer
                    .create_column(&mut *self.target, &source_table, column)?;
            }
        }

        // Column additions may carry index prerequisites, so indexes are
        // compared against a fresh read.
        let target_indexes = self
            .target_reader
            .read_indexes(&mut *self.target, &target_table)?;
        for index in source_table.indexes().values() {
            let present = target_indexes
                .keys()
                .any(|name| name.eq_ignore_ascii_case(index.name()));
            if !present {
                self.target_writer
                    .create_index(&mut *self.target, &source_table, index)?;
            }
        }

        info!("Table {} already existed in the target", table.name());
        Ok(StructureOutcome::AlreadyExisted)
    }

    /// Copy every source row into the target in batches.
    ///
    /// One forward-only cursor reads the source with a fetch-size hint equal
    /// to the batch size; one prepared insert accumulates rows on the
    /// target. A full batch flushes every `batch_size` rows and any partial
    /// remainder flushes after the cursor is exhausted. Returns the row
    /// count. Any row-read or flush failure aborts the remaining transfer
    /// and propagates verbatim.
    pub fn migrate_table_data(&mut self, table: &Table) -> Result<u64> {
        let MigrationContext {
            source_reader,
            source,
            target_writer,
            target,
            batch_size,
            ..
        } = self;
        let batch_size = *batch_size as u64;

        let select = source_reader.select_all_sql_for(table);
        debug!("Executing: {}", select);
        let mut rows = source.open_stream(&select, batch_size as usize)?;

        let insert = target_writer.insert_sql_for(table);
        debug!("Preparing: {}", insert);
        let mut batch = target.prepare_insert(&insert)?;

        let mut count: u64 = 0;
        while let Some(row) = rows.next_row()? {
            let mut values = Vec::with_capacity(table.columns().len());
            for column in table.columns().values() {
                let value = column.data_type.extract(row.as_ref(), column.name())?;
                values.push(column.data_type.bind_value(value)?);
            }
            batch.append(values)?;
            count += 1;
            trace!("Buffered row {} of table {}", count, table.name());
            if count % batch_size == 0 {
                let flushed = batch.flush()?;
                debug!("Flushed {} rows into table {}", flushed, table.name());
            }
        }
        if count % batch_size != 0 {
            let flushed = batch.flush()?;
            debug!("Flushed {} rows into table {}", flushed, table.name());
        }
        info!("Copied {} rows of table {}", count, table.name());
        Ok(count)
    }

    /// Reconcile structure, then copy data only when the table was newly
    /// created.
    ///
    /// A pre-existing table gets structural additions but no rows; bulk
    /// loading into a table that already holds data takes an explicit
    /// [`Self::migrate_table_data`] call. When the copy runs, `copy_mode`
    /// chooses whether the target table is emptied first. Returns the copied
    /// row count, or `None` when no copy happened.
    pub fn migrate_table_structure_with_data(
        &mut self,
        table: &Table,
        copy_mode: CopyMode,
    ) -> Result<Option<u64>> {
        match self.migrate_table_structure(table)? {
            StructureOutcome::AlreadyExisted => {
                info!(
                    "Table {} already existed; data copy skipped",
                    table.name()
                );
                Ok(None)
            }
            StructureOutcome::Created => {
                let clear = match copy_mode {
                    CopyMode::None => None,
                    CopyMode::TruncateFirst => {
                        Some(self.target_writer.truncate_table_sql_for(table))
                    }
                    CopyMode::DeleteAllFirst => {
                        Some(self.target_writer.delete_all_sql_for(table))
                    }
                };
                if let Some(sql) = clear {
                    debug!("Executing: {}", sql);
                    self.target.execute(&sql)?;
                }
                self.migrate_table_data(table).map(Some)
            }
        }
    }

    /// The source table with columns and indexes freshly read.
    fn read_source_table(&mut self, table: &Table) -> Result<Table> {
        let mut source_table = Table::new(table.schema(), table.name())?;
        let columns = self
            .source_reader
            .read_columns(&mut *self.source, &source_table)?;
        source_table.set_columns(columns)?;
        let indexes = self
            .source_reader
            .read_indexes(&mut *self.source, &source_table)?;
        source_table.set_indexes(indexes)?;
        Ok(source_table)
    }
}
