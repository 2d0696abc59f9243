//! The dialect seams: catalog readers and DDL/DML writers.
//!
//! [`MetaReader`] and [`MetaWriter`] hold the per-dialect knowledge. The SQL
//! text builders live here as default methods producing the common grammar;
//! dialects override only where their spelling differs (quote character,
//! type names, IF NOT EXISTS support). The builders are pure text functions
//! with no I/O, so every statement can be inspected before execution.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::connect::DbConnection;
use crate::core::identifier::QuoteStyle;
use crate::core::schema::{Column, Index, IndexKind, Schema, Table};
use crate::datatype::DataType;
use crate::error::{MetaError, Result};

/// Identifier quoting and name assembly shared by readers and writers.
pub trait Naming {
    /// The dialect's quoting policy. Unquoted by default.
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    /// Quote one identifier.
    fn quote(&self, identifier: &str) -> String {
        self.quote_style().apply(identifier)
    }

    /// The table's qualified name: `quote(schema).quote(name)` when a schema
    /// is set, the bare unquoted name otherwise.
    fn table_name(&self, table: &Table) -> String {
        match table.schema() {
            Some(schema) => format!("{}.{}", self.quote(schema), self.quote(table.name())),
            None => table.name().to_string(),
        }
    }

    /// A WHERE clause with one placeholder per primary key column.
    ///
    /// Falls back to every column when the table has no primary key.
    fn where_sql_for_primary_key(&self, table: &Table) -> String {
        let conditions: Vec<String> = table
            .primary_key_columns()
            .iter()
            .map(|c| format!("{} = ?", self.quote(c.name())))
            .collect();
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Reads a dialect's system catalog into the unified model.
///
/// A full read proceeds top-down: schemas, then each schema's base tables,
/// then each table's columns, then its indexes. Indexes resolve their column
/// names against the already-populated column map, so columns always load
/// first.
pub trait MetaReader: Naming {
    /// The dialect name, for diagnostics.
    fn dialect(&self) -> &'static str;

    /// Enumerate non-system schemas, ordered by name.
    fn read_schemas(&self, conn: &mut dyn DbConnection) -> Result<Vec<Schema>>;

    /// Enumerate a schema's base tables (views excluded), ordered by name.
    fn read_tables(&self, conn: &mut dyn DbConnection, schema_name: &str) -> Result<Vec<Table>>;

    /// Read a table's columns in ordinal position order.
    fn read_columns(
        &self,
        conn: &mut dyn DbConnection,
        table: &Table,
    ) -> Result<IndexMap<String, Column>>;

    /// Read a table's indexes. The table's columns must be populated first.
    fn read_indexes(
        &self,
        conn: &mut dyn DbConnection,
        table: &Table,
    ) -> Result<IndexMap<String, Index>>;

    /// Read every schema with all tables, columns, and indexes populated.
    fn read(&self, conn: &mut dyn DbConnection) -> Result<Vec<Schema>> {
        let mut schemas = self.read_schemas(conn)?;
        for schema in &mut schemas {
            let name = schema.name().to_string();
            let mut tables = self.read_tables(conn, &name)?;
            for table in &mut tables {
                let columns = self.read_columns(conn, table)?;
                table.set_columns(columns)?;
                let indexes = self.read_indexes(conn, table)?;
                table.set_indexes(indexes)?;
            }
            debug!("Read {} tables of schema {}", tables.len(), name);
            schema.tables = tables;
        }
        info!("Read {} schemas", schemas.len());
        Ok(schemas)
    }

    /// `SELECT col1, col2, ... FROM qualifiedName` over the column map.
    fn select_all_sql_for(&self, table: &Table) -> String {
        let columns: Vec<&str> = table.columns().keys().map(String::as_str).collect();
        format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            self.table_name(table)
        )
    }

    /// The select-all statement narrowed by the primary key WHERE clause.
    fn select_by_primary_key_sql_for(&self, table: &Table) -> String {
        format!(
            "{} {}",
            self.select_all_sql_for(table),
            self.where_sql_for_primary_key(table)
        )
    }
}

/// Emits and executes a dialect's DDL and DML.
pub trait MetaWriter: Naming {
    /// The dialect name, for diagnostics.
    fn dialect(&self) -> &'static str;

    /// Whether CREATE SCHEMA / CREATE TABLE accept an IF NOT EXISTS
    /// qualifier in this dialect.
    fn supports_if_not_exists(&self) -> bool {
        false
    }

    /// Render a data type in this dialect's DDL spelling.
    ///
    /// # Errors
    ///
    /// A variant with no rendering here is an `UnsupportedType` error.
    /// Incorrect DDL is never emitted in its place.
    fn data_type_to_string(&self, data_type: &DataType) -> Result<String> {
        base_data_type_to_string(data_type, MetaWriter::dialect(self))
    }

    /// One column definition as it appears inside CREATE TABLE.
    fn column_in_create_table(&self, column: &Column) -> Result<String> {
        let mut def = format!(
            "{} {}",
            column.name(),
            self.data_type_to_string(&column.data_type)?
        );
        if column.not_null {
            def.push_str(" NOT NULL");
        }
        Ok(def)
    }

    /// The standalone statement creating one index.
    ///
    /// A primary key renders as ALTER TABLE ADD CONSTRAINT, never as CREATE
    /// INDEX.
    fn create_statement_for_index(&self, table: &Table, index: &Index) -> String {
        let columns = index.columns().join(", ");
        match index.kind {
            IndexKind::PrimaryKey => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY ({})",
                self.table_name(table),
                index.name(),
                columns
            ),
            IndexKind::UniqueKey => format!(
                "CREATE UNIQUE INDEX {} ON {} ({})",
                index.name(),
                self.table_name(table),
                columns
            ),
            IndexKind::Normal => format!(
                "CREATE INDEX {} ON {} ({})",
                index.name(),
                self.table_name(table),
                columns
            ),
        }
    }

    /// The ordered statements creating a table.
    ///
    /// Primary key and unique indexes fold into the CREATE TABLE statement
    /// as inline constraints in index-map order; each remaining normal index
    /// follows as its own CREATE INDEX statement.
    fn create_statements_for(&self, table: &Table) -> Result<Vec<String>> {
        let mut definitions: Vec<String> = Vec::with_capacity(table.columns().len());
        for column in table.columns().values() {
            definitions.push(self.column_in_create_table(column)?);
        }
        for index in table.indexes().values() {
            match index.kind {
                IndexKind::PrimaryKey => definitions.push(format!(
                    "CONSTRAINT {} PRIMARY KEY ({})",
                    index.name(),
                    index.columns().join(", ")
                )),
                IndexKind::UniqueKey => {
                    definitions.push(format!("UNIQUE ({})", index.columns().join(", ")));
                }
                IndexKind::Normal => {}
            }
        }
        let qualifier = if self.supports_if_not_exists() {
            "IF NOT EXISTS "
        } else {
            ""
        };
        let mut statements = vec![format!(
            "CREATE TABLE {}{} (\n  {}\n)",
            qualifier,
            self.table_name(table),
            definitions.join(",\n  ")
        )];
        for index in table.indexes().values() {
            if index.kind == IndexKind::Normal {
                statements.push(self.create_statement_for_index(table, index));
            }
        }
        Ok(statements)
    }

    /// The statement adding one column to an existing table.
    fn create_statement_for_column(&self, table: &Table, column: &Column) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.table_name(table),
            self.column_in_create_table(column)?
        ))
    }

    /// The statement creating one schema.
    fn create_statement_for_schema(&self, schema_name: &str) -> String {
        let qualifier = if self.supports_if_not_exists() {
            "IF NOT EXISTS "
        } else {
            ""
        };
        format!("CREATE SCHEMA {}{}", qualifier, self.quote(schema_name))
    }

    /// `INSERT INTO t (cols)\nVALUES (?, ...)` with one placeholder per
    /// column in map order.
    fn insert_sql_for(&self, table: &Table) -> String {
        let columns: Vec<&str> = table.columns().keys().map(String::as_str).collect();
        let placeholders = vec!["?"; columns.len()];
        format!(
            "INSERT INTO {} ({})\nVALUES ({})",
            self.table_name(table),
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// `UPDATE t SET col = ?, ...` over the non-key columns, narrowed by the
    /// primary key WHERE clause.
    fn update_by_primary_key_sql_for(&self, table: &Table) -> String {
        let key_names: Vec<&str> = table
            .primary_key_columns()
            .iter()
            .map(|c| c.name())
            .collect();
        let assignments: Vec<String> = table
            .columns()
            .keys()
            .filter(|name| !key_names.contains(&name.as_str()))
            .map(|name| format!("{name} = ?"))
            .collect();
        format!(
            "UPDATE {} SET {}\n{}",
            self.table_name(table),
            assignments.join(", "),
            self.where_sql_for_primary_key(table)
        )
    }

    /// `DELETE FROM t` narrowed by the primary key WHERE clause.
    fn delete_by_primary_key_sql_for(&self, table: &Table) -> String {
        format!(
            "DELETE FROM {} {}",
            self.table_name(table),
            self.where_sql_for_primary_key(table)
        )
    }

    /// A full-table DELETE, spelled with an always-true predicate.
    fn delete_all_sql_for(&self, table: &Table) -> String {
        format!("DELETE FROM {} WHERE 1 = 1", self.table_name(table))
    }

    /// `TRUNCATE TABLE t`.
    fn truncate_table_sql_for(&self, table: &Table) -> String {
        format!("TRUNCATE TABLE {}", self.table_name(table))
    }

    /// Execute the statement creating a schema.
    fn create_schema(&self, conn: &mut dyn DbConnection, schema_name: &str) -> Result<()> {
        let sql = self.create_statement_for_schema(schema_name);
        debug!("Executing: {}", sql);
        conn.execute(&sql)?;
        info!("Created schema {}", schema_name);
        Ok(())
    }

    /// Execute the statements creating a table and its indexes.
    fn create_table(&self, conn: &mut dyn DbConnection, table: &Table) -> Result<()> {
        for sql in self.create_statements_for(table)? {
            debug!("Executing: {}", sql);
            conn.execute(&sql)?;
        }
        info!("Created table {}", self.table_name(table));
        Ok(())
    }

    /// Execute the statement creating one index.
    ///
    /// Primary keys are created with the table or via ALTER TABLE; asked to
    /// execute one, this logs and does nothing.
    fn create_index(&self, conn: &mut dyn DbConnection, table: &Table, index: &Index) -> Result<()> {
        if index.kind == IndexKind::PrimaryKey {
            info!(
                "Skipping primary key {} of table {}",
                index.name(),
                self.table_name(table)
            );
            return Ok(());
        }
        let sql = self.create_statement_for_index(table, index);
        debug!("Executing: {}", sql);
        conn.execute(&sql)?;
        info!(
            "Created index {} on table {}",
            index.name(),
            self.table_name(table)
        );
        Ok(())
    }

    /// Execute the statement adding one column.
    fn create_column(
        &self,
        conn: &mut dyn DbConnection,
        table: &Table,
        column: &Column,
    ) -> Result<()> {
        let sql = self.create_statement_for_column(table, column)?;
        debug!("Executing: {}", sql);
        conn.execute(&sql)?;
        info!(
            "Added column {} to table {}",
            column.name(),
            self.table_name(table)
        );
        Ok(())
    }
}

/// The dialect-neutral DDL spelling of the portable type variants.
///
/// Dialect writers call this after handling their own overrides; anything
/// left unmatched here has no correct rendering in that dialect.
pub fn base_data_type_to_string(data_type: &DataType, dialect: &'static str) -> Result<String> {
    let rendered = match data_type {
        DataType::Integer => "INT".to_string(),
        DataType::BigInt => "BIGINT".to_string(),
        DataType::SmallInt => "SMALLINT".to_string(),
        DataType::Date => "DATE".to_string(),
        DataType::Time { precision } => with_parameter("TIME", *precision),
        DataType::Timestamp { precision } => with_parameter("TIMESTAMP", *precision),
        DataType::Char { length } => with_parameter("CHAR", *length),
        DataType::VarChar { length } => with_parameter("VARCHAR", *length),
        other => {
            return Err(MetaError::UnsupportedType {
                data_type: other.to_string(),
                dialect,
            })
        }
    };
    Ok(rendered)
}

fn with_parameter(keyword: &str, value: u32) -> String {
    if value > 0 {
        format!("{keyword}({value})")
    } else {
        keyword.to_string()
    }
}
