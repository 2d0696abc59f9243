//! PostgreSQL catalog introspection.
//!
//! Schemas, tables, and columns come from `information_schema`. Indexes come
//! from `pg_indexes`, whose `indexdef` column is a textual CREATE INDEX
//! statement; a fixed-grammar parse recovers the method and key columns. An
//! `indexdef` that does not match the grammar is a fatal catalog error.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::connect::DbConnection;
use crate::core::identifier::QuoteStyle;
use crate::core::schema::{Column, Index, IndexKind, Schema, Table};
use crate::core::traits::{MetaReader, Naming};
use crate::datatype::DataType;
use crate::drivers::{int_or_zero, optional_text, required_text};
use crate::error::{MetaError, Result};

const SCHEMAS_SQL: &str = "SELECT schema_name FROM information_schema.schemata \
     WHERE schema_name NOT IN ('information_schema', 'pg_catalog', 'pg_toast') \
     ORDER BY schema_name";

const TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = ? AND table_type = 'BASE TABLE' ORDER BY table_name";

const COLUMNS_SQL: &str = "SELECT column_name, data_type, character_maximum_length, \
     numeric_precision, numeric_scale, datetime_precision, is_nullable \
     FROM information_schema.columns \
     WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position";

const INDEXES_SQL: &str = "SELECT p.indexname, p.indexdef, c.constraint_type \
     FROM pg_indexes p \
     LEFT JOIN information_schema.table_constraints c \
     ON p.schemaname = c.table_schema AND p.tablename = c.table_name \
     AND p.indexname = c.constraint_name \
     WHERE p.schemaname = ? AND p.tablename = ? \
     GROUP BY p.indexname, p.indexdef, c.constraint_type \
     ORDER BY p.indexname";

static INDEX_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^CREATE (UNIQUE )?INDEX ("?)(\w+)"? ON (\w+)\.(\w+) USING (\w+) \((\w+(?:, \w+)*)\)"#,
    )
    .unwrap()
});

pub struct PostgresMetaReader;

impl Naming for PostgresMetaReader {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }
}

impl MetaReader for PostgresMetaReader {
    fn dialect(&self) -> &'static str {
        "postgres"
    }

    fn read_schemas(&self, conn: &mut dyn DbConnection) -> Result<Vec<Schema>> {
        let rows = conn.query(SCHEMAS_SQL, &[])?;
        let mut schemas = Vec::with_capacity(rows.len());
        for row in rows {
            schemas.push(Schema::new(required_text(row.as_ref(), "schema_name")?)?);
        }
        Ok(schemas)
    }

    fn read_tables(&self, conn: &mut dyn DbConnection, schema_name: &str) -> Result<Vec<Table>> {
        let rows = conn.query(TABLES_SQL, &[schema_name.into()])?;
        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(Table::new(
                Some(schema_name),
                required_text(row.as_ref(), "table_name")?,
            )?);
        }
        Ok(tables)
    }

    fn read_columns(
        &self,
        conn: &mut dyn DbConnection,
        table: &Table,
    ) -> Result<IndexMap<String, Column>> {
        let schema = table.schema().unwrap_or_default();
        let rows = conn.query(COLUMNS_SQL, &[schema.into(), table.name().into()])?;
        let mut columns = IndexMap::with_capacity(rows.len());
        for row in rows {
            let row = row.as_ref();
            let name = required_text(row, "column_name")?;
            let data_type = map_data_type(row)?;
            trace!("Column {} of {} reads as {}", name, table.name(), data_type);
            let mut column = Column::new(name.clone(), data_type)?;
            column.not_null = required_text(row, "is_nullable")? == "NO";
            columns.insert(name, column);
        }
        Ok(columns)
    }

    fn read_indexes(
        &self,
        conn: &mut dyn DbConnection,
        table: &Table,
    ) -> Result<IndexMap<String, Index>> {
        let schema = table.schema().unwrap_or_default();
        let rows = conn.query(INDEXES_SQL, &[schema.into(), table.name().into()])?;
        let mut indexes = IndexMap::with_capacity(rows.len());
        for row in rows {
            let row = row.as_ref();
            let name = required_text(row, "indexname")?;
            let definition = required_text(row, "indexdef")?;
            let (unique, columns) = parse_index_definition(&definition)?;
            let kind = if optional_text(row, "constraint_type")?.as_deref() == Some("PRIMARY KEY")
            {
                IndexKind::PrimaryKey
            } else if unique {
                IndexKind::UniqueKey
            } else {
                IndexKind::Normal
            };
            indexes.insert(name.clone(), Index::new(name, kind, columns)?);
        }
        Ok(indexes)
    }
}

/// Whether the definition declares a unique index, and its key columns.
fn parse_index_definition(definition: &str) -> Result<(bool, Vec<String>)> {
    let captures = INDEX_DEF.captures(definition).ok_or_else(|| {
        MetaError::catalog(format!("cannot parse index definition: {definition}"))
    })?;
    let unique = captures.get(1).is_some();
    let columns = captures[7].split(", ").map(str::to_string).collect();
    Ok((unique, columns))
}

fn map_data_type(row: &dyn crate::connect::Row) -> Result<DataType> {
    let type_name = required_text(row, "data_type")?;
    Ok(match type_name.as_str() {
        "integer" => DataType::Integer,
        "bigint" => DataType::BigInt,
        "smallint" => DataType::SmallInt,
        "double precision" => DataType::Double,
        "numeric" => DataType::decimal(
            int_or_zero(row, "numeric_precision")?,
            int_or_zero(row, "numeric_scale")?,
        )?,
        "character varying" => DataType::var_char(int_or_zero(row, "character_maximum_length")?)?,
        "character" => DataType::char_of(int_or_zero(row, "character_maximum_length")?)?,
        "timestamp without time zone" => {
            DataType::timestamp(int_or_zero(row, "datetime_precision")?)?
        }
        "date" => DataType::Date,
        "time without time zone" => DataType::time(int_or_zero(row, "datetime_precision")?)?,
        "text" => DataType::Clob,
        "bytea" => DataType::Blob,
        _ => DataType::Unknown { name: type_name },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::TextRow;
    use std::sync::Arc;

    #[test]
    fn test_parse_index_definition() {
        let (unique, columns) = parse_index_definition(
            "CREATE UNIQUE INDEX pk_users ON app.users USING btree (id)",
        )
        .unwrap();
        assert!(unique);
        assert_eq!(columns, vec!["id"]);

        let (unique, columns) = parse_index_definition(
            "CREATE INDEX ix_users_names ON app.users USING btree (last_name, first_name)",
        )
        .unwrap();
        assert!(!unique);
        assert_eq!(columns, vec!["last_name", "first_name"]);
    }

    #[test]
    fn test_parse_index_definition_with_quoted_name() {
        let (unique, columns) = parse_index_definition(
            "CREATE INDEX \"ix_email\" ON app.users USING btree (email)",
        )
        .unwrap();
        assert!(!unique);
        assert_eq!(columns, vec!["email"]);
    }

    #[test]
    fn test_unparsable_index_definition_is_fatal() {
        let err = parse_index_definition(
            "CREATE INDEX ix_expr ON app.users USING btree (lower(email))",
        )
        .unwrap_err();
        assert!(matches!(err, MetaError::Catalog(_)));
    }

    #[test]
    fn test_map_data_type() {
        let names: Arc<[String]> = [
            "column_name",
            "data_type",
            "character_maximum_length",
            "numeric_precision",
            "numeric_scale",
            "datetime_precision",
            "is_nullable",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let row = TextRow::new(
            names.clone(),
            vec![
                Some("created_at".into()),
                Some("timestamp without time zone".into()),
                None,
                None,
                None,
                Some("6".into()),
                Some("YES".into()),
            ],
        )
        .unwrap();
        assert_eq!(
            map_data_type(&row).unwrap(),
            DataType::Timestamp { precision: 6 }
        );

        let row = TextRow::new(
            names,
            vec![
                Some("payload".into()),
                Some("jsonb".into()),
                None,
                None,
                None,
                None,
                Some("YES".into()),
            ],
        )
        .unwrap();
        assert_eq!(
            map_data_type(&row).unwrap(),
            DataType::Unknown {
                name: "jsonb".to_string()
            }
        );
    }
}
