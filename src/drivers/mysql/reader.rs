//! MySQL catalog introspection over `information_schema`.

use indexmap::IndexMap;
use tracing::trace;

use crate::connect::DbConnection;
use crate::core::identifier::QuoteStyle;
use crate::core::schema::{Column, Index, IndexKind, Schema, Table};
use crate::core::traits::{MetaReader, Naming};
use crate::datatype::DataType;
use crate::drivers::{int_or_zero, optional_text, required_text};
use crate::error::Result;

const SCHEMAS_SQL: &str = "SELECT schema_name FROM information_schema.schemata \
     WHERE schema_name NOT IN ('information_schema', 'performance_schema') \
     ORDER BY schema_name";

const TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = ? AND table_type = 'BASE TABLE' ORDER BY table_name";

const COLUMNS_SQL: &str = "SELECT column_name, data_type, character_maximum_length, \
     numeric_precision, numeric_scale, datetime_precision, is_nullable \
     FROM information_schema.columns \
     WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position";

const INDEXES_SQL: &str = "SELECT s.index_name, s.column_name, s.non_unique, c.constraint_type \
     FROM information_schema.statistics s \
     LEFT JOIN information_schema.table_constraints c \
     ON s.table_schema = c.table_schema AND s.table_name = c.table_name \
     AND s.index_name = c.constraint_name \
     WHERE s.table_schema = ? AND s.table_name = ? \
     ORDER BY s.index_name, s.seq_in_index, c.constraint_type";

pub struct MySqlMetaReader;

impl Naming for MySqlMetaReader {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }
}

impl MetaReader for MySqlMetaReader {
    fn dialect(&self) -> &'static str {
        "mysql"
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

        // Rows arrive ordered by index name then key position.
        let mut grouped: IndexMap<String, (IndexKind, Vec<String>)> = IndexMap::new();
        for row in rows {
            let row = row.as_ref();
            let name = required_text(row, "index_name")?;
            let column = required_text(row, "column_name")?;
            let kind = if optional_text(row, "constraint_type")?.as_deref() == Some("PRIMARY KEY") {
                IndexKind::PrimaryKey
            } else if int_or_zero(row, "non_unique")? == 0 {
                IndexKind::UniqueKey
            } else {
                IndexKind::Normal
            };
            grouped.entry(name).or_insert((kind, Vec::new())).1.push(column);
        }

        let mut indexes = IndexMap::with_capacity(grouped.len());
        for (name, (kind, columns)) in grouped {
            indexes.insert(name.clone(), Index::new(name, kind, columns)?);
        }
        Ok(indexes)
    }
}

fn map_data_type(row: &dyn crate::connect::Row) -> Result<DataType> {
    let type_name = required_text(row, "data_type")?;
    Ok(match type_name.as_str() {
        "int" => DataType::Integer,
        "bigint" => DataType::BigInt,
        "smallint" | "tinyint" => DataType::SmallInt,
        "double" => DataType::Double,
        "decimal" => DataType::decimal(
            int_or_zero(row, "numeric_precision")?,
            int_or_zero(row, "numeric_scale")?,
        )?,
        "varchar" => DataType::var_char(int_or_zero(row, "character_maximum_length")?)?,
        "char" => DataType::char_of(int_or_zero(row, "character_maximum_length")?)?,
        "datetime" | "timestamp" => {
            DataType::timestamp(int_or_zero(row, "datetime_precision")?)?
        }
        "date" => DataType::Date,
        "time" => DataType::time(int_or_zero(row, "datetime_precision")?)?,
        "text" | "longtext" => DataType::Clob,
        "blob" => DataType::Blob,
        _ => DataType::Unknown { name: type_name },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::{Row, TextRow};
    use std::sync::Arc;

    fn column_row(values: &[Option<&str>]) -> TextRow {
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
        TextRow::new(names, values.iter().map(|v| v.map(str::to_string)).collect()).unwrap()
    }

    #[test]
    fn test_map_numeric_types() {
        let row = column_row(&[
            Some("amount"),
            Some("decimal"),
            None,
            Some("10"),
            Some("2"),
            None,
            Some("YES"),
        ]);
        assert_eq!(
            map_data_type(&row).unwrap(),
            DataType::Decimal {
                precision: 10,
                scale: 2
            }
        );

        let row = column_row(&[
            Some("n"),
            Some("tinyint"),
            None,
            Some("3"),
            Some("0"),
            None,
            Some("NO"),
        ]);
        assert_eq!(map_data_type(&row).unwrap(), DataType::SmallInt);
    }

    #[test]
    fn test_map_textual_and_temporal_types() {
        let row = column_row(&[
            Some("name"),
            Some("varchar"),
            Some("50"),
            None,
            None,
            None,
            Some("YES"),
        ]);
        assert_eq!(map_data_type(&row).unwrap(), DataType::VarChar { length: 50 });

        let row = column_row(&[
            Some("created_at"),
            Some("datetime"),
            None,
            None,
            None,
            Some("6"),
            Some("YES"),
        ]);
        assert_eq!(
            map_data_type(&row).unwrap(),
            DataType::Timestamp { precision: 6 }
        );

        let row = column_row(&[
            Some("body"),
            Some("longtext"),
            None,
            None,
            None,
            None,
            Some("YES"),
        ]);
        assert_eq!(map_data_type(&row).unwrap(), DataType::Clob);
    }

    #[test]
    fn test_unrecognized_type_degrades_to_unknown() {
        let row = column_row(&[
            Some("pos"),
            Some("geometry"),
            None,
            None,
            None,
            None,
            Some("YES"),
        ]);
        assert_eq!(
            map_data_type(&row).unwrap(),
            DataType::Unknown {
                name: "geometry".to_string()
            }
        );
    }

    #[test]
    fn test_null_catalog_length_reads_as_zero() {
        let names: Arc<[String]> = ["character_maximum_length"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = TextRow::new(names, vec![None]).unwrap();
        assert_eq!(int_or_zero(&row as &dyn Row, "character_maximum_length").unwrap(), 0);
    }
}
