//! DB2 catalog introspection over the SYSCAT views.
//!
//! SYSCAT.INDEXES packs an index's key columns into a single COLNAMES value
//! of the form `+COL1+COL2`; a value that does not decompose this way is a
//! fatal catalog error.

use indexmap::IndexMap;
use tracing::trace;

use crate::connect::DbConnection;
use crate::core::identifier::QuoteStyle;
use crate::core::schema::{Column, Index, IndexKind, Schema, Table};
use crate::core::traits::{MetaReader, Naming};
use crate::datatype::DataType;
use crate::drivers::{int_or_zero, optional_text, required_text};
use crate::error::{MetaError, Result};

const SCHEMAS_SQL: &str = "SELECT schemaname FROM syscat.schemata \
     WHERE definer <> 'SYSIBM' ORDER BY schemaname";

const TABLES_SQL: &str = "SELECT tabname FROM syscat.tables \
     WHERE tabschema = ? AND \"TYPE\" = 'T' ORDER BY tabname";

const COLUMNS_SQL: &str = "SELECT colname, typename, length, scale, nulls, remarks \
     FROM syscat.columns WHERE tabschema = ? AND tabname = ? ORDER BY colno";

const INDEXES_SQL: &str = "SELECT indname, uniquerule, colnames \
     FROM syscat.indexes WHERE tabschema = ? AND tabname = ? ORDER BY indname";

pub struct Db2MetaReader;

impl Naming for Db2MetaReader {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }
}

impl MetaReader for Db2MetaReader {
    fn dialect(&self) -> &'static str {
        "db2"
    }

    fn read_schemas(&self, conn: &mut dyn DbConnection) -> Result<Vec<Schema>> {
        let rows = conn.query(SCHEMAS_SQL, &[])?;
        let mut schemas = Vec::with_capacity(rows.len());
        for row in rows {
            schemas.push(Schema::new(
                required_text(row.as_ref(), "schemaname")?.trim(),
            )?);
        }
        Ok(schemas)
    }

    fn read_tables(&self, conn: &mut dyn DbConnection, schema_name: &str) -> Result<Vec<Table>> {
        let rows = conn.query(TABLES_SQL, &[schema_name.into()])?;
        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(Table::new(
                Some(schema_name),
                required_text(row.as_ref(), "tabname")?,
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
            let name = required_text(row, "colname")?;
            let data_type = map_data_type(row)?;
            trace!("Column {} of {} reads as {}", name, table.name(), data_type);
            let mut column = Column::new(name.clone(), data_type)?;
            column.not_null = required_text(row, "nulls")? == "N";
            column.comment = optional_text(row, "remarks")?;
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
            let name = required_text(row, "indname")?;
            let kind = match required_text(row, "uniquerule")?.as_str() {
                "P" => IndexKind::PrimaryKey,
                "U" => IndexKind::UniqueKey,
                _ => IndexKind::Normal,
            };
            let columns = split_column_names(&required_text(row, "colnames")?)?;
            indexes.insert(name.clone(), Index::new(name, kind, columns)?);
        }
        Ok(indexes)
    }
}

/// Decompose a SYSCAT.INDEXES COLNAMES value of the form `+COL1+COL2`.
fn split_column_names(col_names: &str) -> Result<Vec<String>> {
    let parts: Vec<String> = col_names
        .split('+')
        .skip(1)
        .map(str::to_string)
        .collect();
    if parts.is_empty() || !col_names.starts_with('+') || parts.iter().any(String::is_empty) {
        return Err(MetaError::catalog(format!(
            "cannot parse index column names: {col_names:?}"
        )));
    }
    Ok(parts)
}

fn map_data_type(row: &dyn crate::connect::Row) -> Result<DataType> {
    let type_name = required_text(row, "typename")?;
    Ok(match type_name.trim() {
        "INTEGER" => DataType::Integer,
        "BIGINT" => DataType::BigInt,
        "DECIMAL" => DataType::decimal(int_or_zero(row, "length")?, int_or_zero(row, "scale")?)?,
        "VARCHAR" | "LONG VARCHAR" => DataType::var_char(int_or_zero(row, "length")?)?,
        "CHARACTER" => DataType::char_of(int_or_zero(row, "length")?)?,
        "TIMESTAMP" => DataType::timestamp(int_or_zero(row, "scale")?)?,
        "DATE" => DataType::Date,
        "TIME" => DataType::time(int_or_zero(row, "scale")?)?,
        "CLOB" => DataType::Clob,
        "BLOB" => DataType::Blob,
        _ => DataType::Unknown { name: type_name },
    })
}
