//! PostgreSQL DDL/DML generation.

use crate::core::identifier::QuoteStyle;
use crate::core::traits::{base_data_type_to_string, MetaWriter, Naming};
use crate::datatype::DataType;
use crate::error::Result;

pub struct PostgresMetaWriter;

impl Naming for PostgresMetaWriter {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::DoubleQuote
    }
}

impl MetaWriter for PostgresMetaWriter {
    fn dialect(&self) -> &'static str {
        "postgres"
    }

    fn supports_if_not_exists(&self) -> bool {
        true
    }

    fn data_type_to_string(&self, data_type: &DataType) -> Result<String> {
        Ok(match data_type {
            DataType::Double => "DOUBLE".to_string(),
            DataType::Float => "REAL".to_string(),
            DataType::Clob => "TEXT".to_string(),
            DataType::Blob => "BYTEA".to_string(),
            DataType::Decimal { precision: 0, .. } => "NUMERIC".to_string(),
            DataType::Decimal { precision, scale } => {
                if scale <= precision {
                    format!("NUMERIC({precision}, {scale})")
                } else {
                    format!("NUMERIC({precision})")
                }
            }
            other => base_data_type_to_string(other, MetaWriter::dialect(self))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, Index, IndexKind, Table};
    use indexmap::IndexMap;

    fn events_table() -> Table {
        let mut table = Table::new(Some("app"), "events").unwrap();
        let mut columns = IndexMap::new();
        let mut id = Column::new("id", DataType::BigInt).unwrap();
        id.not_null = true;
        columns.insert("id".to_string(), id);
        columns.insert(
            "payload".to_string(),
            Column::new("payload", DataType::Clob).unwrap(),
        );
        columns.insert(
            "raw".to_string(),
            Column::new("raw", DataType::Blob).unwrap(),
        );
        table.set_columns(columns).unwrap();

        let mut indexes = IndexMap::new();
        indexes.insert(
            "pk_events".to_string(),
            Index::new("pk_events", IndexKind::PrimaryKey, vec!["id".into()]).unwrap(),
        );
        table.set_indexes(indexes).unwrap();
        table
    }

    #[test]
    fn test_type_overrides() {
        let writer = PostgresMetaWriter;
        assert_eq!(writer.data_type_to_string(&DataType::Clob).unwrap(), "TEXT");
        assert_eq!(writer.data_type_to_string(&DataType::Blob).unwrap(), "BYTEA");
        assert_eq!(writer.data_type_to_string(&DataType::Float).unwrap(), "REAL");
        assert_eq!(
            writer
                .data_type_to_string(&DataType::Decimal {
                    precision: 12,
                    scale: 4
                })
                .unwrap(),
            "NUMERIC(12, 4)"
        );
        assert_eq!(
            writer
                .data_type_to_string(&DataType::Decimal {
                    precision: 0,
                    scale: 0
                })
                .unwrap(),
            "NUMERIC"
        );
    }

    #[test]
    fn test_create_table_quotes_with_double_quotes() {
        let statements = PostgresMetaWriter
            .create_statements_for(&events_table())
            .unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE IF NOT EXISTS \"app\".\"events\" (\n  \
                 id BIGINT NOT NULL,\n  \
                 payload TEXT,\n  \
                 raw BYTEA,\n  \
                 CONSTRAINT pk_events PRIMARY KEY (id)\n)"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_create_schema_has_if_not_exists() {
        assert_eq!(
            PostgresMetaWriter.create_statement_for_schema("app"),
            "CREATE SCHEMA IF NOT EXISTS \"app\""
        );
    }
}
