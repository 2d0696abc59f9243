//! DB2 DDL/DML generation.
//!
//! DB2 statements use the default unquoted identifier policy and have no
//! IF NOT EXISTS qualifier.

use crate::core::traits::{base_data_type_to_string, MetaWriter, Naming};
use crate::datatype::DataType;
use crate::error::Result;

pub struct Db2MetaWriter;

impl Naming for Db2MetaWriter {}

impl MetaWriter for Db2MetaWriter {
    fn dialect(&self) -> &'static str {
        "db2"
    }

    fn data_type_to_string(&self, data_type: &DataType) -> Result<String> {
        Ok(match data_type {
            DataType::Double => "DOUBLE PRECISION".to_string(),
            DataType::Float => "REAL".to_string(),
            DataType::Clob => "CLOB".to_string(),
            DataType::Blob => "BLOB".to_string(),
            DataType::Decimal { precision: 0, .. } => "DECIMAL".to_string(),
            // A scale above the precision cannot be rendered; fall back to
            // precision alone.
            DataType::Decimal { precision, scale } => {
                if scale <= precision {
                    format!("DECIMAL({precision}, {scale})")
                } else {
                    format!("DECIMAL({precision})")
                }
            }
            other => base_data_type_to_string(other, MetaWriter::dialect(self))?,
        })
    }
}
