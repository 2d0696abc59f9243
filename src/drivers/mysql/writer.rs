//! MySQL DDL/DML generation.

use crate::core::identifier::QuoteStyle;
use crate::core::traits::{base_data_type_to_string, MetaWriter, Naming};
use crate::datatype::DataType;
use crate::error::Result;

pub struct MySqlMetaWriter;

impl Naming for MySqlMetaWriter {
    fn quote_style(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }
}

impl MetaWriter for MySqlMetaWriter {
    fn dialect(&self) -> &'static str {
        "mysql"
    }

    fn supports_if_not_exists(&self) -> bool {
        true
    }

    fn data_type_to_string(&self, data_type: &DataType) -> Result<String> {
        Ok(match data_type {
            DataType::Double => "DOUBLE".to_string(),
            DataType::Float => "FLOAT".to_string(),
            DataType::Clob => "LONGTEXT".to_string(),
            DataType::Blob => "LONGBLOB".to_string(),
            DataType::Decimal { precision: 0, .. } => "DECIMAL".to_string(),
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
