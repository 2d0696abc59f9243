//! The closed catalog of semantic column types.
//!
//! `DataType` is a tagged variant type: dialect differences live in explicit
//! mapping functions (the readers' catalog lookups and the writers'
//! `data_type_to_string` overrides), not in an open type hierarchy. Each
//! variant knows how to extract a generic [`SqlValue`] from a named result
//! column and how to coerce a loosely-shaped value into its canonical wire
//! representation for parameter binding.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::connect::Row;
use crate::core::value::SqlValue;
use crate::error::{MetaError, Result};

/// A semantic column type, independent of any one dialect's spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    BigInt,
    SmallInt,
    Double,
    Float,
    Decimal { precision: u32, scale: u32 },
    Char { length: u32 },
    VarChar { length: u32 },
    Date,
    Time { precision: u32 },
    Timestamp { precision: u32 },
    Clob,
    Blob,
    /// A catalog type name with no mapping; structural discovery continues,
    /// values round-trip as text.
    Unknown { name: String },
}

impl DataType {
    /// Build a Decimal variant from raw catalog integers.
    ///
    /// # Errors
    ///
    /// Negative precision or scale is a configuration error.
    pub fn decimal(precision: i64, scale: i64) -> Result<Self> {
        Ok(DataType::Decimal {
            precision: non_negative(precision, "precision")?,
            scale: non_negative(scale, "scale")?,
        })
    }

    /// Build a Char variant from a raw catalog length.
    pub fn char_of(length: i64) -> Result<Self> {
        Ok(DataType::Char {
            length: non_negative(length, "length")?,
        })
    }

    /// Build a VarChar variant from a raw catalog length.
    pub fn var_char(length: i64) -> Result<Self> {
        Ok(DataType::VarChar {
            length: non_negative(length, "length")?,
        })
    }

    /// Build a Time variant from a raw catalog precision.
    pub fn time(precision: i64) -> Result<Self> {
        Ok(DataType::Time {
            precision: non_negative(precision, "precision")?,
        })
    }

    /// Build a Timestamp variant from a raw catalog precision.
    pub fn timestamp(precision: i64) -> Result<Self> {
        Ok(DataType::Timestamp {
            precision: non_negative(precision, "precision")?,
        })
    }

    /// Extract this column's value from a result row.
    ///
    /// NULL columns yield [`SqlValue::Null`]. A non-null value that does not
    /// parse as this type is a `TypeMismatch`.
    pub fn extract(&self, row: &dyn Row, column: &str) -> Result<SqlValue> {
        if let DataType::Blob = self {
            return Ok(match row.get_bytes(column)? {
                Some(b) => SqlValue::Bytes(b.to_vec()),
                None => SqlValue::Null,
            });
        }
        let Some(text) = row.get_text(column)? else {
            return Ok(SqlValue::Null);
        };
        match self {
            DataType::Integer => parse(text, "integer").map(SqlValue::Int),
            DataType::BigInt => parse(text, "bigint").map(SqlValue::BigInt),
            DataType::SmallInt => parse(text, "smallint").map(SqlValue::SmallInt),
            DataType::Double => parse(text, "double").map(SqlValue::Double),
            DataType::Float => parse(text, "float").map(SqlValue::Float),
            DataType::Decimal { .. } => parse(text, "decimal").map(SqlValue::Decimal),
            DataType::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(SqlValue::Date)
                .map_err(|_| mismatch("date", text)),
            DataType::Time { .. } => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
                .map(SqlValue::Time)
                .map_err(|_| mismatch("time", text)),
            DataType::Timestamp { .. } => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .map(SqlValue::DateTime)
                .map_err(|_| mismatch("timestamp", text)),
            DataType::Char { .. }
            | DataType::VarChar { .. }
            | DataType::Clob
            | DataType::Unknown { .. } => Ok(SqlValue::Text(text.to_string())),
            DataType::Blob => unreachable!("handled above"),
        }
    }

    /// Coerce a loosely-shaped value into this type's canonical wire
    /// representation for parameter binding.
    ///
    /// Numeric variants accept any raw number shape; textual variants accept
    /// text and render numbers; the date/time variants accept epoch-based,
    /// calendar-based, offset-aware, and zone-aware shapes. NULL passes
    /// through untouched.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` when the supplied shape cannot be coerced.
    pub fn bind_value(&self, value: SqlValue) -> Result<SqlValue> {
        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        match self {
            DataType::Integer => to_i64(&value)
                .and_then(|v| i32::try_from(v).ok())
                .map(SqlValue::Int)
                .ok_or_else(|| mismatch("integer", &value)),
            DataType::BigInt => to_i64(&value)
                .map(SqlValue::BigInt)
                .ok_or_else(|| mismatch("bigint", &value)),
            DataType::SmallInt => to_i64(&value)
                .and_then(|v| i16::try_from(v).ok())
                .map(SqlValue::SmallInt)
                .ok_or_else(|| mismatch("smallint", &value)),
            DataType::Double => to_f64(&value)
                .map(SqlValue::Double)
                .ok_or_else(|| mismatch("double", &value)),
            DataType::Float => to_f64(&value)
                .map(|v| SqlValue::Float(v as f32))
                .ok_or_else(|| mismatch("float", &value)),
            DataType::Decimal { .. } => to_decimal(&value)
                .map(SqlValue::Decimal)
                .ok_or_else(|| mismatch("decimal", &value)),
            DataType::Char { .. }
            | DataType::VarChar { .. }
            | DataType::Clob
            | DataType::Unknown { .. } => to_text(&value)
                .map(SqlValue::Text)
                .ok_or_else(|| mismatch("text", &value)),
            DataType::Blob => match value {
                SqlValue::Bytes(b) => Ok(SqlValue::Bytes(b)),
                other => Err(mismatch("bytes", &other)),
            },
            DataType::Date => to_date(&value)
                .map(SqlValue::Date)
                .ok_or_else(|| mismatch("date", &value)),
            DataType::Time { .. } => to_time(&value)
                .map(SqlValue::Time)
                .ok_or_else(|| mismatch("time", &value)),
            DataType::Timestamp { .. } => to_datetime(&value)
                .map(SqlValue::DateTime)
                .ok_or_else(|| mismatch("timestamp", &value)),
        }
    }
}

impl std::fmt::Display for DataType {
    /// Canonical display form, for diagnostics only. DDL rendering belongs
    /// to the per-dialect writers.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Integer => write!(f, "Int"),
            DataType::BigInt => write!(f, "BigInt"),
            DataType::SmallInt => write!(f, "SmallInt"),
            DataType::Double => write!(f, "Double"),
            DataType::Float => write!(f, "Float"),
            DataType::Decimal { precision, scale } => write!(f, "Decimal({precision}, {scale})"),
            DataType::Char { length } => write!(f, "Char({length})"),
            DataType::VarChar { length } => write!(f, "VarChar({length})"),
            DataType::Date => write!(f, "Date"),
            DataType::Time { precision } => write!(f, "Time({precision})"),
            DataType::Timestamp { precision } => write!(f, "Timestamp({precision})"),
            DataType::Clob => write!(f, "Clob"),
            DataType::Blob => write!(f, "Blob"),
            DataType::Unknown { name } => write!(f, "{name}"),
        }
    }
}

fn non_negative(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        MetaError::config(format!(
            "{field} is not expected to be negative, but is {value}"
        ))
    })
}

fn mismatch(expected: &'static str, value: impl std::fmt::Display) -> MetaError {
    MetaError::TypeMismatch {
        expected,
        value: value.to_string(),
    }
}

fn parse<T: std::str::FromStr>(text: &str, expected: &'static str) -> Result<T> {
    text.trim()
        .parse::<T>()
        .map_err(|_| mismatch(expected, text))
}

fn to_i64(value: &SqlValue) -> Option<i64> {
    match value {
        SqlValue::SmallInt(v) => Some(i64::from(*v)),
        SqlValue::Int(v) => Some(i64::from(*v)),
        SqlValue::BigInt(v) => Some(*v),
        SqlValue::Decimal(v) => v.to_i64(),
        _ => None,
    }
}

fn to_f64(value: &SqlValue) -> Option<f64> {
    match value {
        SqlValue::Float(v) => Some(f64::from(*v)),
        SqlValue::Double(v) => Some(*v),
        SqlValue::Decimal(v) => v.to_f64(),
        _ => to_i64(value).map(|v| v as f64),
    }
}

fn to_decimal(value: &SqlValue) -> Option<Decimal> {
    match value {
        SqlValue::Decimal(v) => Some(*v),
        SqlValue::Float(v) => Decimal::try_from(*v).ok(),
        SqlValue::Double(v) => Decimal::try_from(*v).ok(),
        SqlValue::Text(v) => v.trim().parse().ok(),
        _ => to_i64(value).map(Decimal::from),
    }
}

fn to_text(value: &SqlValue) -> Option<String> {
    match value {
        SqlValue::Bytes(_) => None,
        SqlValue::Text(v) => Some(v.clone()),
        other => Some(other.to_string()),
    }
}

fn to_date(value: &SqlValue) -> Option<NaiveDate> {
    match value {
        SqlValue::Date(v) => Some(*v),
        _ => to_datetime(value).map(|dt| dt.date()),
    }
}

fn to_time(value: &SqlValue) -> Option<NaiveTime> {
    match value {
        SqlValue::Time(v) => Some(*v),
        _ => to_datetime(value).map(|dt| dt.time()),
    }
}

fn to_datetime(value: &SqlValue) -> Option<NaiveDateTime> {
    match value {
        SqlValue::DateTime(v) => Some(*v),
        SqlValue::DateTimeOffset(v) => Some(v.naive_utc()),
        SqlValue::DateTimeUtc(v) => Some(v.naive_utc()),
        SqlValue::EpochMillis(v) => chrono::DateTime::from_timestamp_millis(*v).map(|d| d.naive_utc()),
        SqlValue::Date(v) => v.and_hms_opt(0, 0, 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn test_constructors_reject_negative() {
        assert!(DataType::decimal(-1, 0).is_err());
        assert!(DataType::decimal(10, -2).is_err());
        assert!(DataType::var_char(-5).is_err());
        assert!(DataType::time(-1).is_err());
        assert!(DataType::timestamp(6).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Integer.to_string(), "Int");
        assert_eq!(
            DataType::Decimal {
                precision: 10,
                scale: 2
            }
            .to_string(),
            "Decimal(10, 2)"
        );
        assert_eq!(
            DataType::Unknown {
                name: "geometry".into()
            }
            .to_string(),
            "geometry"
        );
    }

    #[test]
    fn test_bind_integer_shapes() {
        let ty = DataType::Integer;
        assert_eq!(ty.bind_value(SqlValue::SmallInt(7)).unwrap(), SqlValue::Int(7));
        assert_eq!(ty.bind_value(SqlValue::BigInt(42)).unwrap(), SqlValue::Int(42));
        assert_eq!(
            ty.bind_value(SqlValue::Decimal(Decimal::from(9))).unwrap(),
            SqlValue::Int(9)
        );
        // Overflow cannot be coerced
        assert!(ty.bind_value(SqlValue::BigInt(i64::MAX)).is_err());
        // Wrong shape
        assert!(ty.bind_value(SqlValue::Date(NaiveDate::MIN)).is_err());
    }

    #[test]
    fn test_bind_decimal_accepts_text() {
        let ty = DataType::Decimal {
            precision: 10,
            scale: 2,
        };
        assert_eq!(
            ty.bind_value(SqlValue::Text("12.50".into())).unwrap(),
            SqlValue::Decimal("12.50".parse().unwrap())
        );
        assert!(ty.bind_value(SqlValue::Text("not a number".into())).is_err());
    }

    #[test]
    fn test_bind_timestamp_shapes() {
        let ty = DataType::Timestamp { precision: 6 };
        let naive = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();

        // Calendar-based passes through
        assert_eq!(
            ty.bind_value(SqlValue::DateTime(naive)).unwrap(),
            SqlValue::DateTime(naive)
        );
        // Offset-aware normalizes to UTC
        let offset = FixedOffset::east_opt(3600)
            .unwrap()
            .from_utc_datetime(&naive);
        assert_eq!(
            ty.bind_value(SqlValue::DateTimeOffset(offset)).unwrap(),
            SqlValue::DateTime(naive)
        );
        // Zone-aware
        let utc = Utc.from_utc_datetime(&naive);
        assert_eq!(
            ty.bind_value(SqlValue::DateTimeUtc(utc)).unwrap(),
            SqlValue::DateTime(naive)
        );
        // Epoch-based
        let millis = utc.timestamp_millis();
        assert_eq!(
            ty.bind_value(SqlValue::EpochMillis(millis)).unwrap(),
            SqlValue::DateTime(naive)
        );
        // Shape that cannot coerce
        assert!(ty.bind_value(SqlValue::Text("tomorrow".into())).is_err());
    }

    #[test]
    fn test_bind_null_passes_through() {
        assert_eq!(
            DataType::Integer.bind_value(SqlValue::Null).unwrap(),
            SqlValue::Null
        );
        assert_eq!(
            DataType::Blob.bind_value(SqlValue::Null).unwrap(),
            SqlValue::Null
        );
    }

    #[test]
    fn test_bind_text_renders_numbers() {
        let ty = DataType::VarChar { length: 50 };
        assert_eq!(
            ty.bind_value(SqlValue::Int(5)).unwrap(),
            SqlValue::Text("5".into())
        );
        assert!(ty.bind_value(SqlValue::Bytes(vec![0])).is_err());
    }
}
