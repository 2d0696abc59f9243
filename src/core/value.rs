//! SQL value types for database-agnostic data transfer.
//!
//! `SqlValue` is the generic value a [`crate::datatype::DataType`] extracts
//! from a source row and binds into a target insert slot. The date/time
//! variants deliberately admit several interchangeable shapes (epoch-based,
//! calendar-based, offset-aware, zone-aware); binding normalizes them to one
//! canonical wire representation per column type.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

/// A single column value in transit between two databases.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL / absent value.
    Null,

    /// 16-bit signed integer (smallint).
    SmallInt(i16),

    /// 32-bit signed integer (int).
    Int(i32),

    /// 64-bit signed integer (bigint).
    BigInt(i64),

    /// 32-bit floating point (real).
    Float(f32),

    /// 64-bit floating point (double precision).
    Double(f64),

    /// Decimal value with arbitrary precision.
    Decimal(Decimal),

    /// Text/string data.
    Text(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Date without time component (calendar-based).
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),

    /// Timestamp without timezone (calendar-based).
    DateTime(NaiveDateTime),

    /// Timestamp with timezone offset (offset-aware).
    DateTimeOffset(DateTime<FixedOffset>),

    /// Timestamp in UTC (zone-aware).
    DateTimeUtc(DateTime<Utc>),

    /// Milliseconds since the Unix epoch (epoch-based).
    EpochMillis(i64),
}

impl SqlValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// A short name for the value's shape, used in error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::SmallInt(_) => "smallint",
            SqlValue::Int(_) => "int",
            SqlValue::BigInt(_) => "bigint",
            SqlValue::Float(_) => "float",
            SqlValue::Double(_) => "double",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Date(_) => "date",
            SqlValue::Time(_) => "time",
            SqlValue::DateTime(_) => "datetime",
            SqlValue::DateTimeOffset(_) => "datetime-offset",
            SqlValue::DateTimeUtc(_) => "datetime-utc",
            SqlValue::EpochMillis(_) => "epoch-millis",
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::SmallInt(v) => write!(f, "{v}"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::BigInt(v) => write!(f, "{v}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Double(v) => write!(f, "{v}"),
            SqlValue::Decimal(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "{v}"),
            SqlValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            SqlValue::Date(v) => write!(f, "{v}"),
            SqlValue::Time(v) => write!(f, "{v}"),
            SqlValue::DateTime(v) => write!(f, "{v}"),
            SqlValue::DateTimeOffset(v) => write!(f, "{v}"),
            SqlValue::DateTimeUtc(v) => write!(f, "{v}"),
            SqlValue::EpochMillis(v) => write!(f, "epoch:{v}"),
        }
    }
}

// Convenience conversions for callers assembling rows by hand.
impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::SmallInt(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Double(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<NaiveTime> for SqlValue {
    fn from(v: NaiveTime) -> Self {
        SqlValue::Time(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::DateTime(v)
    }
}

impl From<DateTime<FixedOffset>> for SqlValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        SqlValue::DateTimeOffset(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::DateTimeUtc(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null() {
        assert!(SqlValue::Null.is_null());
        assert!(!SqlValue::Int(42).is_null());
    }

    #[test]
    fn test_from_option() {
        let v: SqlValue = Some(7i32).into();
        assert_eq!(v, SqlValue::Int(7));
        let v: SqlValue = Option::<i32>::None.into();
        assert_eq!(v, SqlValue::Null);
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::Text("abc".into()).to_string(), "abc");
        assert_eq!(SqlValue::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }
}
