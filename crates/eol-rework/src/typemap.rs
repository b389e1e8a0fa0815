//! Column-type resolution for parameter binding.
//!
//! MySQL reports each column's type through INFORMATION_SCHEMA; the engine
//! maps that name onto a closed set of value kinds and uses the kind to pick
//! the parameter representation when re-binding row values into the archive
//! table. The table of recognized names is fixed: an unrecognized type
//! aborts the transfer instead of guessing a binding.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql_async::Value;

use crate::error::{ReworkError, Result};

/// Binding kind for one column, resolved from the type name MySQL reports.
///
/// One variant per recognized type name. Resolution is case-insensitive and
/// fail-closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Bit,
    Binary,
    VarBinary,
    Char,
    VarChar,
    Text,
    Enum,
    Date,
    DateTime,
    Time,
    Timestamp,
    Year,
}

impl ValueKind {
    /// Resolve a reported type name to its binding kind.
    ///
    /// # Errors
    ///
    /// Returns `ReworkError::UnsupportedColumnType` for any name outside the
    /// fixed table.
    pub fn resolve(type_name: &str) -> Result<Self> {
        match type_name.to_lowercase().as_str() {
            // Integer widths
            "tinyint" => Ok(ValueKind::TinyInt),
            "smallint" => Ok(ValueKind::SmallInt),
            "mediumint" => Ok(ValueKind::MediumInt),
            "int" => Ok(ValueKind::Int),
            "bigint" => Ok(ValueKind::BigInt),

            // Floating point and fixed decimal
            "float" => Ok(ValueKind::Float),
            "double" => Ok(ValueKind::Double),
            "decimal" => Ok(ValueKind::Decimal),

            // Bit and binary
            "bit" => Ok(ValueKind::Bit),
            "binary" => Ok(ValueKind::Binary),
            "varbinary" => Ok(ValueKind::VarBinary),

            // Strings
            "char" => Ok(ValueKind::Char),
            "varchar" => Ok(ValueKind::VarChar),
            "text" => Ok(ValueKind::Text),
            "enum" => Ok(ValueKind::Enum),

            // Temporal
            "date" => Ok(ValueKind::Date),
            "datetime" => Ok(ValueKind::DateTime),
            "time" => Ok(ValueKind::Time),
            "timestamp" => Ok(ValueKind::Timestamp),
            "year" => Ok(ValueKind::Year),

            other => Err(ReworkError::unsupported_column_type(other)),
        }
    }

    /// Normalize a raw driver value into the parameter representation for
    /// this kind.
    ///
    /// Rows read over the text protocol carry every non-NULL value as raw
    /// bytes; numeric and temporal kinds convert those to typed values before
    /// re-binding. Already-typed values and NULL pass through, as does any
    /// text the server will coerce itself.
    pub fn bind(self, raw: Value) -> Value {
        if matches!(raw, Value::NULL) {
            return raw;
        }
        match self {
            ValueKind::TinyInt
            | ValueKind::SmallInt
            | ValueKind::MediumInt
            | ValueKind::Int
            | ValueKind::BigInt
            | ValueKind::Year => coerce_int(raw),
            ValueKind::Float => coerce_float(raw),
            ValueKind::Double => coerce_double(raw),
            ValueKind::Date | ValueKind::DateTime | ValueKind::Timestamp => coerce_datetime(raw),
            ValueKind::Time => coerce_time(raw),
            ValueKind::Decimal
            | ValueKind::Bit
            | ValueKind::Binary
            | ValueKind::VarBinary
            | ValueKind::Char
            | ValueKind::VarChar
            | ValueKind::Text
            | ValueKind::Enum => raw,
        }
    }
}

fn coerce_int(raw: Value) -> Value {
    if let Value::Bytes(ref bytes) = raw {
        if let Some(n) = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
        {
            return Value::Int(n);
        }
    }
    raw
}

fn coerce_float(raw: Value) -> Value {
    if let Value::Bytes(ref bytes) = raw {
        if let Some(f) = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f32>().ok())
        {
            return Value::Float(f);
        }
    }
    raw
}

fn coerce_double(raw: Value) -> Value {
    if let Value::Bytes(ref bytes) = raw {
        if let Some(f) = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
        {
            return Value::Double(f);
        }
    }
    raw
}

fn coerce_datetime(raw: Value) -> Value {
    if let Value::Bytes(ref bytes) = raw {
        if let Ok(text) = std::str::from_utf8(bytes) {
            let text = text.trim();
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
                return Value::Date(
                    dt.year() as u16,
                    dt.month() as u8,
                    dt.day() as u8,
                    dt.hour() as u8,
                    dt.minute() as u8,
                    dt.second() as u8,
                    dt.nanosecond() / 1_000,
                );
            }
            if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Value::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0);
            }
        }
    }
    raw
}

fn coerce_time(raw: Value) -> Value {
    // TIME values outside chrono's 0..24h range (MySQL allows up to 838h,
    // signed) fall through as text; the server parses those itself.
    if let Value::Bytes(ref bytes) = raw {
        if let Ok(text) = std::str::from_utf8(bytes) {
            if let Ok(t) = NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f") {
                return Value::Time(
                    false,
                    0,
                    t.hour() as u8,
                    t.minute() as u8,
                    t.second() as u8,
                    t.nanosecond() / 1_000,
                );
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Resolution tests
    // =========================================================================

    #[test]
    fn test_resolve_full_table() {
        let table = [
            ("tinyint", ValueKind::TinyInt),
            ("smallint", ValueKind::SmallInt),
            ("mediumint", ValueKind::MediumInt),
            ("int", ValueKind::Int),
            ("bigint", ValueKind::BigInt),
            ("float", ValueKind::Float),
            ("double", ValueKind::Double),
            ("decimal", ValueKind::Decimal),
            ("bit", ValueKind::Bit),
            ("binary", ValueKind::Binary),
            ("varbinary", ValueKind::VarBinary),
            ("char", ValueKind::Char),
            ("varchar", ValueKind::VarChar),
            ("text", ValueKind::Text),
            ("enum", ValueKind::Enum),
            ("date", ValueKind::Date),
            ("datetime", ValueKind::DateTime),
            ("time", ValueKind::Time),
            ("timestamp", ValueKind::Timestamp),
            ("year", ValueKind::Year),
        ];
        for (name, kind) in table {
            assert_eq!(ValueKind::resolve(name).unwrap(), kind, "type {}", name);
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(ValueKind::resolve("VARCHAR").unwrap(), ValueKind::VarChar);
        assert_eq!(ValueKind::resolve("DateTime").unwrap(), ValueKind::DateTime);
        assert_eq!(ValueKind::resolve("BIGINT").unwrap(), ValueKind::BigInt);
    }

    #[test]
    fn test_resolve_rejects_unknown_types() {
        for unknown in ["json", "set", "geometry", "blob", "point", ""] {
            let err = ValueKind::resolve(unknown).unwrap_err();
            assert!(
                matches!(err, ReworkError::UnsupportedColumnType { .. }),
                "type {:?} should be unsupported",
                unknown
            );
        }
    }

    #[test]
    fn test_resolve_error_names_the_type() {
        let err = ValueKind::resolve("GEOMETRY").unwrap_err();
        assert!(err.to_string().contains("geometry"));
    }

    // =========================================================================
    // Binding tests
    // =========================================================================

    #[test]
    fn test_bind_null_passes_through() {
        assert_eq!(ValueKind::Int.bind(Value::NULL), Value::NULL);
        assert_eq!(ValueKind::DateTime.bind(Value::NULL), Value::NULL);
        assert_eq!(ValueKind::VarChar.bind(Value::NULL), Value::NULL);
    }

    #[test]
    fn test_bind_integer_text() {
        assert_eq!(
            ValueKind::Int.bind(Value::Bytes(b"123".to_vec())),
            Value::Int(123)
        );
        assert_eq!(
            ValueKind::BigInt.bind(Value::Bytes(b"-7".to_vec())),
            Value::Int(-7)
        );
        assert_eq!(
            ValueKind::Year.bind(Value::Bytes(b"2021".to_vec())),
            Value::Int(2021)
        );
    }

    #[test]
    fn test_bind_typed_integer_passes_through() {
        assert_eq!(ValueKind::Int.bind(Value::Int(42)), Value::Int(42));
        assert_eq!(ValueKind::TinyInt.bind(Value::UInt(1)), Value::UInt(1));
    }

    #[test]
    fn test_bind_float_and_double_text() {
        assert_eq!(
            ValueKind::Float.bind(Value::Bytes(b"1.5".to_vec())),
            Value::Float(1.5)
        );
        assert_eq!(
            ValueKind::Double.bind(Value::Bytes(b"2.25".to_vec())),
            Value::Double(2.25)
        );
    }

    #[test]
    fn test_bind_datetime_text() {
        assert_eq!(
            ValueKind::DateTime.bind(Value::Bytes(b"2021-03-04 12:30:45".to_vec())),
            Value::Date(2021, 3, 4, 12, 30, 45, 0)
        );
        assert_eq!(
            ValueKind::Timestamp.bind(Value::Bytes(b"2021-03-04 12:30:45.5".to_vec())),
            Value::Date(2021, 3, 4, 12, 30, 45, 500_000)
        );
        assert_eq!(
            ValueKind::Date.bind(Value::Bytes(b"2021-03-04".to_vec())),
            Value::Date(2021, 3, 4, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_bind_time_text() {
        assert_eq!(
            ValueKind::Time.bind(Value::Bytes(b"12:30:45".to_vec())),
            Value::Time(false, 0, 12, 30, 45, 0)
        );
        // Out of chrono's range, left to the server
        assert_eq!(
            ValueKind::Time.bind(Value::Bytes(b"120:00:00".to_vec())),
            Value::Bytes(b"120:00:00".to_vec())
        );
    }

    #[test]
    fn test_bind_string_kinds_pass_bytes_through() {
        let raw = Value::Bytes(b"hello".to_vec());
        assert_eq!(ValueKind::VarChar.bind(raw.clone()), raw);
        assert_eq!(ValueKind::Text.bind(raw.clone()), raw);
        assert_eq!(ValueKind::Enum.bind(raw.clone()), raw);
        assert_eq!(ValueKind::Decimal.bind(raw.clone()), raw);
        assert_eq!(ValueKind::VarBinary.bind(raw.clone()), raw);
    }

    #[test]
    fn test_bind_unparseable_text_passes_through() {
        let raw = Value::Bytes(b"not a number".to_vec());
        assert_eq!(ValueKind::Int.bind(raw.clone()), raw);
        assert_eq!(ValueKind::DateTime.bind(raw.clone()), raw);
    }
}
