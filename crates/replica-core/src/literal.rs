//! # Literal Formatter
//!
//! Renders scalar field values to their canonical literal text.
//!
//! Formatting never fails loudly: a value whose runtime shape does not fit
//! its declared kind yields `None` and the caller drops that one field.

use crate::classify::{Classification, ScalarKind};
use crate::primitives::{DECIMAL_MARKER, DOUBLE_MARKER, INT64_MARKER, SINGLE_MARKER};
use crate::schema::SpecialRegistry;
use crate::types::FieldValue;
use chrono::{Datelike, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// A rendered scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    /// 16- and 32-bit integers.
    Int(i64),
    Long(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Bool(bool),
    /// A timestamp at exactly midnight.
    Date { year: i32, month: u32, day: u32 },
    DateTime {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    },
    Bytes(Vec<u8>),
    Str(String),
    /// Enumeration or domain-special member reference.
    Member { type_name: String, member: String },
}

impl Literal {
    /// Split a timestamp into the date-only or full constructor form.
    #[must_use]
    pub fn from_datetime(value: &NaiveDateTime) -> Self {
        let (hour, minute, second) = (value.hour(), value.minute(), value.second());
        if hour == 0 && minute == 0 && second == 0 {
            Self::Date {
                year: value.year(),
                month: value.month(),
                day: value.day(),
            }
        } else {
            Self::DateTime {
                year: value.year(),
                month: value.month(),
                day: value.day(),
                hour,
                minute,
                second,
            }
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}{INT64_MARKER}"),
            Self::Single(v) if v.is_nan() => f.write_str("float.NaN"),
            Self::Single(v) if v.is_infinite() => f.write_str(if v.is_sign_positive() {
                "float.PositiveInfinity"
            } else {
                "float.NegativeInfinity"
            }),
            Self::Single(v) => write!(f, "{v}{SINGLE_MARKER}"),
            Self::Double(v) if v.is_nan() => f.write_str("double.NaN"),
            Self::Double(v) if v.is_infinite() => f.write_str(if v.is_sign_positive() {
                "double.PositiveInfinity"
            } else {
                "double.NegativeInfinity"
            }),
            Self::Double(v) => write!(f, "{v}{DOUBLE_MARKER}"),
            Self::Decimal(v) => write!(f, "{v}{DECIMAL_MARKER}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Date { year, month, day } => write!(f, "new DateTime({year}, {month}, {day})"),
            Self::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => write!(
                f,
                "new DateTime({year}, {month}, {day}, {hour}, {minute}, {second})"
            ),
            Self::Bytes(bytes) => {
                let joined: Vec<String> = bytes.iter().map(u8::to_string).collect();
                write!(f, "new byte[]{{{}}}", joined.join(","))
            }
            Self::Str(s) => write!(f, "\"{}\"", escape_string(s)),
            Self::Member { type_name, member } => write!(f, "{type_name}.{member}"),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Escape a string body: backslash, quote, carriage return, line feed.
///
/// One pass over the input, so an escape is never re-escaped.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Coerce a value to a boolean, defaulting to `false` when it cannot be.
#[must_use]
pub fn coerce_bool(value: &FieldValue) -> bool {
    match value {
        FieldValue::Boolean(b) => *b,
        FieldValue::Int16(v) => *v != 0,
        FieldValue::Int32(v) => *v != 0,
        FieldValue::Int64(v) => *v != 0,
        FieldValue::Decimal(v) => !v.is_zero(),
        FieldValue::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn as_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int16(v) => Some(i64::from(*v)),
        FieldValue::Int32(v) => Some(i64::from(*v)),
        FieldValue::Int64(v) => Some(*v),
        _ => None,
    }
}

/// Render a value of a known scalar kind.
///
/// `Null` short-circuits every other rule.
#[must_use]
pub fn format_scalar(kind: ScalarKind, value: &FieldValue) -> Option<Literal> {
    if value.is_null() {
        return Some(Literal::Null);
    }

    match kind {
        ScalarKind::Int16 | ScalarKind::Int32 => as_integer(value).map(Literal::Int),
        ScalarKind::Int64 => as_integer(value).map(Literal::Long),
        ScalarKind::Single => match value {
            FieldValue::Single(v) => Some(Literal::Single(*v)),
            _ => None,
        },
        ScalarKind::Double => match value {
            FieldValue::Double(v) => Some(Literal::Double(*v)),
            FieldValue::Single(v) => Some(Literal::Double(f64::from(*v))),
            _ => None,
        },
        ScalarKind::Decimal => match value {
            FieldValue::Decimal(v) => Some(Literal::Decimal(*v)),
            other => as_integer(other).map(|v| Literal::Decimal(Decimal::from(v))),
        },
        ScalarKind::Boolean => Some(Literal::Bool(coerce_bool(value))),
        ScalarKind::DateTime => match value {
            FieldValue::DateTime(v) => Some(Literal::from_datetime(v)),
            _ => None,
        },
        ScalarKind::String => match value {
            FieldValue::String(s) => Some(Literal::Str(s.clone())),
            _ => None,
        },
        ScalarKind::Bytes => match value {
            FieldValue::Bytes(b) => Some(Literal::Bytes(b.clone())),
            _ => None,
        },
    }
}

/// Render a value according to its field classification.
///
/// Returns `None` for non-inline classifications, shape mismatches, null
/// in a non-nullable value kind and domain-special values with no
/// registered member.
#[must_use]
pub fn format_value(
    class: &Classification,
    value: &FieldValue,
    specials: &SpecialRegistry,
) -> Option<Literal> {
    match class {
        // A value kind without a nullable wrapper has no null literal
        Classification::Scalar(kind) if value.is_null() && !kind.accepts_null() => None,
        Classification::Scalar(kind) | Classification::NullableScalar(kind) => {
            format_scalar(*kind, value)
        }
        Classification::Enumeration(type_name) => match value {
            FieldValue::Null => Some(Literal::Null),
            FieldValue::Enum(member) => Some(Literal::Member {
                type_name: type_name.clone(),
                member: member.clone(),
            }),
            _ => None,
        },
        Classification::DomainSpecial(type_name) => {
            let numeric = match value {
                FieldValue::Null => return Some(Literal::Null),
                FieldValue::Special { value, .. } => *value,
                other => as_integer(other)?,
            };
            specials
                .resolve(type_name, numeric)
                .map(|member| Literal::Member {
                    type_name: type_name.clone(),
                    member: member.to_string(),
                })
        }
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
