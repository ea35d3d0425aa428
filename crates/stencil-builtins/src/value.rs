//! Runtime values seen by built-ins.
//!
//! The data model hands built-ins dynamically typed values. Numbers keep the
//! width they were produced with, because the narrowing casts (`?byte`,
//! `?short`, ...) are defined in terms of it.

use indexmap::IndexMap;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A number with its representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
}

impl Number {
    pub fn type_name(self) -> &'static str {
        match self {
            Number::Byte(_) => "byte",
            Number::Short(_) => "short",
            Number::Int(_) => "int",
            Number::Long(_) => "long",
            Number::Float(_) => "float",
            Number::Double(_) => "double",
            Number::Decimal(_) => "decimal",
        }
    }

    /// Truncating conversion to 32 bits. Floating values saturate, integral
    /// values keep their low bits.
    pub fn int_value(self) -> i32 {
        match self {
            Number::Byte(v) => v.into(),
            Number::Short(v) => v.into(),
            Number::Int(v) => v,
            Number::Long(v) => v as i32,
            Number::Float(v) => v as i32,
            Number::Double(v) => v as i32,
            Number::Decimal(v) => integral(v) as i32,
        }
    }

    pub fn long_value(self) -> i64 {
        match self {
            Number::Byte(v) => v.into(),
            Number::Short(v) => v.into(),
            Number::Int(v) => v.into(),
            Number::Long(v) => v,
            Number::Float(v) => v as i64,
            Number::Double(v) => v as i64,
            Number::Decimal(v) => integral(v) as i64,
        }
    }

    /// Low 16 bits of [`Self::int_value`].
    pub fn short_value(self) -> i16 {
        match self {
            Number::Long(v) => v as i16,
            other => other.int_value() as i16,
        }
    }

    /// Low 8 bits of [`Self::int_value`].
    pub fn byte_value(self) -> i8 {
        match self {
            Number::Long(v) => v as i8,
            other => other.int_value() as i8,
        }
    }

    pub fn float_value(self) -> f32 {
        match self {
            Number::Int(v) => v as f32,
            Number::Long(v) => v as f32,
            Number::Float(v) => v,
            other => other.double_value() as f32,
        }
    }

    pub fn double_value(self) -> f64 {
        match self {
            Number::Byte(v) => v.into(),
            Number::Short(v) => v.into(),
            Number::Int(v) => v.into(),
            Number::Long(v) => v as f64,
            Number::Float(v) => v.into(),
            Number::Double(v) => v,
            Number::Decimal(v) => v.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// The value as a decimal, using the shortest text that round-trips for
    /// floating representations (`0.1f64` becomes exactly `0.1`).
    ///
    /// `None` for NaN, infinities, and magnitudes a [`Decimal`] cannot hold.
    pub fn to_decimal(self) -> Option<Decimal> {
        match self {
            Number::Byte(v) => Some(v.into()),
            Number::Short(v) => Some(v.into()),
            Number::Int(v) => Some(v.into()),
            Number::Long(v) => Some(v.into()),
            Number::Float(v) => shortest_decimal(v.is_finite(), || v.to_string()),
            Number::Double(v) => shortest_decimal(v.is_finite(), || v.to_string()),
            Number::Decimal(v) => Some(v),
        }
    }

    pub fn is_floating(self) -> bool {
        matches!(self, Number::Float(_) | Number::Double(_))
    }
}

fn integral(d: Decimal) -> i128 {
    // A decimal's mantissa is 96 bits, so its integral part always fits.
    d.trunc().to_i128().unwrap_or_default()
}

fn shortest_decimal(finite: bool, text: impl FnOnce() -> String) -> Option<Decimal> {
    if !finite {
        return None;
    }
    let text = text();
    Decimal::from_str(&text)
        .ok()
        .or_else(|| text.parse::<f64>().ok().and_then(Decimal::from_f64))
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(v) => write!(f, "{v}"),
            Number::Short(v) => write!(f, "{v}"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
            Number::Double(v) => write!(f, "{v}"),
            Number::Decimal(v) => write!(f, "{v}"),
        }
    }
}

/// A dynamically typed data-model value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Number(Number),
    String(String),
    /// Indexable, ordered
    Sequence(Vec<Value>),
    /// Iterable only
    Collection(Vec<Value>),
    Hash(IndexMap<String, Value>),
}

impl Value {
    /// Type name used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Collection(_) => "collection",
            Value::Hash(_) => "hash",
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a sequence or collection.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) | Value::Collection(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(Number::Int(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::Long(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::Double(v))
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Number(Number::Decimal(v))
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Sequence(items) | Value::Collection(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Hash(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_from_double() {
        assert_eq!(Number::Double(7.9).int_value(), 7);
        assert_eq!(Number::Double(-7.9).int_value(), -7);
        assert_eq!(Number::Double(1e20).int_value(), i32::MAX);
        assert_eq!(Number::Double(f64::NAN).long_value(), 0);
        // Byte goes through int first: 300 -> 300i32 -> 44i8
        assert_eq!(Number::Double(300.7).byte_value(), 44);
        assert_eq!(Number::Double(70000.0).short_value(), 4464);
    }

    #[test]
    fn test_narrowing_from_integers_wraps() {
        assert_eq!(Number::Long(1 << 32 | 5).int_value(), 5);
        assert_eq!(Number::Int(200).byte_value(), -56);
        assert_eq!(Number::Long(65_537).short_value(), 1);
    }

    #[test]
    fn test_decimal_truncates() {
        let d = Decimal::from_str("-12.75").unwrap();
        assert_eq!(Number::Decimal(d).int_value(), -12);
        assert_eq!(Number::Decimal(d).long_value(), -12);
    }

    #[test]
    fn test_to_decimal_uses_shortest_text() {
        assert_eq!(
            Number::Double(0.1).to_decimal(),
            Some(Decimal::from_str("0.1").unwrap())
        );
        assert_eq!(
            Number::Float(2.5).to_decimal(),
            Some(Decimal::from_str("2.5").unwrap())
        );
        assert_eq!(Number::Double(f64::INFINITY).to_decimal(), None);
        assert_eq!(Number::Double(1e300).to_decimal(), None);
    }

    #[test]
    fn test_value_conversions_and_names() {
        let v: Value = vec![1, 2, 3].into();
        assert_eq!(v.type_name(), "sequence");
        assert_eq!(v.as_items().map(<[Value]>::len), Some(3));
        assert_eq!(v.to_string(), "[1, 2, 3]");
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).type_name(), "boolean");
    }
}
