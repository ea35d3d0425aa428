//! Numeric-cast built-ins: `?int`, `?long`, `?short`, `?byte`, `?float`,
//! `?double`, `?floor`, `?ceiling`, `?round`.
//!
//! The narrowing casts truncate toward zero (`7.9?int` is `7`). Rounding
//! goes through exact decimal arithmetic on the shortest decimal form of the
//! value, so `2.675?round` sees `2.675` rather than the binary float just
//! below it. `?round` is "add one half, then floor": `2.5` rounds to `3`,
//! `-2.5` rounds to `-2`.

use crate::error::{EvalError, Result};
use crate::value::{Number, Value};
use rust_decimal::Decimal;
use stencil_ast::BuiltInKind;

/// One numeric-cast built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericCast {
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    Floor,
    Ceiling,
    Round,
}

impl NumericCast {
    pub const ALL: [NumericCast; 9] = [
        NumericCast::Int,
        NumericCast::Long,
        NumericCast::Short,
        NumericCast::Byte,
        NumericCast::Float,
        NumericCast::Double,
        NumericCast::Floor,
        NumericCast::Ceiling,
        NumericCast::Round,
    ];

    pub fn from_builtin(kind: BuiltInKind) -> Option<Self> {
        match kind {
            BuiltInKind::Int => Some(NumericCast::Int),
            BuiltInKind::Long => Some(NumericCast::Long),
            BuiltInKind::Short => Some(NumericCast::Short),
            BuiltInKind::Byte => Some(NumericCast::Byte),
            BuiltInKind::Float => Some(NumericCast::Float),
            BuiltInKind::Double => Some(NumericCast::Double),
            BuiltInKind::Floor => Some(NumericCast::Floor),
            BuiltInKind::Ceiling => Some(NumericCast::Ceiling),
            BuiltInKind::Round => Some(NumericCast::Round),
            _ => None,
        }
    }

    pub fn builtin(self) -> BuiltInKind {
        match self {
            NumericCast::Int => BuiltInKind::Int,
            NumericCast::Long => BuiltInKind::Long,
            NumericCast::Short => BuiltInKind::Short,
            NumericCast::Byte => BuiltInKind::Byte,
            NumericCast::Float => BuiltInKind::Float,
            NumericCast::Double => BuiltInKind::Double,
            NumericCast::Floor => BuiltInKind::Floor,
            NumericCast::Ceiling => BuiltInKind::Ceiling,
            NumericCast::Round => BuiltInKind::Round,
        }
    }

    /// Converts `n`.
    ///
    /// Fails only when rounding a NaN or an infinity.
    pub fn apply(self, n: Number) -> Result<Number> {
        let converted = match self {
            NumericCast::Int => Number::Int(n.int_value()),
            NumericCast::Long => Number::Long(n.long_value()),
            NumericCast::Short => Number::Short(n.short_value()),
            NumericCast::Byte => Number::Byte(n.byte_value()),
            NumericCast::Float => Number::Float(n.float_value()),
            NumericCast::Double => Number::Double(n.double_value()),
            NumericCast::Floor => self.round_with(n, Decimal::floor, f64::floor)?,
            NumericCast::Ceiling => self.round_with(n, Decimal::ceil, f64::ceil)?,
            NumericCast::Round => self.round_with(n, round_half_up, |x| (x + 0.5).floor())?,
        };
        Ok(converted)
    }

    fn round_with(
        self,
        n: Number,
        exact: fn(&Decimal) -> Decimal,
        approx: fn(f64) -> f64,
    ) -> Result<Number> {
        if let Some(d) = n.to_decimal() {
            return Ok(Number::Decimal(exact(&d)));
        }
        let x = n.double_value();
        if !x.is_finite() {
            return Err(EvalError::Evaluation(format!(
                "Cannot apply ?{} to {n}",
                self.builtin().name()
            )));
        }
        // Too large for a decimal, and already integral as a float.
        Ok(Number::Double(approx(x)))
    }

    /// Evaluates `target?cast` where `target` evaluated to `value`.
    pub fn evaluate(self, target: &str, value: Option<&Value>) -> Result<Value> {
        match value {
            None => Err(EvalError::UndefinedReference {
                target: target.to_string(),
                what: "Undefined number",
            }),
            Some(Value::Number(n)) => self.apply(*n).map(Value::Number),
            Some(other) => Err(EvalError::TypeMismatch {
                target: target.to_string(),
                expected: "number",
                actual: other.type_name(),
            }),
        }
    }
}

fn round_half_up(d: &Decimal) -> Decimal {
    let half = Decimal::new(5, 1);
    d.checked_add(half).unwrap_or(*d).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Number {
        Number::Decimal(Decimal::from_str(s).unwrap())
    }

    fn cast(c: NumericCast, n: Number) -> Number {
        c.apply(n).unwrap()
    }

    #[test]
    fn test_rounding_family() {
        assert_eq!(cast(NumericCast::Round, Number::Double(2.5)), dec("3"));
        assert_eq!(cast(NumericCast::Floor, Number::Double(2.9)), dec("2"));
        assert_eq!(cast(NumericCast::Ceiling, Number::Double(2.1)), dec("3"));
        assert_eq!(cast(NumericCast::Round, Number::Double(-2.5)), dec("-2"));
        assert_eq!(cast(NumericCast::Round, Number::Double(-2.6)), dec("-3"));
        assert_eq!(cast(NumericCast::Floor, Number::Double(-0.5)), dec("-1"));
        assert_eq!(cast(NumericCast::Ceiling, Number::Int(4)), dec("4"));
    }

    #[test]
    fn test_round_uses_decimal_form() {
        // 0.49999999999999994 + 0.5 rounds to 1.0 in binary floating point.
        assert_eq!(cast(NumericCast::Round, Number::Double(0.49999999999999994)), dec("0"));
        assert_eq!(cast(NumericCast::Round, Number::Double(2.675)), dec("3"));
        assert_eq!(cast(NumericCast::Round, dec("1.4999")), dec("1"));
    }

    #[test]
    fn test_truncating_casts() {
        assert_eq!(cast(NumericCast::Int, Number::Double(7.9)), Number::Int(7));
        assert_eq!(cast(NumericCast::Int, Number::Double(-7.9)), Number::Int(-7));
        assert_eq!(cast(NumericCast::Long, dec("123456789012.9")), Number::Long(123_456_789_012));
        assert_eq!(cast(NumericCast::Short, Number::Int(70_000)), Number::Short(4464));
        assert_eq!(cast(NumericCast::Byte, Number::Double(128.0)), Number::Byte(-128));
        assert_eq!(cast(NumericCast::Double, Number::Int(3)), Number::Double(3.0));
        assert_eq!(cast(NumericCast::Float, Number::Double(0.5)), Number::Float(0.5));
    }

    #[test]
    fn test_huge_and_non_finite() {
        assert_eq!(cast(NumericCast::Floor, Number::Double(1e300)), Number::Double(1e300));
        assert!(matches!(
            NumericCast::Round.apply(Number::Double(f64::NAN)),
            Err(EvalError::Evaluation(_))
        ));
    }

    #[test]
    fn test_evaluate_errors() {
        assert_eq!(
            NumericCast::Int.evaluate("price", None),
            Err(EvalError::UndefinedReference {
                target: "price".to_string(),
                what: "Undefined number",
            })
        );
        assert_eq!(
            NumericCast::Int.evaluate("name", Some(&Value::from("abc"))),
            Err(EvalError::TypeMismatch {
                target: "name".to_string(),
                expected: "number",
                actual: "string",
            })
        );
        assert_eq!(
            NumericCast::Int.evaluate("x", Some(&Value::from(7.9))),
            Ok(Value::Number(Number::Int(7)))
        );
    }

    #[test]
    fn test_builtin_mapping() {
        for cast in NumericCast::ALL {
            assert_eq!(NumericCast::from_builtin(cast.builtin()), Some(cast));
            assert!(cast.builtin().is_numeric_cast());
        }
        assert_eq!(NumericCast::from_builtin(BuiltInKind::SeqContains), None);
    }
}
