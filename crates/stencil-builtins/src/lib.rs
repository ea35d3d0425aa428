// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Render-time evaluation of stencil built-ins
//!
//! Analysis only checks that a built-in name exists. This crate evaluates
//! the ones whose behaviour is independent of output rendering:
//!
//! - [`numeric`]: `?int`, `?long`, `?short`, `?byte`, `?float`, `?double`,
//!   `?floor`, `?ceiling`, `?round`
//! - [`sequence`]: `?seq_contains`
//! - [`xml`]: `?xml` and the streaming XML escaper
//!
//! Failures are [`EvalError`]s returned to the caller; nothing here records
//! diagnostics.

pub mod environment;
pub mod error;
pub mod numeric;
pub mod sequence;
pub mod value;
pub mod xml;

pub use environment::{Collator, DefaultComparator, Environment, Strength};
pub use error::{EvalError, Result};
pub use numeric::NumericCast;
pub use sequence::SeqContains;
pub use value::{Number, Value};

use stencil_ast::BuiltInKind;
use tracing::trace;

/// Result of a built-in: a plain value, or a predicate the template calls
/// with an argument.
#[derive(Debug, Clone)]
pub enum Evaluated {
    Value(Value),
    Predicate(SeqContains),
}

impl Evaluated {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Evaluated::Value(v) => Some(v),
            Evaluated::Predicate(_) => None,
        }
    }
}

/// Evaluates `target?kind`, where `target_text` is the target's source text
/// (for error messages) and `value` what it evaluated to (`None` if
/// undefined).
///
/// ```
/// use stencil_ast::BuiltInKind;
/// use stencil_builtins::{evaluate_builtin, Number, Value};
///
/// let value = Value::from(7.9);
/// let result = evaluate_builtin(BuiltInKind::Int, "price", Some(&value)).unwrap();
/// assert_eq!(result.into_value(), Some(Value::Number(Number::Int(7))));
/// ```
pub fn evaluate_builtin(kind: BuiltInKind, target_text: &str, value: Option<&Value>) -> Result<Evaluated> {
    trace!(builtin = kind.name(), target = target_text, "evaluating built-in");

    if let Some(cast) = NumericCast::from_builtin(kind) {
        return cast.evaluate(target_text, value).map(Evaluated::Value);
    }
    match kind {
        BuiltInKind::SeqContains => SeqContains::new(target_text, value).map(Evaluated::Predicate),
        BuiltInKind::Xml => match value {
            None => Err(EvalError::UndefinedReference {
                target: target_text.to_string(),
                what: "Undefined string",
            }),
            Some(Value::String(s)) => Ok(Evaluated::Value(Value::String(xml::escape_xml(s).into_owned()))),
            Some(other) => Err(EvalError::TypeMismatch {
                target: target_text.to_string(),
                expected: "string",
                actual: other.type_name(),
            }),
        },
        other => Err(EvalError::Evaluation(format!(
            "The ?{} built-in has no standalone evaluator",
            other.name()
        ))),
    }
}
