//! `?seq_contains`.
//!
//! `items?seq_contains` does not produce a boolean directly. It produces a
//! predicate that the template then calls: `items?seq_contains(x)`. The
//! predicate compares with the [`DefaultComparator`] of the environment it
//! is called in, so the same compiled predicate can answer differently under
//! different locales.

use crate::environment::{DefaultComparator, Environment};
use crate::error::{EvalError, Result};
use crate::value::Value;
use std::sync::Arc;

/// Membership predicate over a sequence or collection.
#[derive(Debug, Clone)]
pub struct SeqContains {
    items: Arc<[Value]>,
}

impl SeqContains {
    /// Builds the predicate for `target?seq_contains` where `target`
    /// evaluated to `value`.
    pub fn new(target: &str, value: Option<&Value>) -> Result<Self> {
        match value {
            None => Err(EvalError::UndefinedReference {
                target: target.to_string(),
                what: "Undefined sequence or collection",
            }),
            Some(value) => match value.as_items() {
                Some(items) => Ok(Self {
                    items: items.into(),
                }),
                None => Err(EvalError::TypeMismatch {
                    target: target.to_string(),
                    expected: "sequence or collection",
                    actual: value.type_name(),
                }),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any element equals `needle` under `env`.
    pub fn contains(&self, env: &Environment, needle: &Value) -> bool {
        let comparator = DefaultComparator::new(env);
        self.items.iter().any(|item| comparator.are_equal(item, needle))
    }

    /// The predicate as a closure bound to `env`.
    pub fn bind<'e>(&self, env: &'e Environment) -> impl Fn(&Value) -> bool + 'e {
        let items = Arc::clone(&self.items);
        move |needle| {
            let comparator = DefaultComparator::new(env);
            items.iter().any(|item| comparator.are_equal(item, needle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Collator, Strength};
    use crate::value::Number;
    use std::thread;

    #[test]
    fn test_contains_numbers() {
        let env = Environment::default();
        let seq: Value = vec![1, 2, 3].into();
        let contains = SeqContains::new("nums", Some(&seq)).unwrap();

        assert!(contains.contains(&env, &Value::from(2)));
        assert!(!contains.contains(&env, &Value::from(4)));
        assert!(contains.contains(&env, &Value::from(2.0)));
        assert!(!contains.contains(&env, &Value::from("2")));
        assert_eq!(contains.len(), 3);
    }

    #[test]
    fn test_collection_and_collation() {
        let env = Environment::with_collator(Collator::new("en", Strength::Primary));
        let names = Value::Collection(vec!["Zoë".into(), "Ana".into()]);
        let contains = SeqContains::new("names", Some(&names)).unwrap();

        assert!(contains.contains(&env, &Value::from("zoe")));
        assert!(!contains.contains(&Environment::default(), &Value::from("zoe")));
    }

    #[test]
    fn test_rejects_non_collections() {
        assert_eq!(
            SeqContains::new("user", Some(&Value::from("abc"))).unwrap_err(),
            EvalError::TypeMismatch {
                target: "user".to_string(),
                expected: "sequence or collection",
                actual: "string",
            }
        );
        assert!(matches!(
            SeqContains::new("missing", None),
            Err(EvalError::UndefinedReference { .. })
        ));
        let hash = Value::Hash(Default::default());
        assert!(matches!(
            SeqContains::new("h", Some(&hash)),
            Err(EvalError::TypeMismatch { actual: "hash", .. })
        ));
    }

    #[test]
    fn test_bound_predicate_shared_across_threads() {
        let env = Environment::default();
        let seq: Value = vec![Value::Number(Number::Long(10)), Value::from(20)].into();
        let contains = SeqContains::new("seq", Some(&seq)).unwrap();

        let pred = contains.bind(&env);
        thread::scope(|s| {
            let pred = &pred;
            let a = s.spawn(move || pred(&Value::from(10)));
            let b = s.spawn(move || pred(&Value::from(30)));
            assert!(a.join().unwrap());
            assert!(!b.join().unwrap());
        });
    }
}
