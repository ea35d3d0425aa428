//! Render environment and value equality.
//!
//! Equality between data-model values depends on the environment: strings
//! compare through the locale's [`Collator`], so `"Straße" == "strasse"` may
//! or may not hold depending on collation strength.
//!
//! # Design
//!
//! The collator is derived from the locale on first use and memoized in a
//! [`OnceLock`]. An environment is shared by reference across concurrent
//! renders; two threads racing on first use may both build a collator, and
//! only one is kept.

use crate::value::{Number, Value};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::OnceLock;
use tracing::debug;

/// How many differences between two strings count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strength {
    /// Base letters only: case and accents are ignored
    Primary,
    /// Base letters and accents: case is ignored
    Secondary,
    /// Exact comparison
    Tertiary,
}

/// Locale-aware string comparison.
///
/// Accent folding covers the Latin-1 letters; characters outside that range
/// compare by code point at every strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collator {
    locale: String,
    strength: Strength,
}

impl Collator {
    pub fn new(locale: impl Into<String>, strength: Strength) -> Self {
        Self {
            locale: locale.into(),
            strength,
        }
    }

    /// Collator for a BCP 47 locale tag. The strength comes from the tag's
    /// `-u-ks-` extension (`level1`, `level2`, anything else is tertiary).
    ///
    /// ```
    /// # use stencil_builtins::environment::{Collator, Strength};
    /// assert_eq!(Collator::for_locale("de-DE").strength(), Strength::Tertiary);
    /// assert_eq!(Collator::for_locale("de-DE-u-ks-level1").strength(), Strength::Primary);
    /// ```
    pub fn for_locale(locale: &str) -> Self {
        let subtags: Vec<String> = locale
            .split(['-', '_'])
            .map(str::to_ascii_lowercase)
            .collect();
        let strength = subtags
            .windows(2)
            .find(|pair| pair[0] == "ks")
            .map(|pair| match pair[1].as_str() {
                "level1" => Strength::Primary,
                "level2" => Strength::Secondary,
                _ => Strength::Tertiary,
            })
            .unwrap_or(Strength::Tertiary);
        Self::new(locale, strength)
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// Comparison key of `s` at this collator's strength.
    pub fn key<'s>(&self, s: &'s str) -> Cow<'s, str> {
        match self.strength {
            Strength::Tertiary => Cow::Borrowed(s),
            Strength::Secondary => Cow::Owned(s.to_lowercase()),
            Strength::Primary => Cow::Owned(s.to_lowercase().chars().map(fold_accent).collect()),
        }
    }

    pub fn equals(&self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }
}

/// Base letter of a lowercase Latin-1 letter.
fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Per-render settings consulted by built-ins.
#[derive(Debug)]
pub struct Environment {
    locale: String,
    collator: OnceLock<Collator>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Environment {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            collator: OnceLock::new(),
        }
    }

    /// Environment with an explicit collator instead of the locale's.
    pub fn with_collator(collator: Collator) -> Self {
        let env = Self::new(collator.locale());
        // Fresh lock, so this always succeeds.
        let _ = env.collator.set(collator);
        env
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Changes the locale; the collator is rebuilt on next use.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
        self.collator = OnceLock::new();
    }

    pub fn collator(&self) -> &Collator {
        self.collator.get_or_init(|| {
            let collator = Collator::for_locale(&self.locale);
            debug!(locale = %self.locale, strength = ?collator.strength(), "collator created");
            collator
        })
    }

    pub fn comparator(&self) -> DefaultComparator<'_> {
        DefaultComparator::new(self)
    }
}

/// Equality and ordering of data-model values under an [`Environment`].
///
/// Values of different types are never equal and have no order.
#[derive(Debug, Clone, Copy)]
pub struct DefaultComparator<'e> {
    env: &'e Environment,
}

impl<'e> DefaultComparator<'e> {
    pub fn new(env: &'e Environment) -> Self {
        Self { env }
    }

    pub fn are_equal(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => compare_numbers(*x, *y) == Some(Ordering::Equal),
            (Value::String(x), Value::String(y)) => self.env.collator().equals(x, y),
            (Value::Boolean(x), Value::Boolean(y)) => x == y,
            (Value::Sequence(xs), Value::Sequence(ys)) | (Value::Collection(xs), Value::Collection(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| self.are_equal(x, y))
            }
            (Value::Hash(xs), Value::Hash(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .all(|(key, x)| ys.get(key).is_some_and(|y| self.are_equal(x, y)))
            }
            _ => false,
        }
    }

    /// Ordering of two scalars of the same type; `None` otherwise.
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => compare_numbers(*x, *y),
            (Value::String(x), Value::String(y)) => Some(self.env.collator().compare(x, y)),
            (Value::Boolean(x), Value::Boolean(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }
}

/// Numeric comparison across representations: exact when both sides
/// convert to decimals, floating-point otherwise.
fn compare_numbers(x: Number, y: Number) -> Option<Ordering> {
    match (x.to_decimal(), y.to_decimal()) {
        (Some(dx), Some(dy)) => Some(dx.cmp(&dy)),
        _ => x.double_value().partial_cmp(&y.double_value()),
    }
}
