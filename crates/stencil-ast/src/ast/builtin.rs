//! Built-in name registry.
//!
//! Built-ins are invoked with `target?name`. The parser keeps the name as
//! written; resolution to a [`BuiltInKind`] happens during analysis so that
//! an unknown name becomes a diagnostic instead of a parse failure.

use std::fmt;

macro_rules! builtins {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Every built-in the language knows about.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltInKind {
            $($variant),+
        }

        impl BuiltInKind {
            /// All built-ins, in registry order.
            pub const ALL: &'static [BuiltInKind] = &[$(BuiltInKind::$variant),+];

            /// Name as written after `?`.
            pub fn name(self) -> &'static str {
                match self {
                    $(BuiltInKind::$variant => $name),+
                }
            }

            /// Resolves a built-in by its exact, case-sensitive name.
            pub fn lookup(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(BuiltInKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

builtins! {
    // Numeric casts
    Int => "int",
    Long => "long",
    Short => "short",
    Byte => "byte",
    Float => "float",
    Double => "double",
    Floor => "floor",
    Ceiling => "ceiling",
    Round => "round",

    // Sequences
    SeqContains => "seq_contains",
    SeqIndexOf => "seq_index_of",
    Size => "size",
    First => "first",
    Last => "last",
    Reverse => "reverse",
    Sort => "sort",
    Join => "join",

    // Hashes
    Keys => "keys",
    Values => "values",

    // Strings
    Xml => "xml",
    Html => "html",
    Url => "url",
    UpperCase => "upper_case",
    LowerCase => "lower_case",
    CapFirst => "cap_first",
    Trim => "trim",
    Length => "length",
    String => "string",
    C => "c",

    // Tests
    HasContent => "has_content",
    IsNumber => "is_number",
    IsString => "is_string",
    IsSequence => "is_sequence",
    IsBoolean => "is_boolean",
}

impl BuiltInKind {
    /// Whether this is one of the numeric-cast family.
    pub fn is_numeric_cast(self) -> bool {
        matches!(
            self,
            BuiltInKind::Int
                | BuiltInKind::Long
                | BuiltInKind::Short
                | BuiltInKind::Byte
                | BuiltInKind::Float
                | BuiltInKind::Double
                | BuiltInKind::Floor
                | BuiltInKind::Ceiling
                | BuiltInKind::Round
        )
    }
}

impl fmt::Display for BuiltInKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_round_trips_every_name() {
        for kind in BuiltInKind::ALL {
            assert_eq!(BuiltInKind::lookup(kind.name()), Some(*kind));
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(BuiltInKind::lookup("round"), Some(BuiltInKind::Round));
        assert_eq!(BuiltInKind::lookup("Round"), None);
        assert_eq!(BuiltInKind::lookup("upper"), None);
        assert_eq!(BuiltInKind::lookup(""), None);
    }

    #[test]
    fn test_numeric_cast_family() {
        let casts: Vec<_> = BuiltInKind::ALL
            .iter()
            .filter(|k| k.is_numeric_cast())
            .map(|k| k.name())
            .collect();
        assert_eq!(
            casts,
            ["int", "long", "short", "byte", "float", "double", "floor", "ceiling", "round"]
        );
    }
}
