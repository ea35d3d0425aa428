//! Expressions.
//!
//! Inside the arena an expression is a node whose operands are its children:
//! [`ExprKind`] is the payload of a generic expression node, while string
//! literals and built-in calls have node kinds of their own. When the analysis
//! pass needs an expression as a *value* (to rewrite it under an escape block)
//! it materializes the subtree into an owned [`Expr`] with [`Ast::expr`].
//!
//! [`Ast::expr`]: super::Ast::expr

use rust_decimal::Decimal;
use std::fmt;

/// Payload of a generic expression node. Operands live in the node's children.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Variable reference; no children
    Identifier(String),
    /// `true` / `false`; no children
    Boolean(bool),
    /// Numeric literal; no children
    Number(Decimal),
    /// `target.key`; children: `[target]`
    Dot { key: String },
    /// `target[key]`; children: `[target, key]`
    DynamicKey,
    /// `target(args..)`; children: `[target, args..]`
    MethodCall,
    /// `[a, b, ..]`; children: elements
    Sequence,
    /// `(inner)`; children: `[inner]`
    Parenthesized,
    /// `!operand`; children: `[operand]`
    Not,
    /// `lhs op rhs`; children: `[lhs, rhs]`
    Binary(BinaryOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    And,
    Or,
    /// `lhs!rhs` default-value operator
    Default,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Default => "!",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Equals | BinaryOp::NotEquals => 3,
            BinaryOp::LessThan | BinaryOp::GreaterThan => 4,
            BinaryOp::Add | BinaryOp::Subtract => 5,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 6,
            BinaryOp::Default => PREFIX + 1,
        }
    }
}

/// Precedence of prefix operators (`!x`, `-1`).
const PREFIX: u8 = 7;
/// Precedence of expressions that never need parentheses.
const ATOM: u8 = 9;

/// Owned expression tree, detached from the arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String),
    Boolean(bool),
    Number(Decimal),
    Str {
        value: String,
        raw: bool,
    },
    Dot {
        target: Box<Expr>,
        key: String,
    },
    DynamicKey {
        target: Box<Expr>,
        key: Box<Expr>,
    },
    MethodCall {
        target: Box<Expr>,
        args: Vec<Expr>,
    },
    BuiltIn {
        target: Box<Expr>,
        name: String,
    },
    Sequence(Vec<Expr>),
    Parenthesized(Box<Expr>),
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Placeholder for a subtree that is not an expression (malformed tree).
    Invalid,
}

impl Expr {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    /// Replaces every occurrence of the variable `name` with `replacement`.
    ///
    /// Only identifier references are replaced; dot keys and built-in names
    /// that happen to spell `name` are left alone.
    pub fn substitute(&self, name: &str, replacement: &Expr) -> Expr {
        let sub = |e: &Expr| Box::new(e.substitute(name, replacement));
        match self {
            Expr::Identifier(id) if id == name => replacement.clone(),
            Expr::Identifier(_)
            | Expr::Boolean(_)
            | Expr::Number(_)
            | Expr::Str { .. }
            | Expr::Invalid => self.clone(),
            Expr::Dot { target, key } => Expr::Dot {
                target: sub(target),
                key: key.clone(),
            },
            Expr::DynamicKey { target, key } => Expr::DynamicKey {
                target: sub(target),
                key: sub(key),
            },
            Expr::MethodCall { target, args } => Expr::MethodCall {
                target: sub(target),
                args: args
                    .iter()
                    .map(|a| a.substitute(name, replacement))
                    .collect(),
            },
            Expr::BuiltIn { target, name: builtin } => Expr::BuiltIn {
                target: sub(target),
                name: builtin.clone(),
            },
            Expr::Sequence(items) => Expr::Sequence(
                items
                    .iter()
                    .map(|i| i.substitute(name, replacement))
                    .collect(),
            ),
            Expr::Parenthesized(inner) => Expr::Parenthesized(sub(inner)),
            Expr::Not(inner) => Expr::Not(sub(inner)),
            Expr::Binary { op, lhs, rhs } => Expr::Binary {
                op: *op,
                lhs: sub(lhs),
                rhs: sub(rhs),
            },
        }
    }

    /// Whether the expression may appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expr::Identifier(_) | Expr::Dot { .. } | Expr::DynamicKey { .. }
        )
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Not(_) => PREFIX,
            Expr::Number(n) if n.is_sign_negative() => PREFIX,
            _ => ATOM,
        }
    }
}

/// `expr` rendered as an operand that must bind at least as tight as `min`.
struct Operand<'e>(&'e Expr, u8);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Operand(expr, min) = *self;
        if expr.precedence() < min {
            write!(f, "({expr})")
        } else {
            write!(f, "{expr}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Boolean(b) => write!(f, "{b}"),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Str { value, raw: true } => write!(f, "r\"{value}\""),
            Expr::Str { value, raw: false } => write!(
                f,
                "\"{}\"",
                value.replace('\\', "\\\\").replace('"', "\\\"")
            ),
            Expr::Dot { target, key } => write!(f, "{}.{key}", Operand(target, ATOM)),
            Expr::DynamicKey { target, key } => write!(f, "{}[{key}]", Operand(target, ATOM)),
            Expr::MethodCall { target, args } => {
                write!(f, "{}(", Operand(target, ATOM))?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::BuiltIn { target, name } => write!(f, "{}?{name}", Operand(target, ATOM)),
            Expr::Sequence(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Expr::Parenthesized(inner) => write!(f, "({inner})"),
            Expr::Not(inner) => write!(f, "!{}", Operand(inner, PREFIX)),
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::Default => write!(f, "{}!{}", Operand(lhs, ATOM), Operand(rhs, ATOM)),
                _ => {
                    let p = op.precedence();
                    write!(f, "{} {} {}", Operand(lhs, p), op.symbol(), Operand(rhs, p + 1))
                }
            },
            Expr::Invalid => write!(f, "<invalid>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(target: Expr) -> Expr {
        Expr::BuiltIn {
            target: Box::new(target),
            name: "html".to_string(),
        }
    }

    #[test]
    fn test_substitute_replaces_free_identifier() {
        let escape = html(Expr::identifier("x"));
        let value = Expr::Dot {
            target: Box::new(Expr::identifier("user")),
            key: "name".to_string(),
        };
        assert_eq!(escape.substitute("x", &value).to_string(), "user.name?html");
    }

    #[test]
    fn test_substitute_ignores_keys_and_builtin_names() {
        let expr = Expr::Dot {
            target: Box::new(html(Expr::identifier("html"))),
            key: "html".to_string(),
        };
        let rewritten = expr.substitute("html", &Expr::identifier("y"));
        assert_eq!(rewritten.to_string(), "y?html.html");
    }

    #[test]
    fn test_substitute_reaches_every_operand() {
        let expr = Expr::Binary {
            op: BinaryOp::Default,
            lhs: Box::new(Expr::identifier("x")),
            rhs: Box::new(Expr::MethodCall {
                target: Box::new(Expr::identifier("f")),
                args: vec![Expr::identifier("x"), Expr::Number(Decimal::from(2))],
            }),
        };
        let rewritten = expr.substitute("x", &Expr::identifier("v"));
        assert_eq!(rewritten.to_string(), "v!f(v, 2)");
    }

    #[test]
    fn test_assignability() {
        assert!(Expr::identifier("x").is_assignable());
        assert!(Expr::DynamicKey {
            target: Box::new(Expr::identifier("map")),
            key: Box::new(Expr::Str {
                value: "k".to_string(),
                raw: false,
            }),
        }
        .is_assignable());
        assert!(!html(Expr::identifier("x")).is_assignable());
        assert!(!Expr::Number(Decimal::ONE).is_assignable());
        assert!(!Expr::Parenthesized(Box::new(Expr::identifier("x"))).is_assignable());
    }

    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[test]
    fn test_escaping_a_binary_keeps_grouping() {
        let sum = binary(BinaryOp::Add, Expr::identifier("a"), Expr::identifier("b"));
        let escaped = html(Expr::identifier("x")).substitute("x", &sum);
        assert_eq!(escaped.to_string(), "(a + b)?html");

        let field = Expr::Dot {
            target: Box::new(sum.clone()),
            key: "k".to_string(),
        };
        assert_eq!(field.to_string(), "(a + b).k");
        assert_eq!(
            Expr::Not(Box::new(sum)).to_string(),
            "!(a + b)"
        );
        assert_eq!(html(Expr::Number(Decimal::from(-1))).to_string(), "(-1)?html");
    }

    #[test]
    fn test_binary_operands_by_precedence() {
        let a = || Expr::identifier("a");
        let b = || Expr::identifier("b");
        let c = || Expr::identifier("c");

        let sum_then_product = binary(BinaryOp::Multiply, binary(BinaryOp::Add, a(), b()), c());
        assert_eq!(sum_then_product.to_string(), "(a + b) * c");

        let product_then_sum = binary(BinaryOp::Add, binary(BinaryOp::Multiply, a(), b()), c());
        assert_eq!(product_then_sum.to_string(), "a * b + c");

        let right_nested = binary(BinaryOp::Subtract, a(), binary(BinaryOp::Subtract, b(), c()));
        assert_eq!(right_nested.to_string(), "a - (b - c)");

        let default_of_sum = binary(BinaryOp::Default, binary(BinaryOp::Add, a(), b()), c());
        assert_eq!(default_of_sum.to_string(), "(a + b)!c");
    }

    #[test]
    fn test_display_strings() {
        let cooked = Expr::Str {
            value: "say \"hi\"".to_string(),
            raw: false,
        };
        let raw = Expr::Str {
            value: "${not}".to_string(),
            raw: true,
        };
        assert_eq!(cooked.to_string(), "\"say \\\"hi\\\"\"");
        let path = Expr::Str {
            value: r"C:\dir".to_string(),
            raw: false,
        };
        assert_eq!(path.to_string(), r#""C:\\dir""#);
        assert_eq!(raw.to_string(), "r\"${not}\"");
        assert_eq!(
            Expr::Sequence(vec![Expr::Boolean(true), Expr::identifier("a")]).to_string(),
            "[true, a]"
        );
    }
}
