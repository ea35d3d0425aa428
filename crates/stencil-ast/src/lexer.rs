//! Lexical analysis of template expressions.
//!
//! Only the expression language is tokenized here: the text inside `${...}`,
//! `#{...}` and directive arguments. Template text around it is never fed to
//! the lexer.
//!
//! # Examples
//!
//! ```
//! # use stencil_ast::lexer::Token;
//! # use logos::Logos;
//! let tokens: Vec<_> = Token::lexer("user.name?html").collect();
//! assert_eq!(tokens.len(), 5);
//! ```

use logos::Logos;

/// Expression token. Payload-free: callers that need the text slice the
/// source with the token's span.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // === Keywords ===
    #[token("true")]
    True,
    #[token("false")]
    False,
    /// `gt`, the markup-safe spelling of `>`
    #[token("gt")]
    GtWord,
    /// `gte`
    #[token("gte")]
    GtEqWord,
    /// `lt`
    #[token("lt")]
    LtWord,
    /// `lte`
    #[token("lte")]
    LtEqWord,

    // === Operators ===

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Comparison
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Logic
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    /// Prefix negation, or the postfix default-value operator
    #[token("!")]
    Bang,

    // Postfix
    /// Built-in call
    #[token("?")]
    Question,
    /// Existence test
    #[token("??")]
    QuestionQuestion,
    #[token(".")]
    Dot,

    // Range
    #[token("..")]
    DotDot,
    #[token("..<")]
    DotDotLt,
    #[token("..!")]
    DotDotBang,
    #[token("..*")]
    DotDotStar,

    // Other
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    /// Format separator in `#{...}`
    #[token(";")]
    Semicolon,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // === Literals ===
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal,
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    String,
    /// `r"..."`: no escapes, no interpolation
    #[regex(r#"r"[^"]*""#)]
    #[regex(r"r'[^']*'")]
    RawString,
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

impl Token {
    /// Whether the token is an infix operator.
    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Star
                | Token::Slash
                | Token::Percent
                | Token::EqEq
                | Token::Eq
                | Token::BangEq
                | Token::Lt
                | Token::LtEq
                | Token::Gt
                | Token::GtEq
                | Token::GtWord
                | Token::GtEqWord
                | Token::LtWord
                | Token::LtEqWord
                | Token::AndAnd
                | Token::OrOr
        ) || self.is_range()
    }

    pub fn is_range(self) -> bool {
        matches!(
            self,
            Token::DotDot | Token::DotDotLt | Token::DotDotBang | Token::DotDotStar
        )
    }

    /// Whether the token can begin a primary expression (no prefix operator).
    pub fn starts_primary(self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::Integer
                | Token::Decimal
                | Token::String
                | Token::RawString
                | Token::True
                | Token::False
                | Token::LParen
                | Token::LBracket
                | Token::LBrace
        )
    }

    /// Whether the token can begin an expression.
    pub fn starts_operand(self) -> bool {
        self.starts_primary() || matches!(self, Token::Bang | Token::Minus | Token::Plus)
    }

    /// The character of a closing delimiter.
    pub fn closer(self) -> Option<char> {
        match self {
            Token::RParen => Some(')'),
            Token::RBracket => Some(']'),
            Token::RBrace => Some('}'),
            _ => None,
        }
    }
}
