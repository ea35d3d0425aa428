//! Syntax check for interpolations embedded in string literals.
//!
//! A non-raw string literal such as `"Hello ${user.name}!"` is parsed lazily:
//! the parser stores the literal text and the embedded `${...}` / `#{...}`
//! sections are only checked here. Each section is tokenized with
//! [`Token`] and recognized against the expression grammar without building
//! a tree:
//!
//! ```text
//! expression := unary (binary-op unary)*
//! unary      := ("!" | "-" | "+")* postfix
//! postfix    := primary ("." name | "?" name | "??" | "[" expression "]"
//!                        | "(" arguments ")" | "!" primary?)*
//! primary    := name | number | string | "true" | "false"
//!             | "(" expression ")" | "[" list "]" | "{" hash "}"
//! ```
//!
//! `#{...}` may end with a `; format` suffix. The right operand of a range
//! operator is optional.

use crate::lexer::Token;
use logos::{Lexer, Logos};
use thiserror::Error;

/// Problem in an embedded interpolation. Offsets are byte offsets into the
/// literal's text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpolationError {
    #[error("Unterminated interpolation starting at offset {offset}")]
    Unterminated { offset: usize },

    #[error("Empty interpolation at offset {offset}")]
    Empty { offset: usize },

    #[error("Expected '{expected}' but found '{found}' at offset {offset}")]
    MismatchedDelimiter {
        offset: usize,
        expected: char,
        found: char,
    },

    #[error("Unexpected '{found}' at offset {offset}")]
    UnexpectedDelimiter { offset: usize, found: char },

    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Unexpected character '{found}' at offset {offset}")]
    InvalidCharacter { offset: usize, found: char },

    #[error("Expected an expression but found '{found}' at offset {offset}")]
    ExpectedExpression { offset: usize, found: String },

    #[error("Expected a name after '{after}' but found '{found}' at offset {offset}")]
    ExpectedName {
        offset: usize,
        after: &'static str,
        found: String,
    },

    #[error("Unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { offset: usize, found: String },
}

type Result<T> = std::result::Result<T, InterpolationError>;

/// Checks every `${...}` and `#{...}` section of `text`.
///
/// A backslash escapes the next character, so `\${x}` is plain text.
pub fn check_interpolation(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' | b'#' if bytes.get(i + 1) == Some(&b'{') => {
                i = Embedded::new(text, i).check()?;
            }
            _ => i += 1,
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Lexeme {
    token: Token,
    start: usize,
    end: usize,
}

/// Recognizer for one embedded section. Lexes on demand, so the template
/// text after the closing brace is never tokenized.
struct Embedded<'s> {
    text: &'s str,
    /// Offset of the `$` or `#`
    start: usize,
    numeric: bool,
    lexer: Lexer<'s, Token>,
    base: usize,
    peeked: Option<Option<Lexeme>>,
}

impl<'s> Embedded<'s> {
    fn new(text: &'s str, start: usize) -> Self {
        let base = start + 2;
        Self {
            text,
            start,
            numeric: text.as_bytes()[start] == b'#',
            lexer: Token::lexer(&text[base..]),
            base,
            peeked: None,
        }
    }

    /// Recognizes the section and returns the offset just past its `}`.
    fn check(mut self) -> Result<usize> {
        match self.peek()? {
            Some(Lexeme {
                token: Token::RBrace, ..
            }) => return Err(InterpolationError::Empty { offset: self.start }),
            None => return Err(self.unterminated()),
            Some(_) => {}
        }

        self.expression()?;

        if self.numeric && self.peek_token()? == Some(Token::Semicolon) {
            self.bump();
            loop {
                match self.next()? {
                    Some(Lexeme {
                        token: Token::RBrace,
                        end,
                        ..
                    }) => return Ok(end),
                    Some(_) => {}
                    None => return Err(self.unterminated()),
                }
            }
        }

        match self.next()? {
            Some(Lexeme {
                token: Token::RBrace,
                end,
                ..
            }) => Ok(end),
            Some(lexeme) => Err(match lexeme.token.closer() {
                Some(found) => InterpolationError::UnexpectedDelimiter {
                    offset: lexeme.start,
                    found,
                },
                None => self.unexpected(lexeme),
            }),
            None => Err(self.unterminated()),
        }
    }

    fn expression(&mut self) -> Result<()> {
        self.unary()?;
        while let Some(token) = self.peek_token()? {
            if !token.is_binary_operator() {
                break;
            }
            self.bump();
            let open_range = token.is_range() && !self.peek_token()?.is_some_and(Token::starts_operand);
            if !open_range {
                self.unary()?;
            }
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<()> {
        while matches!(
            self.peek_token()?,
            Some(Token::Bang | Token::Minus | Token::Plus)
        ) {
            self.bump();
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<()> {
        self.primary()?;
        while let Some(token) = self.peek_token()? {
            match token {
                Token::Dot => {
                    self.bump();
                    self.name(".")?;
                }
                Token::Question => {
                    self.bump();
                    self.name("?")?;
                }
                Token::QuestionQuestion => self.bump(),
                Token::LBracket => {
                    self.bump();
                    self.expression()?;
                    self.close(Token::RBracket, ']')?;
                }
                Token::LParen => {
                    self.bump();
                    self.list(Token::RParen, ')', |p| p.expression())?;
                }
                Token::Bang => {
                    self.bump();
                    if self.peek_token()?.is_some_and(Token::starts_primary) {
                        self.primary()?;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn primary(&mut self) -> Result<()> {
        let Some(lexeme) = self.next()? else {
            return Err(self.unterminated());
        };
        match lexeme.token {
            Token::Ident
            | Token::Integer
            | Token::Decimal
            | Token::String
            | Token::RawString
            | Token::True
            | Token::False => Ok(()),
            Token::LParen => {
                self.expression()?;
                self.close(Token::RParen, ')')
            }
            Token::LBracket => self.list(Token::RBracket, ']', |p| p.expression()),
            Token::LBrace => self.list(Token::RBrace, '}', |p| {
                p.expression()?;
                p.close(Token::Colon, ':')?;
                p.expression()
            }),
            _ => Err(InterpolationError::ExpectedExpression {
                offset: lexeme.start,
                found: self.slice(lexeme).to_string(),
            }),
        }
    }

    /// Comma-separated `item`s up to `closer`; the opener is already
    /// consumed.
    fn list(&mut self, closer: Token, closer_char: char, item: fn(&mut Self) -> Result<()>) -> Result<()> {
        if self.peek_token()? == Some(closer) {
            self.bump();
            return Ok(());
        }
        loop {
            item(self)?;
            if self.peek_token()? == Some(Token::Comma) {
                self.bump();
                continue;
            }
            return self.close(closer, closer_char);
        }
    }

    fn name(&mut self, after: &'static str) -> Result<()> {
        match self.next()? {
            Some(Lexeme {
                token: Token::Ident, ..
            }) => Ok(()),
            Some(lexeme) => Err(InterpolationError::ExpectedName {
                offset: lexeme.start,
                after,
                found: self.slice(lexeme).to_string(),
            }),
            None => Err(self.unterminated()),
        }
    }

    fn close(&mut self, expected: Token, expected_char: char) -> Result<()> {
        match self.next()? {
            Some(lexeme) if lexeme.token == expected => Ok(()),
            Some(lexeme) => Err(match lexeme.token.closer() {
                Some(found) => InterpolationError::MismatchedDelimiter {
                    offset: lexeme.start,
                    expected: expected_char,
                    found,
                },
                None => self.unexpected(lexeme),
            }),
            None => Err(self.unterminated()),
        }
    }

    // === Token stream ===

    fn peek(&mut self) -> Result<Option<Lexeme>> {
        if let Some(peeked) = self.peeked {
            return Ok(peeked);
        }
        let lexeme = match self.lexer.next() {
            None => None,
            Some(Ok(token)) => {
                let span = self.lexer.span();
                Some(Lexeme {
                    token,
                    start: self.base + span.start,
                    end: self.base + span.end,
                })
            }
            Some(Err(_)) => return Err(self.lex_error(self.base + self.lexer.span().start)),
        };
        self.peeked = Some(lexeme);
        Ok(lexeme)
    }

    fn peek_token(&mut self) -> Result<Option<Token>> {
        Ok(self.peek()?.map(|lexeme| lexeme.token))
    }

    fn bump(&mut self) {
        self.peeked = None;
    }

    fn next(&mut self) -> Result<Option<Lexeme>> {
        let lexeme = self.peek()?;
        self.bump();
        Ok(lexeme)
    }

    // === Errors ===

    fn slice(&self, lexeme: Lexeme) -> &'s str {
        &self.text[lexeme.start..lexeme.end]
    }

    fn unterminated(&self) -> InterpolationError {
        InterpolationError::Unterminated { offset: self.start }
    }

    fn unexpected(&self, lexeme: Lexeme) -> InterpolationError {
        InterpolationError::UnexpectedToken {
            offset: lexeme.start,
            found: self.slice(lexeme).to_string(),
        }
    }

    fn lex_error(&self, offset: usize) -> InterpolationError {
        match self.text[offset..].chars().next() {
            Some('"' | '\'') => InterpolationError::UnterminatedString { offset },
            Some(found) => InterpolationError::InvalidCharacter { offset, found },
            None => self.unterminated(),
        }
    }
}
