//! XML escaping.
//!
//! `<`, `>`, `&`, `"` and `'` become `&lt;`, `&gt;`, `&amp;`, `&quot;` and
//! `&apos;`. Everything else passes through unchanged.
//!
//! [`escape_xml`] escapes a whole string; [`XmlEscape`] wraps a writer and
//! escapes everything written through it, which is how a rendered block
//! body is escaped without buffering it first.
//!
//! # Examples
//!
//! ```
//! use std::fmt::Write;
//! use stencil_builtins::xml::{escape_xml, XmlEscape};
//!
//! assert_eq!(escape_xml("a < b && c"), "a &lt; b &amp;&amp; c");
//!
//! let mut out = XmlEscape::new(String::new());
//! write!(out, "<p class='{}'>", "x").unwrap();
//! assert_eq!(out.into_inner(), "&lt;p class=&apos;x&apos;&gt;");
//! ```

use std::borrow::Cow;
use std::fmt;

fn entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    }
}

/// Escapes `input`, borrowing it when nothing needs replacing.
pub fn escape_xml(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| entity(c).is_some()) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    // Writing into a String cannot fail.
    let _ = write_escaped(&mut out, input);
    Cow::Owned(out)
}

/// Writes `input` to `out`, copying unescaped runs in one piece.
fn write_escaped<W: fmt::Write + ?Sized>(out: &mut W, input: &str) -> fmt::Result {
    let mut last = 0;
    for (i, c) in input.char_indices() {
        if let Some(replacement) = entity(c) {
            out.write_str(&input[last..i])?;
            out.write_str(replacement)?;
            last = i + c.len_utf8();
        }
    }
    out.write_str(&input[last..])
}

/// Writer adapter that XML-escapes everything written through it.
#[derive(Debug, Default)]
pub struct XmlEscape<W> {
    inner: W,
}

impl<W: fmt::Write> XmlEscape<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: fmt::Write> fmt::Write for XmlEscape<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_escaped(&mut self.inner, s)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        match entity(c) {
            Some(replacement) => self.inner.write_str(replacement),
            None => self.inner.write_char(c),
        }
    }
}
