//! Foundation types shared by every stage of the template front end.

pub mod span;

pub use span::{Span, TemplateSource};
