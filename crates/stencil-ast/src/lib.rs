// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for stencil templates
//!
//! This crate holds everything the post-parse analysis consumes and
//! annotates: the arena-allocated node tree, owned expression trees, source
//! spans, diagnostics, and the [`Template`] aggregate with its scope tables.

pub mod ast;
pub mod builder;
pub mod error;
pub mod foundation;
pub mod lexer;
pub mod template;

pub use ast::{AssignDirective, Ast, BinaryOp, BuiltInKind, Expr, ExprKind, MacroKind, NodeId, NodeKind, Visitor};
pub use builder::TemplateBuilder;
pub use error::{Diagnostic, DiagnosticFormatter, DiagnosticKind};
pub use foundation::{Span, TemplateSource};
pub use template::{Scope, Template};
