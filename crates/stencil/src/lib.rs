//! # Stencil
//!
//! Semantic analysis for stencil templates.
//!
//! This crate is a facade that re-exports functionality from:
//! - `stencil-ast` - spans, diagnostics, the template tree and its builder
//! - `stencil-analysis` - the post-parse pass (scopes, escapes, structural checks)
//! - `stencil-builtins` - render-time evaluation of numeric, sequence and XML built-ins
//!
//! ## Architecture
//!
//! ```text
//! stencil-ast        - AST, Template, Visitor, Diagnostic
//!     ↓
//! stencil-analysis   - analyze()
//!     ↓                      stencil-builtins - Value, Environment, evaluate_builtin()
//! stencil (facade)   - re-exports + check API
//! ```
//!
//! ## Usage
//!
//! ```
//! use stencil::{check, AnalysisOptions, TemplateBuilder};
//!
//! let mut b = TemplateBuilder::new("page.stl");
//! let name = b.ident("name");
//! let greeting = b.interpolation(name);
//! let mut template = b.finish(vec![greeting]);
//!
//! let report = check(&mut template, &AnalysisOptions::default()).unwrap();
//! assert!(report.is_clean());
//! ```

// Re-export AST and foundation types
pub use stencil_ast::{self as ast, *};

// Re-export analysis
pub use stencil_analysis as analysis;
pub use stencil_analysis::{analyze, AnalysisOptions, AnalysisReport, EscapeStats};

// Re-export built-in evaluation
pub use stencil_builtins as builtins;
pub use stencil_builtins::{evaluate_builtin, Environment, EvalError, Evaluated, Value};

pub mod check;
pub mod logging;

pub use check::{check, check_all, format_diagnostics};
pub use logging::init_logging;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
