// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Post-parse analysis for stencil templates
//!
//! One depth-first pass over a parsed [`Template`] that:
//!
//! - reads the header and fixes strict-variable mode for the template
//! - declares names into template and block scopes and registers macros
//! - rewrites interpolations for their enclosing escape blocks
//! - reports structural problems (misplaced directives, bad assignment
//!   targets, unknown built-ins and settings, broken string interpolations)
//!
//! Problems never abort the pass. They accumulate on the template, so a
//! single run reports all of them.
//!
//! # Examples
//!
//! ```
//! use stencil_analysis::{analyze, AnalysisOptions};
//! use stencil_ast::TemplateBuilder;
//!
//! let mut b = TemplateBuilder::new("page.stl");
//! let brk = b.break_();
//! let mut template = b.finish(vec![brk]);
//!
//! let report = analyze(&mut template, &AnalysisOptions::default());
//! assert_eq!(report.problems, 1);
//! assert_eq!(
//!     template.diagnostics()[0].message,
//!     "The break directive can only be used within a loop."
//! );
//! ```
//!
//! [`Template`]: stencil_ast::Template

mod escapes;
mod header;
pub mod options;
pub mod pass;
pub mod scope;
mod validation;

pub use escapes::EscapeStats;
pub use options::{AnalysisOptions, SETTING_KEYS};
pub use pass::{analyze, AnalysisReport, PostParsePass};
pub use scope::loop_variable_names;
