//! Structural checks.
//!
//! These hooks only report; none of them declares names or changes the tree.
//! Each runs either before or after its node's children are walked, matching
//! the order diagnostics are expected in:
//!
//! - **After**: assignments, block assignments, break, return, built-ins
//! - **Before**: settings, string literals
//!
//! Checks that depend on strict-variable mode read the pass's snapshot of the
//! flag, which is fixed once the header has been processed.

mod assignments;
mod control;
mod expressions;
