//! Escape rewriting.
//!
//! An escape block `<#escape x as x?html>` rewrites every interpolation in
//! its body: `${user.name}` becomes `${user.name?html}`. The rewrite is a
//! substitution of the interpolated expression for the block's variable in
//! the block's escape expression.
//!
//! Escape blocks nest. The analysis keeps a stack of the enclosing blocks; the
//! top one decides how an interpolation is escaped. A nested escape block has
//! its own escape expression rewritten by the block around it, so
//! `<#escape x as x?html><#escape y as y?upper_case>` escapes `${v}` as
//! `${v?upper_case?html}`.
//!
//! `<#noescape>` suspends the innermost block for its body only. Both
//! transitions are RAII guards over the pass, so the stack is restored on
//! every exit path out of a subtree walk.

use crate::pass::PostParsePass;
use std::ops::{Deref, DerefMut};
use stencil_ast::ast::NodeKind;
use stencil_ast::{DiagnosticKind, Expr, NodeId};
use tracing::trace;

/// Push/pop counters of an [`EscapeStack`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeStats {
    pub pushes: usize,
    pub pops: usize,
    pub max_depth: usize,
    /// Depth when the stats were taken; zero after a complete walk
    pub depth: usize,
}

/// Enclosing escape blocks, innermost last.
#[derive(Debug, Default)]
pub(crate) struct EscapeStack {
    blocks: Vec<NodeId>,
    pushes: usize,
    pops: usize,
    max_depth: usize,
}

impl EscapeStack {
    pub(crate) fn top(&self) -> Option<NodeId> {
        self.blocks.last().copied()
    }

    fn push(&mut self, block: NodeId) {
        self.blocks.push(block);
        self.pushes += 1;
        self.max_depth = self.max_depth.max(self.blocks.len());
        trace!(%block, depth = self.blocks.len(), "escape push");
    }

    fn pop(&mut self) -> Option<NodeId> {
        let block = self.blocks.pop()?;
        self.pops += 1;
        trace!(%block, depth = self.blocks.len(), "escape pop");
        Some(block)
    }

    pub(crate) fn stats(&self) -> EscapeStats {
        EscapeStats {
            pushes: self.pushes,
            pops: self.pops,
            max_depth: self.max_depth,
            depth: self.blocks.len(),
        }
    }
}

/// What a guard does to the stack when it goes out of scope.
enum Restore {
    /// Undo an [`PostParsePass::enter_escape`]
    Pop,
    /// Undo a [`PostParsePass::suspend_escape`]; `None` if nothing was
    /// suspended
    Resume(Option<NodeId>),
}

/// Pass handle with an escape stack transition in effect until drop.
pub(crate) struct EscapeScope<'p, 'a> {
    pass: &'p mut PostParsePass<'a>,
    restore: Restore,
}

impl<'a> Deref for EscapeScope<'_, 'a> {
    type Target = PostParsePass<'a>;

    fn deref(&self) -> &Self::Target {
        self.pass
    }
}

impl DerefMut for EscapeScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pass
    }
}

impl Drop for EscapeScope<'_, '_> {
    fn drop(&mut self) {
        match self.restore {
            Restore::Pop => {
                self.pass.escapes.pop();
            }
            Restore::Resume(Some(block)) => {
                trace!(%block, "escape resume");
                self.pass.escapes.push(block);
            }
            Restore::Resume(None) => {}
        }
    }
}

impl<'a> PostParsePass<'a> {
    /// Makes `block` the innermost escape until the guard drops.
    pub(crate) fn enter_escape(&mut self, block: NodeId) -> EscapeScope<'_, 'a> {
        self.escapes.push(block);
        EscapeScope {
            pass: self,
            restore: Restore::Pop,
        }
    }

    /// Suspends the innermost escape, if any, until the guard drops.
    pub(crate) fn suspend_escape(&mut self) -> EscapeScope<'_, 'a> {
        let suspended = self.escapes.pop();
        if let Some(block) = suspended {
            trace!(%block, "escape suspend");
        }
        EscapeScope {
            pass: self,
            restore: Restore::Resume(suspended),
        }
    }

    /// `expr` as the innermost enclosing escape block would output it.
    pub(crate) fn escaped_form(&self, expr: Expr) -> Expr {
        let Some(block) = self.escapes.top() else {
            return expr;
        };
        match self.template.ast().kind(block) {
            NodeKind::EscapeBlock {
                variable,
                escaped: Some(escaped),
            } => escaped.substitute(variable, &expr),
            // Blocks are annotated before they are pushed.
            _ => expr,
        }
    }

    /// Fills in an escape block's escaped form. Runs before the block is
    /// pushed, so the enclosing block applies.
    pub(crate) fn annotate_escape_block(&mut self, id: NodeId) {
        let raw = self.first_child_expr(id);
        let escaped = self.escaped_form(raw);
        if let NodeKind::EscapeBlock { escaped: slot, .. } =
            &mut self.template.ast_mut().node_mut(id).kind
        {
            *slot = Some(escaped);
        }
    }

    /// Fills in an interpolation's escaped form from the innermost escape.
    pub(crate) fn annotate_interpolation(&mut self, id: NodeId) {
        let raw = self.first_child_expr(id);
        let escaped = self.escaped_form(raw);
        if let NodeKind::Interpolation { escaped: slot } =
            &mut self.template.ast_mut().node_mut(id).kind
        {
            *slot = Some(escaped);
        }
    }

    pub(crate) fn check_no_escape(&mut self, id: NodeId) {
        let ast = self.template.ast();
        let inside = ast
            .first_ancestor(id, |kind| matches!(kind, NodeKind::EscapeBlock { .. }))
            .is_some();
        if !inside {
            self.problem(
                DiagnosticKind::MisplacedNoEscape,
                id,
                "The noescape directive only makes sense inside an escape block.",
            );
        }
    }

    fn first_child_expr(&self, id: NodeId) -> Expr {
        let ast = self.template.ast();
        ast.children(id)
            .first()
            .map(|&child| ast.expr(child))
            .unwrap_or(Expr::Invalid)
    }
}
