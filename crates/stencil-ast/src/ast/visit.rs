//! Generic tree visitor.
//!
//! [`Visitor`] has one hook per node kind. Every hook defaults to visiting the
//! node's children in order, so a pass overrides only the kinds it cares about
//! and calls [`walk_children`] itself wherever it wants descent to happen:
//! before its own checks, after them, or not at all.
//!
//! Dispatch is an exhaustive `match` over [`NodeKind`] in [`walk_node`];
//! adding a node kind fails to compile until it is routed to a hook.
//!
//! Visitors address nodes by [`NodeId`] and reach the tree through
//! [`Visitor::ast`], so a pass can hold the tree mutably and still annotate
//! nodes between visits. Nodes are never added or removed during a walk.
//!
//! # Examples
//!
//! ```
//! # use stencil_ast::ast::*;
//! # use stencil_ast::foundation::Span;
//! struct CountBreaks<'a> {
//!     ast: &'a Ast,
//!     breaks: usize,
//! }
//!
//! impl Visitor for CountBreaks<'_> {
//!     fn ast(&self) -> &Ast {
//!         self.ast
//!     }
//!
//!     fn visit_break(&mut self, _id: NodeId) {
//!         self.breaks += 1;
//!     }
//! }
//!
//! let mut ast = Ast::new();
//! let brk = ast.add(NodeKind::Break, Span::empty(), vec![]);
//! let root = ast.add(NodeKind::Block, Span::empty(), vec![brk]);
//!
//! let mut counter = CountBreaks { ast: &ast, breaks: 0 };
//! counter.visit(root);
//! assert_eq!(counter.breaks, 1);
//! ```

use super::{Ast, NodeId, NodeKind};

/// Per-node-kind traversal hooks with recurse-into-children defaults.
pub trait Visitor {
    /// The tree being walked.
    fn ast(&self) -> &Ast;

    /// Entry point: dispatches `id` to the hook for its kind.
    fn visit(&mut self, id: NodeId) {
        walk_node(self, id);
    }

    fn visit_header(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_macro(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_block(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_interpolation(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_escape_block(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_no_escape_block(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_iterator_block(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_break(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_return(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_assignment(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_block_assignment(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_var_directive(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_import(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_property_setting(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_string_literal(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_builtin(&mut self, id: NodeId) {
        walk_children(self, id);
    }

    fn visit_expression(&mut self, id: NodeId) {
        walk_children(self, id);
    }
}

/// Routes `id` to the visitor hook matching its kind.
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, id: NodeId) {
    match visitor.ast().kind(id) {
        NodeKind::Header { .. } => visitor.visit_header(id),
        NodeKind::Macro { .. } => visitor.visit_macro(id),
        NodeKind::Block => visitor.visit_block(id),
        NodeKind::Interpolation { .. } => visitor.visit_interpolation(id),
        NodeKind::EscapeBlock { .. } => visitor.visit_escape_block(id),
        NodeKind::NoEscapeBlock => visitor.visit_no_escape_block(id),
        NodeKind::IteratorBlock { .. } => visitor.visit_iterator_block(id),
        NodeKind::Break => visitor.visit_break(id),
        NodeKind::Return => visitor.visit_return(id),
        NodeKind::Assignment { .. } => visitor.visit_assignment(id),
        NodeKind::BlockAssignment { .. } => visitor.visit_block_assignment(id),
        NodeKind::VarDirective { .. } => visitor.visit_var_directive(id),
        NodeKind::Import { .. } => visitor.visit_import(id),
        NodeKind::PropertySetting { .. } => visitor.visit_property_setting(id),
        NodeKind::StringLiteral { .. } => visitor.visit_string_literal(id),
        NodeKind::BuiltIn { .. } => visitor.visit_builtin(id),
        NodeKind::Expression(_) => visitor.visit_expression(id),
    }
}

/// Visits every child of `id` in order.
pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, id: NodeId) {
    // Indexed loop: the visitor may mutate node payloads between children,
    // but never the child lists themselves.
    let count = visitor.ast().children(id).len();
    for i in 0..count {
        let child = visitor.ast().children(id)[i];
        visitor.visit(child);
    }
}
