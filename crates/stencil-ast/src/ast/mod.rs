//! Arena-allocated template AST.
//!
//! Nodes live in a single `Vec` owned by [`Ast`] and refer to each other by
//! [`NodeId`]. Every node records its parent, so the upward walks that the
//! structural rules need are plain index lookups.
//!
//! # Invariants
//!
//! - A node has at most one parent, assigned when the parent is added.
//! - Children are added before their parent (bottom-up construction), so a
//!   node's id is always smaller than its parent's.
//! - Analysis never adds or removes nodes; it only mutates payload fields
//!   such as the `escaped` field of [`NodeKind::Interpolation`].
//!
//! # Examples
//!
//! ```
//! # use stencil_ast::ast::*;
//! # use stencil_ast::foundation::Span;
//! let mut ast = Ast::new();
//! let x = ast.add(NodeKind::Expression(ExprKind::Identifier("x".into())), Span::empty(), vec![]);
//! let interp = ast.add(NodeKind::Interpolation { escaped: None }, Span::empty(), vec![x]);
//! let root = ast.add(NodeKind::Block, Span::empty(), vec![interp]);
//!
//! assert_eq!(ast.parent(x), Some(interp));
//! assert_eq!(ast.ancestors(x).collect::<Vec<_>>(), vec![interp, root]);
//! ```

pub mod builtin;
pub mod expr;
pub mod header;
pub mod interpolation;
pub mod node;
pub mod visit;

pub use builtin::BuiltInKind;
pub use expr::{BinaryOp, Expr, ExprKind};
pub use header::HeaderParamError;
pub use interpolation::{check_interpolation, InterpolationError};
pub use node::{AssignDirective, MacroKind, NodeKind};
pub use visit::{walk_children, walk_node, Visitor};

use crate::foundation::Span;
use std::fmt;

/// Index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Owner of every node of one template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node and links `children` to it.
    ///
    /// # Panics
    ///
    /// Panics if a child already has a parent or does not belong to this arena.
    pub fn add(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for &child in &children {
            let node = &mut self.nodes[child.index()];
            assert!(
                node.parent.is_none(),
                "node {child} already has parent {:?}",
                node.parent
            );
            node.parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            children,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: self.parent(id),
        }
    }

    /// Nearest strict ancestor matching `pred`.
    pub fn first_ancestor(
        &self,
        id: NodeId,
        pred: impl Fn(&NodeKind) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id).find(|&a| pred(self.kind(a)))
    }

    /// `id` itself if it matches `pred`, else its nearest matching ancestor.
    pub fn ancestor_or_self(
        &self,
        id: NodeId,
        pred: impl Fn(&NodeKind) -> bool,
    ) -> Option<NodeId> {
        if pred(self.kind(id)) {
            Some(id)
        } else {
            self.first_ancestor(id, pred)
        }
    }

    /// First child that is a [`NodeKind::Block`]: the body of a directive.
    pub fn nested_block(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| matches!(self.kind(c), NodeKind::Block))
    }

    /// Materializes the expression rooted at `id` into an owned tree.
    ///
    /// Directive nodes and missing operands become [`Expr::Invalid`], so a
    /// malformed tree still yields a printable expression.
    pub fn expr(&self, id: NodeId) -> Expr {
        let children = self.children(id);
        let operand = |i: usize| {
            Box::new(
                children
                    .get(i)
                    .map(|&c| self.expr(c))
                    .unwrap_or(Expr::Invalid),
            )
        };
        match self.kind(id) {
            NodeKind::StringLiteral { value, raw } => Expr::Str {
                value: value.clone(),
                raw: *raw,
            },
            NodeKind::BuiltIn { name } => Expr::BuiltIn {
                target: operand(0),
                name: name.clone(),
            },
            NodeKind::Expression(kind) => match kind {
                ExprKind::Identifier(name) => Expr::Identifier(name.clone()),
                ExprKind::Boolean(b) => Expr::Boolean(*b),
                ExprKind::Number(n) => Expr::Number(*n),
                ExprKind::Dot { key } => Expr::Dot {
                    target: operand(0),
                    key: key.clone(),
                },
                ExprKind::DynamicKey => Expr::DynamicKey {
                    target: operand(0),
                    key: operand(1),
                },
                ExprKind::MethodCall => Expr::MethodCall {
                    target: operand(0),
                    args: children.iter().skip(1).map(|&c| self.expr(c)).collect(),
                },
                ExprKind::Sequence => {
                    Expr::Sequence(children.iter().map(|&c| self.expr(c)).collect())
                }
                ExprKind::Parenthesized => Expr::Parenthesized(operand(0)),
                ExprKind::Not => Expr::Not(operand(0)),
                ExprKind::Binary(op) => Expr::Binary {
                    op: *op,
                    lhs: operand(0),
                    rhs: operand(1),
                },
            },
            _ => Expr::Invalid,
        }
    }

    /// L-value capability check for the expression rooted at `id`.
    pub fn is_assignable(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Expression(
                ExprKind::Identifier(_) | ExprKind::Dot { .. } | ExprKind::DynamicKey
            )
        )
    }
}

/// Iterator over the strict ancestors of a node.
pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.ast.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn ident(ast: &mut Ast, name: &str) -> NodeId {
        ast.add(
            NodeKind::Expression(ExprKind::Identifier(name.to_string())),
            Span::empty(),
            vec![],
        )
    }

    #[test]
    fn test_add_links_parents() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        let b = ident(&mut ast, "b");
        let block = ast.add(NodeKind::Block, Span::empty(), vec![a, b]);

        assert_eq!(ast.len(), 3);
        assert_eq!(ast.children(block), &[a, b]);
        assert_eq!(ast.parent(a), Some(block));
        assert_eq!(ast.parent(block), None);
    }

    #[test]
    #[should_panic(expected = "already has parent")]
    fn test_add_rejects_second_parent() {
        let mut ast = Ast::new();
        let a = ident(&mut ast, "a");
        ast.add(NodeKind::Block, Span::empty(), vec![a]);
        ast.add(NodeKind::Block, Span::empty(), vec![a]);
    }

    #[test]
    fn test_ancestor_queries() {
        let mut ast = Ast::new();
        let brk = ast.add(NodeKind::Break, Span::empty(), vec![]);
        let body = ast.add(NodeKind::Block, Span::empty(), vec![brk]);
        let seq = ident(&mut ast, "xs");
        let list = ast.add(
            NodeKind::IteratorBlock {
                index_var: "x".to_string(),
                value_var: None,
            },
            Span::empty(),
            vec![seq, body],
        );
        let root = ast.add(NodeKind::Block, Span::empty(), vec![list]);

        assert_eq!(ast.ancestors(brk).collect::<Vec<_>>(), vec![body, list, root]);
        let is_list = |k: &NodeKind| matches!(k, NodeKind::IteratorBlock { .. });
        assert_eq!(ast.first_ancestor(brk, is_list), Some(list));
        assert_eq!(ast.first_ancestor(list, is_list), None);
        assert_eq!(ast.ancestor_or_self(list, is_list), Some(list));
        assert_eq!(ast.nested_block(list), Some(body));
        assert_eq!(ast.nested_block(brk), None);
    }

    #[test]
    fn test_expr_materialization() {
        let mut ast = Ast::new();
        let user = ident(&mut ast, "user");
        let dot = ast.add(
            NodeKind::Expression(ExprKind::Dot {
                key: "name".to_string(),
            }),
            Span::empty(),
            vec![user],
        );
        let upper = ast.add(
            NodeKind::BuiltIn {
                name: "upper_case".to_string(),
            },
            Span::empty(),
            vec![dot],
        );
        let fallback = ast.add(
            NodeKind::StringLiteral {
                value: "anon".to_string(),
                raw: false,
            },
            Span::empty(),
            vec![],
        );
        let default = ast.add(
            NodeKind::Expression(ExprKind::Binary(BinaryOp::Default)),
            Span::empty(),
            vec![upper, fallback],
        );

        assert_eq!(ast.expr(default).to_string(), "user.name?upper_case!\"anon\"");
        assert!(ast.is_assignable(dot));
        assert!(!ast.is_assignable(upper));
    }

    #[test]
    fn test_expr_of_malformed_tree_is_invalid() {
        let mut ast = Ast::new();
        let call = ast.add(
            NodeKind::Expression(ExprKind::Binary(BinaryOp::Add)),
            Span::empty(),
            vec![],
        );
        let number = ast.add(
            NodeKind::Expression(ExprKind::Number(Decimal::new(15, 1))),
            Span::empty(),
            vec![],
        );
        let brk = ast.add(NodeKind::Break, Span::empty(), vec![]);

        assert_eq!(ast.expr(call).to_string(), "<invalid> + <invalid>");
        assert_eq!(ast.expr(number).to_string(), "1.5");
        assert_eq!(ast.expr(brk), Expr::Invalid);
    }
}
