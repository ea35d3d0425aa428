//! Programmatic tree construction.
//!
//! Parsers and tests build templates bottom-up through [`TemplateBuilder`]:
//! every constructor allocates one node (plus the body [`NodeKind::Block`]
//! where the directive has one) and returns its id. Nodes are stamped with the
//! builder's current line, set with [`TemplateBuilder::at_line`].
//!
//! ```
//! # use stencil_ast::builder::TemplateBuilder;
//! let mut b = TemplateBuilder::new("page.stl");
//! let name = b.ident("name");
//! let greeting = b.interpolation(name);
//! let template = b.finish(vec![greeting]);
//! assert_eq!(template.ast().len(), 3);
//! ```

use crate::ast::{AssignDirective, Ast, BinaryOp, ExprKind, MacroKind, NodeId, NodeKind};
use crate::foundation::Span;
use crate::template::Template;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Bottom-up builder for a [`Template`].
#[derive(Debug)]
pub struct TemplateBuilder {
    name: String,
    ast: Ast,
    header: Option<NodeId>,
    line: u32,
    offset: u32,
}

impl TemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ast: Ast::new(),
            header: None,
            line: 1,
            offset: 0,
        }
    }

    /// Line recorded on nodes added from now on.
    pub fn at_line(&mut self, line: u32) -> &mut Self {
        self.line = line;
        self
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Adds a raw node. The other constructors are shorthands for this.
    pub fn node(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let span = Span::new(self.offset, self.offset + 1, self.line);
        self.offset += 1;
        self.ast.add(kind, span, children)
    }

    // === Expressions ===

    pub fn ident(&mut self, name: &str) -> NodeId {
        self.expression(ExprKind::Identifier(name.to_string()), vec![])
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.expression(ExprKind::Boolean(value), vec![])
    }

    pub fn number(&mut self, value: impl Into<Decimal>) -> NodeId {
        self.expression(ExprKind::Number(value.into()), vec![])
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.node(
            NodeKind::StringLiteral {
                value: value.to_string(),
                raw: false,
            },
            vec![],
        )
    }

    pub fn raw_string(&mut self, value: &str) -> NodeId {
        self.node(
            NodeKind::StringLiteral {
                value: value.to_string(),
                raw: true,
            },
            vec![],
        )
    }

    pub fn dot(&mut self, target: NodeId, key: &str) -> NodeId {
        self.expression(
            ExprKind::Dot {
                key: key.to_string(),
            },
            vec![target],
        )
    }

    pub fn dynamic_key(&mut self, target: NodeId, key: NodeId) -> NodeId {
        self.expression(ExprKind::DynamicKey, vec![target, key])
    }

    pub fn call(&mut self, target: NodeId, args: Vec<NodeId>) -> NodeId {
        let mut children = vec![target];
        children.extend(args);
        self.expression(ExprKind::MethodCall, children)
    }

    pub fn sequence(&mut self, items: Vec<NodeId>) -> NodeId {
        self.expression(ExprKind::Sequence, items)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.expression(ExprKind::Binary(op), vec![lhs, rhs])
    }

    pub fn builtin(&mut self, target: NodeId, name: &str) -> NodeId {
        self.node(
            NodeKind::BuiltIn {
                name: name.to_string(),
            },
            vec![target],
        )
    }

    fn expression(&mut self, kind: ExprKind, children: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Expression(kind), children)
    }

    // === Directives ===

    pub fn block(&mut self, children: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Block, children)
    }

    pub fn interpolation(&mut self, expr: NodeId) -> NodeId {
        self.node(NodeKind::Interpolation { escaped: None }, vec![expr])
    }

    /// `<#escape variable as expr>body</#escape>`
    pub fn escape(&mut self, variable: &str, expr: NodeId, body: Vec<NodeId>) -> NodeId {
        let body = self.block(body);
        self.node(
            NodeKind::EscapeBlock {
                variable: variable.to_string(),
                escaped: None,
            },
            vec![expr, body],
        )
    }

    pub fn noescape(&mut self, body: Vec<NodeId>) -> NodeId {
        let body = self.block(body);
        self.node(NodeKind::NoEscapeBlock, vec![body])
    }

    /// `<#list seq as index_var[, value_var]>`; returns the list node and its
    /// body block.
    pub fn list(
        &mut self,
        seq: NodeId,
        index_var: &str,
        value_var: Option<&str>,
        body: Vec<NodeId>,
    ) -> (NodeId, NodeId) {
        let body = self.block(body);
        let list = self.node(
            NodeKind::IteratorBlock {
                index_var: index_var.to_string(),
                value_var: value_var.map(str::to_string),
            },
            vec![seq, body],
        );
        (list, body)
    }

    pub fn break_(&mut self) -> NodeId {
        self.node(NodeKind::Break, vec![])
    }

    pub fn return_(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Return, value.into_iter().collect())
    }

    /// `<#macro>` or `<#function>`; returns the macro node and its body block.
    pub fn macro_def(&mut self, name: &str, kind: MacroKind, body: Vec<NodeId>) -> (NodeId, NodeId) {
        let body = self.block(body);
        let node = self.node(
            NodeKind::Macro {
                name: name.to_string(),
                kind,
            },
            vec![body],
        );
        (node, body)
    }

    /// `<#set a=x b=y>` with `(target, value)` pairs.
    pub fn assign(&mut self, directive: AssignDirective, pairs: Vec<(NodeId, NodeId)>) -> NodeId {
        let targets = pairs.iter().map(|&(target, _)| target).collect();
        let children = pairs
            .into_iter()
            .flat_map(|(target, value)| [target, value])
            .collect();
        self.node(NodeKind::Assignment { directive, targets }, children)
    }

    /// `<#set target>body</#set>`
    pub fn assign_block(&mut self, directive: AssignDirective, target: NodeId, body: Vec<NodeId>) -> NodeId {
        let body = self.block(body);
        self.node(NodeKind::BlockAssignment { directive, target }, vec![target, body])
    }

    /// `<#var a b=init>`; `inits` are the initializer expressions.
    pub fn var(&mut self, names: &[&str], inits: Vec<NodeId>) -> NodeId {
        self.node(
            NodeKind::VarDirective {
                names: names.iter().map(|n| n.to_string()).collect(),
            },
            inits,
        )
    }

    pub fn import(&mut self, path: &str, namespace: &str) -> NodeId {
        self.node(
            NodeKind::Import {
                path: path.to_string(),
                namespace: namespace.to_string(),
            },
            vec![],
        )
    }

    pub fn setting(&mut self, key: &str, value: NodeId) -> NodeId {
        self.node(
            NodeKind::PropertySetting {
                key: key.to_string(),
            },
            vec![value],
        )
    }

    /// Template header with `key=value` parameters in order. Replaces any
    /// header set before.
    pub fn header(&mut self, params: Vec<(&str, NodeId)>) -> NodeId {
        let children = params.iter().map(|&(_, value)| value).collect();
        let params: IndexMap<String, NodeId> = params
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        let header = self.node(NodeKind::Header { params }, children);
        self.header = Some(header);
        header
    }

    /// Wraps `children` in the root block and returns the template.
    pub fn finish(mut self, children: Vec<NodeId>) -> Template {
        let root = self.block(children);
        Template::new(self.name, self.ast, root, self.header)
    }
}
