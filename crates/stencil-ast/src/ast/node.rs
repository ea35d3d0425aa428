//! Node kinds.
//!
//! [`NodeKind`] is the closed set of constructs a parsed template can contain.
//! Each variant documents the layout of its children; payload fields that
//! refer to children hold their [`NodeId`]s.

use super::{Expr, ExprKind, NodeId};
use indexmap::IndexMap;

/// Whether a macro is callable as a value-producing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroKind {
    /// `<#macro>`: output-producing, returns nothing
    Procedure,
    /// `<#function>`: must return a value
    Function,
}

/// Spelling of an assignment directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignDirective {
    /// `<#set>`: assigns to an already declared variable
    Set,
    /// `<#assign>`: deprecated global assignment
    Assign,
    /// `<#local>`: deprecated macro-local assignment
    Local,
}

impl AssignDirective {
    pub fn keyword(self) -> &'static str {
        match self {
            AssignDirective::Set => "set",
            AssignDirective::Assign => "assign",
            AssignDirective::Local => "local",
        }
    }
}

/// Payload of an AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Template header. Children: parameter value expressions, referenced by
    /// `params` in source order.
    Header { params: IndexMap<String, NodeId> },

    /// `<#macro>` / `<#function>`. Children: `[body]`.
    Macro { name: String, kind: MacroKind },

    /// Sequence of statements with its own variable scope.
    Block,

    /// `${expr}`. Children: `[expr]`. `escaped` is filled in by analysis.
    Interpolation { escaped: Option<Expr> },

    /// `<#escape variable as expr>`. Children: `[expr, body]`.
    EscapeBlock {
        variable: String,
        escaped: Option<Expr>,
    },

    /// `<#noescape>`. Children: `[body]`.
    NoEscapeBlock,

    /// `<#list seq as index_var[, value_var]>`. Children: `[seq, body]`.
    IteratorBlock {
        index_var: String,
        value_var: Option<String>,
    },

    /// `<#break>`. No children.
    Break,

    /// `<#return [value]>`. Children: `[value]` or none.
    Return,

    /// `<#set a = x b = y>`. Children: alternating target/value expressions;
    /// `targets` lists the target children.
    Assignment {
        directive: AssignDirective,
        targets: Vec<NodeId>,
    },

    /// `<#set target>body</#set>`. Children: `[target, body]`.
    BlockAssignment {
        directive: AssignDirective,
        target: NodeId,
    },

    /// `<#var a b=1>`. Children: initializer expressions, if any.
    VarDirective { names: Vec<String> },

    /// `<#import "path" as namespace>`. No children.
    Import { path: String, namespace: String },

    /// `<#setting key = value>`. Children: `[value]`.
    PropertySetting { key: String },

    /// String literal. Raw literals (`r"..."`) never interpolate.
    StringLiteral { value: String, raw: bool },

    /// `target?name`. Children: `[target]`.
    BuiltIn { name: String },

    /// Any other expression; see [`ExprKind`] for child layout.
    Expression(ExprKind),
}

impl NodeKind {
    /// Short description used in diagnostics ("Macro m is within a ...").
    pub fn description(&self) -> String {
        match self {
            NodeKind::Header { .. } => "template header".to_string(),
            NodeKind::Macro {
                name,
                kind: MacroKind::Procedure,
            } => format!("macro {name}"),
            NodeKind::Macro {
                name,
                kind: MacroKind::Function,
            } => format!("function {name}"),
            NodeKind::Block => "block".to_string(),
            NodeKind::Interpolation { .. } => "interpolation".to_string(),
            NodeKind::EscapeBlock { .. } => "escape block".to_string(),
            NodeKind::NoEscapeBlock => "noescape block".to_string(),
            NodeKind::IteratorBlock { .. } => "list block".to_string(),
            NodeKind::Break => "break directive".to_string(),
            NodeKind::Return => "return directive".to_string(),
            NodeKind::Assignment { directive, .. } => {
                format!("{} directive", directive.keyword())
            }
            NodeKind::BlockAssignment { directive, .. } => {
                format!("{} block", directive.keyword())
            }
            NodeKind::VarDirective { .. } => "var directive".to_string(),
            NodeKind::Import { .. } => "import directive".to_string(),
            NodeKind::PropertySetting { .. } => "setting directive".to_string(),
            NodeKind::StringLiteral { .. } => "string literal".to_string(),
            NodeKind::BuiltIn { name } => format!("?{name} built-in"),
            NodeKind::Expression(_) => "expression".to_string(),
        }
    }

    /// Whether this node is an expression rather than a directive.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::StringLiteral { .. } | NodeKind::BuiltIn { .. } | NodeKind::Expression(_)
        )
    }

    /// Whether a macro may sit inside this node in strict-variable mode.
    pub fn admits_macros(&self) -> bool {
        matches!(
            self,
            NodeKind::Block | NodeKind::EscapeBlock { .. } | NodeKind::NoEscapeBlock
        )
    }
}
