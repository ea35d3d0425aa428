//! The template aggregate.
//!
//! A [`Template`] owns the parsed tree of one template together with the
//! facts analysis records about it: the strict-variable flag, the collected
//! diagnostics, the macro registry, and the declared-name sets of the
//! template scope and of every block.
//!
//! Block scopes are kept in a side table keyed by the block's [`NodeId`]
//! rather than on the nodes themselves, so recording a declaration never
//! touches the tree's shape.

use crate::ast::{Ast, NodeId, NodeKind};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::foundation::Span;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Where a name is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Template-wide scope (top-level variables, macros, import namespaces)
    Template,
    /// Scope of one [`NodeKind::Block`]
    Block(NodeId),
}

/// One parsed template and everything analysis learns about it.
#[derive(Debug, Clone)]
pub struct Template {
    /// Template name, usually its path
    pub name: String,
    ast: Ast,
    root: NodeId,
    header: Option<NodeId>,
    strict_variable_declaration: bool,
    diagnostics: Vec<Diagnostic>,
    macros: IndexMap<String, NodeId>,
    template_scope: IndexSet<String>,
    block_scopes: HashMap<NodeId, IndexSet<String>>,
    /// Diagnostic count when the last analysis started
    analysis_start: Option<usize>,
}

impl Template {
    /// Wraps a parsed tree. `root` is usually a [`NodeKind::Block`]; `header`,
    /// when present, is a [`NodeKind::Header`] outside the root subtree.
    pub fn new(name: impl Into<String>, ast: Ast, root: NodeId, header: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            ast,
            root,
            header,
            strict_variable_declaration: false,
            diagnostics: Vec::new(),
            macros: IndexMap::new(),
            template_scope: IndexSet::new(),
            block_scopes: HashMap::new(),
            analysis_start: None,
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn header(&self) -> Option<NodeId> {
        self.header
    }

    pub fn strict_variable_declaration(&self) -> bool {
        self.strict_variable_declaration
    }

    pub fn set_strict_variable_declaration(&mut self, strict: bool) {
        self.strict_variable_declaration = strict;
    }

    // === Diagnostics ===

    /// Diagnostic sink: records a problem and carries on.
    pub fn add_problem(&mut self, kind: DiagnosticKind, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(kind, span, message.into()));
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn has_problems(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Discards what a previous analysis recorded (declarations, the macro
    /// registry and the diagnostics it appended) so the template can be
    /// analyzed again. Diagnostics recorded before the first analysis stay.
    pub fn reset_analysis(&mut self) {
        if let Some(start) = self.analysis_start {
            self.diagnostics.truncate(start);
        }
        self.analysis_start = Some(self.diagnostics.len());
        self.macros.clear();
        self.template_scope.clear();
        self.block_scopes.clear();
    }

    // === Macros ===

    /// Registers a macro under its name; a later macro with the same name
    /// replaces the earlier one.
    pub fn add_macro(&mut self, name: impl Into<String>, node: NodeId) {
        self.macros.insert(name.into(), node);
    }

    pub fn macro_node(&self, name: &str) -> Option<NodeId> {
        self.macros.get(name).copied()
    }

    pub fn macros(&self) -> &IndexMap<String, NodeId> {
        &self.macros
    }

    // === Scopes ===

    /// Records `name` as declared in `scope`. Declaring twice is not an error
    /// here; callers that forbid redeclaration check [`Self::declares_variable`].
    pub fn declare_variable(&mut self, scope: Scope, name: impl Into<String>) {
        let name = name.into();
        match scope {
            Scope::Template => {
                self.template_scope.insert(name);
            }
            Scope::Block(block) => {
                debug_assert!(
                    matches!(self.ast.kind(block), NodeKind::Block),
                    "block scope on non-block node {block}"
                );
                self.block_scopes.entry(block).or_default().insert(name);
            }
        }
    }

    /// Whether `name` is declared in exactly `scope`; enclosing scopes are
    /// not consulted.
    pub fn declares_variable(&self, scope: Scope, name: &str) -> bool {
        match scope {
            Scope::Template => self.template_scope.contains(name),
            Scope::Block(block) => self
                .block_scopes
                .get(&block)
                .is_some_and(|names| names.contains(name)),
        }
    }

    /// Names declared in `scope`, in declaration order.
    pub fn declared_variables(&self, scope: Scope) -> Vec<&str> {
        match scope {
            Scope::Template => self.template_scope.iter().map(String::as_str).collect(),
            Scope::Block(block) => self
                .block_scopes
                .get(&block)
                .map(|names| names.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    /// Whether `name` resolves from `block`: its own scope, any enclosing
    /// block scope, or the template scope.
    pub fn resolves_variable(&self, block: NodeId, name: &str) -> bool {
        std::iter::once(block)
            .chain(self.ast.ancestors(block))
            .filter(|&id| matches!(self.ast.kind(id), NodeKind::Block))
            .any(|id| self.declares_variable(Scope::Block(id), name))
            || self.declares_variable(Scope::Template, name)
    }
}
