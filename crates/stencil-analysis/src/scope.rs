//! Declarations: macros, `<#var>`, `<#import>` namespaces, loop variables.
//!
//! # Scopes
//!
//! Each [`NodeKind::Block`] has its own scope; the template has one more at
//! the top. Declarations land in the innermost scope that applies:
//!
//! | Construct        | Scope                                          |
//! |------------------|------------------------------------------------|
//! | macro, function  | template (strict mode only)                    |
//! | `<#var>`         | enclosing block, or template if not in a block |
//! | `<#import>`      | template                                       |
//! | list variables   | the list's body block                          |
//!
//! Duplicates are reported only where redeclaration is forbidden: a macro or
//! import namespace clashing with a template-scope name in strict mode, and a
//! `<#var>` clashing within the same block.

use crate::pass::PostParsePass;
use stencil_ast::ast::NodeKind;
use stencil_ast::{Diagnostic, DiagnosticKind, NodeId, Scope};

/// The three variables a list introduces for a loop variable `name`.
pub fn loop_variable_names(name: &str) -> [String; 3] {
    [
        name.to_string(),
        format!("{name}_has_next"),
        format!("{name}_index"),
    ]
}

impl PostParsePass<'_> {
    pub(crate) fn check_macro(&mut self, id: NodeId) {
        let NodeKind::Macro { name, .. } = self.template.ast().kind(id) else {
            unreachable!("macro hook on {id}");
        };
        let name = name.clone();

        if self.strict {
            if self.template.declares_variable(Scope::Template, &name) {
                let span = self.template.ast().span(id);
                let mut diagnostic = Diagnostic::new(
                    DiagnosticKind::DuplicateDeclaration,
                    span,
                    format!(
                        "You already have declared a variable (or declared another macro) as {name}. \
                         You cannot reuse the variable name in the same template."
                    ),
                );
                if let Some(previous) = self.template.macro_node(&name) {
                    let previous_span = self.template.ast().span(previous);
                    diagnostic = diagnostic.with_label(previous_span, "previously declared here".to_string());
                }
                self.report(diagnostic);
            }
            self.template.declare_variable(Scope::Template, name.clone());

            // Every ancestor counts, the immediate parent included.
            let ast = self.template.ast();
            let enclosing: Vec<String> = ast
                .ancestors(id)
                .filter(|&a| !ast.kind(a).admits_macros())
                .map(|a| ast.kind(a).description())
                .collect();
            for description in enclosing {
                self.problem(
                    DiagnosticKind::MisplacedMacro,
                    id,
                    format!("Macro {name} is within a {description}. It must be a top-level element."),
                );
            }
        }

        self.template.add_macro(name, id);
    }

    pub(crate) fn declare_vars(&mut self, id: NodeId) {
        let NodeKind::VarDirective { names } = self.template.ast().kind(id) else {
            unreachable!("var hook on {id}");
        };
        let names = names.clone();
        let block = self
            .template
            .ast()
            .parent(id)
            .filter(|&p| matches!(self.template.ast().kind(p), NodeKind::Block));

        for name in names {
            let Some(block) = block else {
                self.template.declare_variable(Scope::Template, name);
                continue;
            };
            let scope = Scope::Block(block);
            if self.template.declares_variable(scope, &name) {
                self.problem(
                    DiagnosticKind::DuplicateDeclaration,
                    id,
                    format!("The variable {name} has already been declared in this block."),
                );
            }
            self.template.declare_variable(scope, name);
        }
    }

    pub(crate) fn declare_import(&mut self, id: NodeId) {
        let NodeKind::Import { namespace, .. } = self.template.ast().kind(id) else {
            unreachable!("import hook on {id}");
        };
        let namespace = namespace.clone();

        if self.strict && self.template.declares_variable(Scope::Template, &namespace) {
            self.problem(
                DiagnosticKind::DuplicateDeclaration,
                id,
                format!(
                    "The variable {namespace} is already declared and should not be used as a \
                     namespace name to import."
                ),
            );
        }
        self.template.declare_variable(Scope::Template, namespace);
    }

    pub(crate) fn declare_loop_variables(&mut self, id: NodeId) {
        let NodeKind::IteratorBlock {
            index_var,
            value_var,
        } = self.template.ast().kind(id)
        else {
            unreachable!("list hook on {id}");
        };
        let vars: Vec<String> = std::iter::once(index_var.clone())
            .chain(value_var.clone())
            .collect();
        let Some(body) = self.template.ast().nested_block(id) else {
            return;
        };

        for var in vars {
            for name in loop_variable_names(&var) {
                self.template.declare_variable(Scope::Block(body), name);
            }
        }
    }
}
