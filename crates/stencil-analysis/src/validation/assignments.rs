//! Assignment targets and deprecated assignment directives.

use crate::pass::PostParsePass;
use stencil_ast::ast::{AssignDirective, NodeKind};
use stencil_ast::{DiagnosticKind, NodeId};

fn is_macro(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Macro { .. })
}

impl PostParsePass<'_> {
    pub(crate) fn check_assignment(&mut self, id: NodeId) {
        let NodeKind::Assignment { directive, targets } = self.template.ast().kind(id) else {
            unreachable!("assignment hook on {id}");
        };
        let (directive, targets) = (*directive, targets.clone());

        for target in targets {
            if !self.template.ast().is_assignable(target) {
                let expr = self.template.ast().expr(target);
                self.problem(
                    DiagnosticKind::NotAssignable,
                    target,
                    format!("Cannot assign to expression {expr}"),
                );
            }
        }
        self.check_directive(id, directive);
    }

    pub(crate) fn check_block_assignment(&mut self, id: NodeId) {
        let NodeKind::BlockAssignment { directive, target } = self.template.ast().kind(id) else {
            unreachable!("block assignment hook on {id}");
        };
        let (directive, target) = (*directive, *target);

        if !self.template.ast().is_assignable(target) {
            let expr = self.template.ast().expr(target);
            self.problem(
                DiagnosticKind::NotAssignable,
                target,
                format!("The expression {expr} cannot be assigned to."),
            );
        }
        self.check_directive(id, directive);
    }

    /// `assign` and `local` are deprecated in strict mode; outside it,
    /// `local` still needs an enclosing macro.
    fn check_directive(&mut self, id: NodeId, directive: AssignDirective) {
        if self.strict {
            if directive != AssignDirective::Set {
                let keyword = directive.keyword();
                self.problem(
                    DiagnosticKind::DeprecatedDirective,
                    id,
                    format!(
                        "The {keyword} directive is deprecated and cannot be used in strict_vars \
                         mode. See the var and set directives."
                    ),
                );
            }
        } else if directive == AssignDirective::Local
            && self.template.ast().first_ancestor(id, is_macro).is_none()
        {
            self.problem(
                DiagnosticKind::MisplacedLocal,
                id,
                "The local directive can only be used inside a function or macro.",
            );
        }
    }
}
