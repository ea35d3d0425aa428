//! The post-parse pass.
//!
//! [`PostParsePass`] walks a template once, depth-first in source order. It
//! reads the header first, then visits the root with one hook per node kind.
//! The hooks themselves live next to the concern they check:
//!
//! - [`crate::escapes`]: escape blocks, noescape blocks, interpolations
//! - [`crate::scope`]: macros, var directives, imports, list blocks
//! - [`crate::validation`]: assignments, control flow, built-ins, literals,
//!   settings
//!
//! Every problem goes to the template's diagnostic sink and the walk carries
//! on, so one run reports everything it can find.

use crate::escapes::{EscapeStack, EscapeStats};
use crate::options::AnalysisOptions;
use stencil_ast::ast::{walk_children, Ast, NodeId, Visitor};
use stencil_ast::{Diagnostic, DiagnosticKind, Template};
use tracing::debug;

/// Summary of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisReport {
    /// Strict-variable mode the body was analyzed under
    pub strict_variable_declaration: bool,
    /// Diagnostics recorded by this run
    pub problems: usize,
    /// Escape stack activity
    pub escapes: EscapeStats,
}

impl AnalysisReport {
    pub fn is_clean(&self) -> bool {
        self.problems == 0
    }
}

/// Traversal state for one template.
pub struct PostParsePass<'a> {
    pub(crate) template: &'a mut Template,
    pub(crate) options: &'a AnalysisOptions,
    /// Snapshot of the template's strict flag, fixed once the header is read
    pub(crate) strict: bool,
    pub(crate) escapes: EscapeStack,
}

impl<'a> PostParsePass<'a> {
    pub fn new(template: &'a mut Template, options: &'a AnalysisOptions) -> Self {
        let strict = template.strict_variable_declaration();
        Self {
            template,
            options,
            strict,
            escapes: EscapeStack::default(),
        }
    }

    /// Reads the header, then walks the body. Results of an earlier run on
    /// the same template are replaced.
    pub fn run(mut self) -> AnalysisReport {
        self.template.reset_analysis();
        let before = self.template.diagnostics().len();

        self.template
            .set_strict_variable_declaration(self.options.default_strict_vars);
        if let Some(header) = self.template.header() {
            self.process_header(header);
        }
        self.strict = self.template.strict_variable_declaration();

        debug!(
            template = %self.template.name,
            strict = self.strict,
            nodes = self.template.ast().len(),
            "analyzing template"
        );

        let root = self.template.root();
        self.visit(root);

        let report = AnalysisReport {
            strict_variable_declaration: self.strict,
            problems: self.template.diagnostics().len() - before,
            escapes: self.escapes.stats(),
        };
        debug_assert_eq!(report.escapes.depth, 0, "escape stack not unwound");

        debug!(
            template = %self.template.name,
            problems = report.problems,
            macros = self.template.macros().len(),
            "analysis finished"
        );
        report
    }

    /// Records a problem located at node `id`.
    pub(crate) fn problem(&mut self, kind: DiagnosticKind, id: NodeId, message: impl Into<String>) {
        let span = self.template.ast().span(id);
        self.report(Diagnostic::new(kind, span, message.into()));
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        debug!(
            kind = diagnostic.kind.name(),
            span = %diagnostic.span,
            "{}",
            diagnostic.message
        );
        self.template.push_diagnostic(diagnostic);
    }
}

/// Analyzes `template` in place: sets its strict flag, fills its scopes and
/// macro registry, annotates interpolations and escape blocks with their
/// escaped expressions, and appends diagnostics.
pub fn analyze(template: &mut Template, options: &AnalysisOptions) -> AnalysisReport {
    PostParsePass::new(template, options).run()
}

impl Visitor for PostParsePass<'_> {
    fn ast(&self) -> &Ast {
        self.template.ast()
    }

    fn visit_header(&mut self, _id: NodeId) {
        // Handled before the walk; the header is not part of the body.
    }

    fn visit_macro(&mut self, id: NodeId) {
        self.check_macro(id);
        walk_children(self, id);
    }

    fn visit_interpolation(&mut self, id: NodeId) {
        walk_children(self, id);
        self.annotate_interpolation(id);
    }

    fn visit_escape_block(&mut self, id: NodeId) {
        self.annotate_escape_block(id);
        let mut scope = self.enter_escape(id);
        walk_children(&mut *scope, id);
    }

    fn visit_no_escape_block(&mut self, id: NodeId) {
        self.check_no_escape(id);
        let mut scope = self.suspend_escape();
        walk_children(&mut *scope, id);
    }

    fn visit_iterator_block(&mut self, id: NodeId) {
        self.declare_loop_variables(id);
        walk_children(self, id);
    }

    fn visit_break(&mut self, id: NodeId) {
        walk_children(self, id);
        self.check_break(id);
    }

    fn visit_return(&mut self, id: NodeId) {
        walk_children(self, id);
        self.check_return(id);
    }

    fn visit_assignment(&mut self, id: NodeId) {
        walk_children(self, id);
        self.check_assignment(id);
    }

    fn visit_block_assignment(&mut self, id: NodeId) {
        walk_children(self, id);
        self.check_block_assignment(id);
    }

    fn visit_var_directive(&mut self, id: NodeId) {
        self.declare_vars(id);
        walk_children(self, id);
    }

    fn visit_import(&mut self, id: NodeId) {
        self.declare_import(id);
        walk_children(self, id);
    }

    fn visit_property_setting(&mut self, id: NodeId) {
        self.check_setting(id);
        walk_children(self, id);
    }

    fn visit_string_literal(&mut self, id: NodeId) {
        self.check_string_literal(id);
        walk_children(self, id);
    }

    fn visit_builtin(&mut self, id: NodeId) {
        walk_children(self, id);
        self.check_builtin(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_ast::{MacroKind, Scope, TemplateBuilder};

    #[test]
    fn test_second_run_reports_the_same() {
        let mut b = TemplateBuilder::new("t.stl");
        let strict = b.boolean(true);
        b.header(vec![("strict_vars", strict)]);
        let import = b.import("/lib.stl", "lib");
        let var = b.var(&["x"], vec![]);
        let (mac, _) = b.macro_def("m", MacroKind::Procedure, vec![]);
        let mut template = b.finish(vec![import, var, mac]);
        let options = AnalysisOptions::default();

        let first = analyze(&mut template, &options);
        let second = analyze(&mut template, &options);

        assert_eq!(first, second);
        assert!(second.is_clean());
        assert!(!template.has_problems());
        assert_eq!(template.declared_variables(Scope::Template), vec!["lib", "m"]);
        assert_eq!(template.declared_variables(Scope::Block(template.root())), vec!["x"]);
        assert_eq!(template.macro_node("m"), Some(mac));
    }

    #[test]
    fn test_second_run_replaces_its_own_diagnostics() {
        let mut b = TemplateBuilder::new("t.stl");
        let first_x = b.var(&["x"], vec![]);
        let second_x = b.var(&["x"], vec![]);
        let mut template = b.finish(vec![first_x, second_x]);
        let options = AnalysisOptions::default();

        assert_eq!(analyze(&mut template, &options).problems, 1);
        assert_eq!(analyze(&mut template, &options).problems, 1);
        assert_eq!(template.diagnostics().len(), 1);
        assert_eq!(
            template.diagnostics()[0].message,
            "The variable x has already been declared in this block."
        );
    }

    #[test]
    fn test_rerun_under_other_options() {
        let mut b = TemplateBuilder::new("t.stl");
        let (first, _) = b.macro_def("m", MacroKind::Procedure, vec![]);
        let (second, _) = b.macro_def("m", MacroKind::Procedure, vec![]);
        let mut template = b.finish(vec![first, second]);

        assert!(analyze(&mut template, &AnalysisOptions::default()).is_clean());
        assert_eq!(analyze(&mut template, &AnalysisOptions::strict()).problems, 1);
        assert!(analyze(&mut template, &AnalysisOptions::default()).is_clean());
        assert!(!template.has_problems());
        assert_eq!(template.macro_node("m"), Some(second));
    }
}
