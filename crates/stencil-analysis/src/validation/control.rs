//! `<#break>` and `<#return>` placement.

use crate::pass::PostParsePass;
use stencil_ast::ast::{MacroKind, NodeKind};
use stencil_ast::{DiagnosticKind, NodeId};

impl PostParsePass<'_> {
    pub(crate) fn check_break(&mut self, id: NodeId) {
        let in_loop = self
            .template
            .ast()
            .first_ancestor(id, |kind| matches!(kind, NodeKind::IteratorBlock { .. }))
            .is_some();
        if !in_loop {
            self.problem(
                DiagnosticKind::MisplacedBreak,
                id,
                "The break directive can only be used within a loop.",
            );
        }
    }

    pub(crate) fn check_return(&mut self, id: NodeId) {
        let ast = self.template.ast();
        let has_value = !ast.children(id).is_empty();
        let enclosing = ast.ancestors(id).find_map(|a| match ast.kind(a) {
            NodeKind::Macro { kind, .. } => Some(*kind),
            _ => None,
        });

        match (enclosing, has_value) {
            (None, _) => self.problem(
                DiagnosticKind::MisplacedReturn,
                id,
                "The return directive can only be used inside a function or macro.",
            ),
            (Some(MacroKind::Procedure), true) => self.problem(
                DiagnosticKind::ReturnValueMismatch,
                id,
                "Can only return a value from a function, not a macro",
            ),
            (Some(MacroKind::Function), false) => self.problem(
                DiagnosticKind::ReturnValueMismatch,
                id,
                "A function must return a value.",
            ),
            (Some(MacroKind::Procedure), false) | (Some(MacroKind::Function), true) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{analyze, AnalysisOptions};
    use stencil_ast::ast::MacroKind;
    use stencil_ast::{DiagnosticKind, TemplateBuilder};

    #[test]
    fn test_break_inside_list() {
        let mut b = TemplateBuilder::new("t.stl");
        let brk = b.break_();
        let seq = b.ident("items");
        let (list, _) = b.list(seq, "item", None, vec![brk]);
        let mut template = b.finish(vec![list]);
        let report = analyze(&mut template, &AnalysisOptions::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_break_at_top_level() {
        let mut b = TemplateBuilder::new("t.stl");
        b.at_line(3);
        let brk = b.break_();
        let mut template = b.finish(vec![brk]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(report.problems, 1);
        let diagnostic = &template.diagnostics()[0];
        assert_eq!(diagnostic.kind, DiagnosticKind::MisplacedBreak);
        assert_eq!(diagnostic.message, "The break directive can only be used within a loop.");
        assert_eq!(diagnostic.span.line, 3);
    }

    #[test]
    fn test_break_after_list() {
        let mut b = TemplateBuilder::new("t.stl");
        let inner = b.break_();
        let seq = b.ident("items");
        let (list, _) = b.list(seq, "i", None, vec![inner]);
        let outer = b.break_();
        let mut template = b.finish(vec![list, outer]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(report.problems, 1);
        assert_eq!(template.diagnostics()[0].span, template.ast().span(outer));
    }

    #[test]
    fn test_return_outside_macro() {
        let mut b = TemplateBuilder::new("t.stl");
        let ret = b.return_(None);
        let mut template = b.finish(vec![ret]);
        analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(template.diagnostics()[0].kind, DiagnosticKind::MisplacedReturn);
        assert_eq!(
            template.diagnostics()[0].message,
            "The return directive can only be used inside a function or macro."
        );
    }

    #[test]
    fn test_return_value_must_match_macro_kind() {
        let mut b = TemplateBuilder::new("t.stl");
        let one = b.number(1);
        let valued = b.return_(Some(one));
        let (mac, _) = b.macro_def("m", MacroKind::Procedure, vec![valued]);
        let bare = b.return_(None);
        let (func, _) = b.macro_def("f", MacroKind::Function, vec![bare]);
        let mut template = b.finish(vec![mac, func]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(report.problems, 2);
        let messages: Vec<_> = template.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Can only return a value from a function, not a macro",
                "A function must return a value.",
            ]
        );
        assert!(template
            .diagnostics()
            .iter()
            .all(|d| d.kind == DiagnosticKind::ReturnValueMismatch));
    }

    #[test]
    fn test_matching_returns_are_clean() {
        let mut b = TemplateBuilder::new("t.stl");
        let bare = b.return_(None);
        let seq = b.ident("items");
        let (list, _) = b.list(seq, "i", None, vec![bare]);
        let (mac, _) = b.macro_def("m", MacroKind::Procedure, vec![list]);
        let one = b.number(1);
        let valued = b.return_(Some(one));
        let (func, _) = b.macro_def("f", MacroKind::Function, vec![valued]);
        let mut template = b.finish(vec![mac, func]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert!(report.is_clean());
    }

    #[test]
    fn test_nearest_macro_decides() {
        let mut b = TemplateBuilder::new("t.stl");
        let bare = b.return_(None);
        let (inner, _) = b.macro_def("inner", MacroKind::Procedure, vec![bare]);
        let one = b.number(1);
        let valued = b.return_(Some(one));
        let (outer, _) = b.macro_def("outer", MacroKind::Function, vec![inner, valued]);
        let mut template = b.finish(vec![outer]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert!(report.is_clean());
    }
}
