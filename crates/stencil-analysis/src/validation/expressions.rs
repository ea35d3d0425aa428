//! Built-in names, string literals, and `<#setting>` keys.

use crate::pass::PostParsePass;
use stencil_ast::ast::{check_interpolation, NodeKind};
use stencil_ast::{BuiltInKind, DiagnosticKind, NodeId};

impl PostParsePass<'_> {
    pub(crate) fn check_builtin(&mut self, id: NodeId) {
        let NodeKind::BuiltIn { name } = self.template.ast().kind(id) else {
            unreachable!("built-in hook on {id}");
        };
        if BuiltInKind::lookup(name).is_none() {
            let message = format!("Unknown builtin: {name}");
            self.problem(DiagnosticKind::UnknownBuiltIn, id, message);
        }
    }

    /// Non-raw literals are checked for embedded interpolations.
    pub(crate) fn check_string_literal(&mut self, id: NodeId) {
        let NodeKind::StringLiteral { value, raw } = self.template.ast().kind(id) else {
            unreachable!("string literal hook on {id}");
        };
        if *raw {
            return;
        }
        if let Err(err) = check_interpolation(value) {
            let span = self.template.ast().span(id);
            self.problem(
                DiagnosticKind::InvalidStringLiteral,
                id,
                format!("Error in string at {span}: {err}"),
            );
        }
    }

    pub(crate) fn check_setting(&mut self, id: NodeId) {
        let NodeKind::PropertySetting { key } = self.template.ast().kind(id) else {
            unreachable!("setting hook on {id}");
        };
        if !self.options.allows_setting(key) {
            let message = format!(
                "Invalid setting name, or it is not allowed to change the value of the setting \
                 from a template: {key}"
            );
            self.problem(DiagnosticKind::UnknownSetting, id, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{analyze, AnalysisOptions};
    use stencil_ast::{DiagnosticKind, Template, TemplateBuilder};

    fn messages(template: &Template) -> Vec<&str> {
        template
            .diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect()
    }

    #[test]
    fn test_known_and_unknown_builtins() {
        let mut b = TemplateBuilder::new("t.stl");
        let x = b.ident("x");
        let html = b.builtin(x, "html");
        let upper = b.builtin(html, "uper_case");
        let interp = b.interpolation(upper);
        let mut template = b.finish(vec![interp]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(report.problems, 1);
        assert_eq!(template.diagnostics()[0].kind, DiagnosticKind::UnknownBuiltIn);
        assert_eq!(messages(&template), vec!["Unknown builtin: uper_case"]);
        assert_eq!(template.diagnostics()[0].span, template.ast().span(upper));
    }

    #[test]
    fn test_inner_builtin_reported_first() {
        let mut b = TemplateBuilder::new("t.stl");
        let x = b.ident("x");
        let inner = b.builtin(x, "nope");
        let outer = b.builtin(inner, "nada");
        let interp = b.interpolation(outer);
        let mut template = b.finish(vec![interp]);
        analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(
            messages(&template),
            vec!["Unknown builtin: nope", "Unknown builtin: nada"]
        );
    }

    #[test]
    fn test_string_literal_interpolation() {
        let mut b = TemplateBuilder::new("t.stl");
        let ok = b.string("Hello ${name}!");
        let ok_interp = b.interpolation(ok);
        b.at_line(2);
        let bad = b.string("Hello ${name");
        let bad_interp = b.interpolation(bad);
        let raw = b.raw_string("Hello ${name");
        let raw_interp = b.interpolation(raw);
        let mut template = b.finish(vec![ok_interp, bad_interp, raw_interp]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(report.problems, 1);
        assert_eq!(template.diagnostics()[0].kind, DiagnosticKind::InvalidStringLiteral);
        assert_eq!(
            messages(&template),
            vec!["Error in string at line 2: Unterminated interpolation starting at offset 6"]
        );
    }

    #[test]
    fn test_string_literal_with_malformed_expression() {
        let mut b = TemplateBuilder::new("t.stl");
        let operands = b.string("${a b}");
        let first = b.interpolation(operands);
        let dangling = b.string("Total: ${price *}");
        let second = b.interpolation(dangling);
        let mut template = b.finish(vec![first, second]);
        analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(
            messages(&template),
            vec![
                "Error in string at line 1: Unexpected token 'b' at offset 4",
                "Error in string at line 1: Expected an expression but found '}' at offset 16",
            ]
        );
    }

    #[test]
    fn test_settings() {
        let mut b = TemplateBuilder::new("t.stl");
        let de = b.string("de_DE");
        let locale = b.setting("locale", de);
        let utf8 = b.string("UTF-8");
        let encoding = b.setting("output_encoding", utf8);
        let mut template = b.finish(vec![locale, encoding]);
        let report = analyze(&mut template, &AnalysisOptions::default());

        assert_eq!(report.problems, 1);
        assert_eq!(template.diagnostics()[0].kind, DiagnosticKind::UnknownSetting);
        assert_eq!(
            messages(&template),
            vec![
                "Invalid setting name, or it is not allowed to change the value of the setting \
                 from a template: output_encoding"
            ]
        );
    }

    #[test]
    fn test_extra_setting_keys_and_value_walk() {
        let mut b = TemplateBuilder::new("t.stl");
        let bad = b.string("${");
        let encoding = b.setting("output_encoding", bad);
        let mut template = b.finish(vec![encoding]);
        let options = AnalysisOptions::default().with_setting_key("output_encoding");
        let report = analyze(&mut template, &options);

        // The key is accepted; the value is still analyzed.
        assert_eq!(report.problems, 1);
        assert_eq!(template.diagnostics()[0].kind, DiagnosticKind::InvalidStringLiteral);
    }
}
