//! High-level check API.

use rayon::prelude::*;
use stencil_analysis::{analyze, AnalysisOptions, AnalysisReport};
use stencil_ast::{Diagnostic, DiagnosticFormatter, Template, TemplateSource};
use tracing::info;

/// Analyzes one template.
///
/// The template is annotated in place either way. It keeps its diagnostics,
/// and on failure they are also returned, in traversal order.
///
/// # Errors
/// Returns every [`Diagnostic`] recorded on the template if there is at least
/// one.
pub fn check(template: &mut Template, options: &AnalysisOptions) -> Result<AnalysisReport, Vec<Diagnostic>> {
    let report = analyze(template, options);
    if template.has_problems() {
        Err(template.diagnostics().to_vec())
    } else {
        Ok(report)
    }
}

/// Analyzes a batch of independent templates in parallel.
///
/// Reports are returned in input order.
pub fn check_all(templates: &mut [Template], options: &AnalysisOptions) -> Vec<AnalysisReport> {
    let reports: Vec<AnalysisReport> = templates
        .par_iter_mut()
        .map(|template| analyze(template, options))
        .collect();

    let problems: usize = reports.iter().map(|r| r.problems).sum();
    info!(templates = reports.len(), problems, "checked template batch");
    reports
}

/// Formats diagnostics with source context.
pub fn format_diagnostics(diagnostics: &[Diagnostic], source: &TemplateSource) -> String {
    let formatter = DiagnosticFormatter::new(source);
    formatter.format_all(diagnostics)
}
