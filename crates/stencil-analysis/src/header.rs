//! Template header parameters.
//!
//! The header is read before the body so that the strict-variable flag is
//! known for the whole walk. Both `strict_vars` and `legacy_syntax` set it
//! (the latter inverted); when both are present the later one wins.

use crate::pass::PostParsePass;
use stencil_ast::ast::NodeKind;
use stencil_ast::{DiagnosticKind, NodeId};
use tracing::warn;

/// How a header parameter affects analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderParam {
    StrictVars,
    LegacySyntax,
    /// Recognized, consumed elsewhere
    Encoding,
}

impl HeaderParam {
    fn lookup(key: &str) -> Option<Self> {
        match key {
            "strict_vars" => Some(HeaderParam::StrictVars),
            "legacy_syntax" => Some(HeaderParam::LegacySyntax),
            "encoding" => Some(HeaderParam::Encoding),
            _ => None,
        }
    }
}

impl PostParsePass<'_> {
    pub(crate) fn process_header(&mut self, header: NodeId) {
        let keys: Vec<String> = match self.template.ast().kind(header) {
            NodeKind::Header { params } => params.keys().cloned().collect(),
            _ => return,
        };

        let mut strict_set_by: Option<String> = None;
        for key in keys {
            let Some(param) = HeaderParam::lookup(&key) else {
                self.problem(
                    DiagnosticKind::UnknownHeaderParameter,
                    header,
                    format!("Unknown header parameter: {key}"),
                );
                continue;
            };
            if param == HeaderParam::Encoding {
                continue;
            }

            let value = match self.template.ast().boolean_param(header, &key) {
                Ok(value) => value,
                Err(err) => {
                    self.problem(DiagnosticKind::InvalidHeaderParameter, header, err.to_string());
                    continue;
                }
            };
            let strict = match param {
                HeaderParam::LegacySyntax => !value,
                _ => value,
            };

            if let Some(previous) = &strict_set_by {
                warn!(
                    template = %self.template.name,
                    previous = %previous,
                    key = %key,
                    "strict-variable mode set twice in header; the last one wins"
                );
            }
            self.template.set_strict_variable_declaration(strict);
            strict_set_by = Some(key);
        }
    }
}
