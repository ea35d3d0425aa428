//! Reading template header parameters.

use super::{Ast, ExprKind, NodeId, NodeKind};
use thiserror::Error;

/// Why a header parameter could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParamError {
    #[error("The header parameter {key} is not set")]
    Missing { key: String },

    #[error("The header parameter {key} must be a boolean literal, found {found}")]
    NotBoolean { key: String, found: String },

    #[error("Node {node} is not a template header")]
    NotAHeader { node: NodeId },
}

impl Ast {
    /// Value expression of header parameter `key`.
    pub fn header_param(&self, header: NodeId, key: &str) -> Result<NodeId, HeaderParamError> {
        let NodeKind::Header { params } = self.kind(header) else {
            return Err(HeaderParamError::NotAHeader { node: header });
        };
        params
            .get(key)
            .copied()
            .ok_or_else(|| HeaderParamError::Missing {
                key: key.to_string(),
            })
    }

    /// Reads header parameter `key` as a boolean.
    ///
    /// Only the literals `true` and `false` are accepted; header values are
    /// read before any data model exists, so nothing is evaluated.
    pub fn boolean_param(&self, header: NodeId, key: &str) -> Result<bool, HeaderParamError> {
        let value = self.header_param(header, key)?;
        match self.kind(value) {
            NodeKind::Expression(ExprKind::Boolean(b)) => Ok(*b),
            _ => Err(HeaderParamError::NotBoolean {
                key: key.to_string(),
                found: self.expr(value).to_string(),
            }),
        }
    }
}
