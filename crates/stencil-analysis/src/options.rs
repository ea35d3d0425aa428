//! Analysis configuration.
//!
//! Options are plain data so they can be embedded in a host's own config
//! file; every field has a default and missing fields deserialize to it.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Keys a `<#setting>` directive may change.
///
/// This set is fixed. A host embedding the analysis may accept further keys
/// through [`AnalysisOptions::extra_setting_keys`], which is empty by
/// default; no option removes a key from this list.
pub const SETTING_KEYS: [&str; 8] = [
    "locale",
    "number_format",
    "time_format",
    "date_format",
    "datetime_format",
    "time_zone",
    "boolean_format",
    "url_escaping_charset",
];

/// Knobs for [`crate::analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Strict-variable mode for templates whose header does not say.
    pub default_strict_vars: bool,
    /// Host extension: setting keys accepted in addition to
    /// [`SETTING_KEYS`]. Empty unless the host opts in.
    pub extra_setting_keys: IndexSet<String>,
}

impl AnalysisOptions {
    pub fn strict() -> Self {
        Self {
            default_strict_vars: true,
            ..Self::default()
        }
    }

    pub fn with_setting_key(mut self, key: impl Into<String>) -> Self {
        self.extra_setting_keys.insert(key.into());
        self
    }

    /// Whether `<#setting key=...>` is allowed.
    pub fn allows_setting(&self, key: &str) -> bool {
        SETTING_KEYS.contains(&key) || self.extra_setting_keys.contains(key)
    }
}
