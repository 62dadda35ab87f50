//! Build configuration: the inputs that distinguish binary variants.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ReqCacheError, Result};

/// Settings, options, and transitive requirement identities of a recipe.
///
/// Ordered collections make the canonical encoding independent of the
/// order in which entries were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Setting name to value (e.g. `os=Linux`, `build_type=Release`).
    pub settings: BTreeMap<String, String>,
    /// Option name to value (e.g. `shared=True`).
    pub options: BTreeMap<String, String>,
    /// Identities of transitive requirements, usually package references.
    pub requires: BTreeSet<String>,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn with_require(mut self, identity: impl Into<String>) -> Self {
        self.requires.insert(identity.into());
        self
    }

    /// True when there are no settings, options, or requirements.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.options.is_empty() && self.requires.is_empty()
    }

    /// Validate every entry and render the canonical encoding.
    ///
    /// Sections without entries are omitted, so an empty configuration
    /// encodes to the empty string.
    pub fn canonical(&self) -> Result<String> {
        let mut out = String::new();

        if !self.settings.is_empty() {
            out.push_str("[settings]\n");
            for (name, value) in &self.settings {
                validate_entry("setting", name, value)?;
                out.push_str(&format!("    {}={}\n", name, value));
            }
        }

        if !self.options.is_empty() {
            out.push_str("[options]\n");
            for (name, value) in &self.options {
                validate_entry("option", name, value)?;
                out.push_str(&format!("    {}={}\n", name, value));
            }
        }

        if !self.requires.is_empty() {
            out.push_str("[requires]\n");
            for identity in &self.requires {
                if identity.is_empty() || identity.contains(char::is_whitespace) {
                    return Err(ReqCacheError::configuration(format!(
                        "requirement identity '{}' must be non-empty without whitespace",
                        identity
                    )));
                }
                out.push_str(&format!("    {}\n", identity));
            }
        }

        Ok(out)
    }
}

fn validate_entry(kind: &str, name: &str, value: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ReqCacheError::configuration(format!(
            "{} name must not be empty",
            kind
        )));
    }
    if name.contains('=') || name.contains(char::is_whitespace) {
        return Err(ReqCacheError::configuration(format!(
            "{} name '{}' must not contain '=' or whitespace",
            kind, name
        )));
    }
    if value.contains(['\n', '\r']) {
        return Err(ReqCacheError::configuration(format!(
            "{} '{}' has a value spanning multiple lines",
            kind, name
        )));
    }
    Ok(())
}
