//! Glob patterns over recipe references.

use regex::Regex;

use super::RecipeRef;
use crate::error::{ReqCacheError, Result};

/// Selects recipes by exact reference or glob.
///
/// `*` matches any run of characters and `?` matches one character. The
/// pattern is matched against the whole canonical text
/// (`name/version@user/channel`), so `zlib*` selects every version and
/// channel of zlib.
#[derive(Debug, Clone)]
pub struct RefPattern {
    source: String,
    regex: Regex,
}

impl RefPattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(ReqCacheError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern is empty".to_string(),
            });
        }

        let mut expr = String::from("^");
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(&other.to_string())),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| ReqCacheError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Pattern text as given.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern contains wildcards.
    pub fn is_glob(&self) -> bool {
        self.source.contains(['*', '?'])
    }

    /// Check a reference against the pattern.
    pub fn matches(&self, recipe: &RecipeRef) -> bool {
        self.regex.is_match(&recipe.to_string())
    }
}
