//! Package identifiers.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::BuildConfig;
use crate::error::{ReqCacheError, Result};

/// Identifier shared by every configuration-free recipe.
///
/// Empty configurations map here explicitly instead of hashing an empty
/// encoding.
pub const NO_SETTINGS_PACKAGE_ID: &str = "5ab84d6acfe1f23c4fae0ab88f26e3a396351ac9";

/// Number of digest bytes kept (40 hex chars, same width as the reserved id).
const ID_BYTES: usize = 20;

/// Deterministic identifier of one binary variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// The reserved identifier for configuration-free recipes.
    pub fn no_settings() -> Self {
        Self(NO_SETTINGS_PACKAGE_ID.to_string())
    }

    /// Parse an externally supplied identifier (e.g. a CLI filter).
    ///
    /// Identifiers become directory names, so only ASCII alphanumerics
    /// are accepted.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReqCacheError::InvalidReference {
                reference: s.to_string(),
                message: "package id must be non-empty ASCII alphanumerics".to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the reserved configuration-free identifier.
    pub fn is_no_settings(&self) -> bool {
        self.0 == NO_SETTINGS_PACKAGE_ID
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the package identifier of a build configuration.
///
/// Semantically equal configurations yield the same identifier regardless
/// of insertion order. An empty configuration yields
/// [`NO_SETTINGS_PACKAGE_ID`].
///
/// # Errors
///
/// Returns `ConfigurationError` if an entry cannot be encoded
/// unambiguously.
pub fn compute_package_id(config: &BuildConfig) -> Result<PackageId> {
    let canonical = config.canonical()?;
    if canonical.is_empty() {
        return Ok(PackageId::no_settings());
    }

    let digest = Sha256::digest(canonical.as_bytes());
    Ok(PackageId(hex::encode(&digest[..ID_BYTES])))
}
