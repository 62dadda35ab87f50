//! Recipe file schema and configuration resolution.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::Scope;
use crate::error::{ReqCacheError, Result};
use crate::identity::{compute_package_id, BuildConfig, PackageId};
use crate::reference::{PackageRef, RecipeRef};

/// File name looked up when a directory is given instead of a file.
pub const RECIPE_FILE: &str = "reqcache.yml";

/// Allowed-values marker accepting any option value.
pub const ANY_VALUE: &str = "ANY";

/// An option value as written in YAML.
///
/// Booleans are normalized to `True`/`False` and numbers to their
/// decimal text, so `shared: [true, false]` and
/// `shared: ["True", "False"]` declare the same option.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionValue(String);

impl OptionValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Bool(bool),
            Int(i64),
            Float(f64),
            Str(String),
        }

        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Bool(true) => Self::new("True"),
            Scalar::Bool(false) => Self::new("False"),
            Scalar::Int(n) => Self::new(n.to_string()),
            Scalar::Float(n) => Self::new(n.to_string()),
            Scalar::Str(s) => Self::new(s),
        })
    }
}

/// A recipe declaration.
///
/// # Example
///
/// ```yaml
/// name: Test
/// version: "0.1"
/// settings: [os, arch]
/// options:
///   myopt: [true, false]
/// default_options:
///   myopt: true
/// global_system_requirements: false
/// system_requirements: "apt-get install -y libfoo"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub version: String,

    /// Names of the settings binaries of this recipe depend on.
    #[serde(default)]
    pub settings: Vec<String>,

    /// Option name to allowed values (`ANY` accepts anything).
    #[serde(default)]
    pub options: BTreeMap<String, Vec<OptionValue>>,

    /// Default value for each option.
    #[serde(default)]
    pub default_options: BTreeMap<String, OptionValue>,

    /// Share one system-requirements result across all packages.
    #[serde(default)]
    pub global_system_requirements: bool,

    /// Shell command installing host dependencies; its stdout is cached.
    #[serde(default)]
    pub system_requirements: Option<String>,
}

/// A recipe with its configuration resolved for one install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipe {
    pub reference: RecipeRef,
    pub config: BuildConfig,
    pub package_id: PackageId,
    pub scope: Scope,
}

impl ResolvedRecipe {
    pub fn package_ref(&self) -> PackageRef {
        PackageRef::new(self.reference.clone(), self.package_id.clone())
    }
}

impl Recipe {
    /// Load a recipe from a file, or from `<dir>/reqcache.yml`.
    pub fn load(path: &Path) -> Result<Self> {
        let path: PathBuf = if path.is_dir() {
            path.join(RECIPE_FILE)
        } else {
            path.to_path_buf()
        };

        if !path.exists() {
            return Err(ReqCacheError::ConfigNotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|message| ReqCacheError::ConfigParseError {
            path: path.clone(),
            message,
        })
    }

    /// Parse recipe YAML.
    pub fn parse(yaml: &str) -> std::result::Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    /// Cache scope for one of this recipe's packages.
    pub fn scope(&self, package_id: &PackageId) -> Scope {
        Scope::for_recipe(self.global_system_requirements, package_id)
    }

    /// Reference of this recipe under `user/channel`.
    pub fn reference(&self, user_channel: &str) -> Result<RecipeRef> {
        let (user, channel) =
            user_channel
                .split_once('/')
                .ok_or_else(|| ReqCacheError::InvalidReference {
                    reference: user_channel.to_string(),
                    message: "expected user/channel".to_string(),
                })?;
        RecipeRef::new(&self.name, &self.version, user, channel)
    }

    /// Resolve settings, options, and requirements into a package identity.
    ///
    /// Settings the recipe doesn't declare are dropped. Options start from
    /// the defaults and are overridden by `option_overrides`; unknown
    /// options, disallowed values, and options left without a value are
    /// configuration errors.
    pub fn resolve(
        &self,
        user_channel: &str,
        settings: &BTreeMap<String, String>,
        option_overrides: &BTreeMap<String, String>,
        requires: &[PackageRef],
    ) -> Result<ResolvedRecipe> {
        let reference = self.reference(user_channel)?;
        let mut config = BuildConfig::new();

        for name in &self.settings {
            if let Some(value) = settings.get(name) {
                config.settings.insert(name.clone(), value.clone());
            }
        }

        for name in self.default_options.keys() {
            if !self.options.contains_key(name) {
                return Err(ReqCacheError::configuration(format!(
                    "default for undeclared option '{}' in {}",
                    name, self.name
                )));
            }
        }
        for name in option_overrides.keys() {
            if !self.options.contains_key(name) {
                return Err(ReqCacheError::configuration(format!(
                    "{} has no option '{}'",
                    self.name, name
                )));
            }
        }

        for (name, allowed) in &self.options {
            let value = option_overrides
                .get(name)
                .cloned()
                .or_else(|| self.default_options.get(name).map(|v| v.to_string()))
                .ok_or_else(|| {
                    ReqCacheError::configuration(format!(
                        "option '{}' of {} has no value",
                        name, self.name
                    ))
                })?;

            let accepts_any = allowed.iter().any(|v| v.as_str() == ANY_VALUE);
            if !accepts_any && !allowed.iter().any(|v| v.as_str() == value) {
                let allowed: Vec<&str> = allowed.iter().map(|v| v.as_str()).collect();
                return Err(ReqCacheError::configuration(format!(
                    "'{}' is not a valid value for option '{}' (allowed: {})",
                    value,
                    name,
                    allowed.join(", ")
                )));
            }

            config.options.insert(name.clone(), value);
        }

        for require in requires {
            config.requires.insert(require.to_string());
        }

        let package_id = compute_package_id(&config)?;
        let scope = self.scope(&package_id);

        Ok(ResolvedRecipe {
            reference,
            config,
            package_id,
            scope,
        })
    }
}
