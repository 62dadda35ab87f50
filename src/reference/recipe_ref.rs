//! Recipe and package references.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{ReqCacheError, Result};
use crate::identity::PackageId;

/// Regex every reference component must match.
///
/// Components double as directory names in the cache, so this also rules
/// out separators and `..`.
static COMPONENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_][a-zA-Z0-9_+.-]{1,50}$").expect("COMPONENT_REGEX must compile")
});

/// Identifies a recipe: `name/version@user/channel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeRef {
    name: String,
    version: String,
    user: String,
    channel: String,
}

impl RecipeRef {
    /// Create a reference, validating every component.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        user: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Self> {
        let recipe = Self {
            name: name.into(),
            version: version.into(),
            user: user.into(),
            channel: channel.into(),
        };

        for (label, value) in recipe.components() {
            if !COMPONENT_REGEX.is_match(value) {
                return Err(ReqCacheError::InvalidReference {
                    reference: recipe.to_string(),
                    message: format!(
                        "{} '{}' must be 2-51 characters of [a-zA-Z0-9_+.-] \
                         and not start with '.', '+' or '-'",
                        label, value
                    ),
                });
            }
        }

        Ok(recipe)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Components in path order, labelled for error messages.
    pub fn components(&self) -> [(&'static str, &str); 4] {
        [
            ("name", &self.name),
            ("version", &self.version),
            ("user", &self.user),
            ("channel", &self.channel),
        ]
    }
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}/{}",
            self.name, self.version, self.user, self.channel
        )
    }
}

impl FromStr for RecipeRef {
    type Err = ReqCacheError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |message: &str| ReqCacheError::InvalidReference {
            reference: s.to_string(),
            message: message.to_string(),
        };

        let (name_version, user_channel) = s
            .trim()
            .split_once('@')
            .ok_or_else(|| invalid("expected name/version@user/channel"))?;
        let (name, version) = name_version
            .split_once('/')
            .ok_or_else(|| invalid("expected name/version before '@'"))?;
        let (user, channel) = user_channel
            .split_once('/')
            .ok_or_else(|| invalid("expected user/channel after '@'"))?;

        Self::new(name, version, user, channel)
    }
}

impl Serialize for RecipeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecipeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Identifies one binary variant of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    pub recipe: RecipeRef,
    pub package_id: PackageId,
}

impl PackageRef {
    pub fn new(recipe: RecipeRef, package_id: PackageId) -> Self {
        Self { recipe, package_id }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.recipe, self.package_id)
    }
}

impl FromStr for PackageRef {
    type Err = ReqCacheError;

    fn from_str(s: &str) -> Result<Self> {
        let (recipe, id) = s
            .rsplit_once(':')
            .ok_or_else(|| ReqCacheError::InvalidReference {
                reference: s.to_string(),
                message: "expected name/version@user/channel:package_id".to_string(),
            })?;
        Ok(Self::new(recipe.parse()?, PackageId::parse(id)?))
    }
}
