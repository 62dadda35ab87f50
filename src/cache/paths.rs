//! Cache path resolution.
//!
//! Every cache location is derived here so the layout convention exists in
//! exactly one place:
//!
//! ```text
//! <root>/<name>/<version>/<user>/<channel>/system_reqs/system_reqs.txt
//! <root>/<name>/<version>/<user>/<channel>/package/<id>/system_reqs/system_reqs.txt
//! <root>/.locks/<key-hash>.lock
//! ```

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReqCacheError, Result};
use crate::identity::PackageId;
use crate::reference::{PackageRef, RecipeRef};

/// Directory holding a system-requirements entry.
pub const SYSTEM_REQS_DIR: &str = "system_reqs";
/// Entry file name; its existence marks the key as executed.
pub const SYSTEM_REQS_FILE: &str = "system_reqs.txt";
/// Directory holding per-package subdirectories of a recipe.
pub const PACKAGES_DIR: &str = "package";
/// Directory holding lock files, outside every recipe directory.
pub const LOCKS_DIR: &str = ".locks";

/// Where a recipe's system-requirements result is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One entry shared by every package of the recipe.
    Global,
    /// One entry per package identifier.
    Local(PackageId),
}

impl Scope {
    /// Scope for a recipe that declares (or not) global system requirements.
    pub fn for_recipe(global: bool, package_id: &PackageId) -> Self {
        if global {
            Self::Global
        } else {
            Self::Local(package_id.clone())
        }
    }

    /// The package identifier of a local scope.
    pub fn package_id(&self) -> Option<&PackageId> {
        match self {
            Self::Global => None,
            Self::Local(id) => Some(id),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Local(id) => write!(f, "package {}", id),
        }
    }
}

/// Identity of one cache slot: a recipe plus a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub recipe: RecipeRef,
    pub scope: Scope,
}

impl CacheKey {
    pub fn new(recipe: &RecipeRef, scope: &Scope) -> Self {
        Self {
            recipe: recipe.clone(),
            scope: scope.clone(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::Global => write!(f, "{}", self.recipe),
            Scope::Local(id) => write!(f, "{}:{}", self.recipe, id),
        }
    }
}

/// Maps recipes and scopes onto the cache directory tree.
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Create a layout rooted at `root`. Nothing is created on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a recipe: `<root>/<name>/<version>/<user>/<channel>`.
    pub fn recipe_dir(&self, recipe: &RecipeRef) -> PathBuf {
        let mut dir = self.root.clone();
        for (_, component) in recipe.components() {
            dir.push(component);
        }
        dir
    }

    pub fn packages_dir(&self, recipe: &RecipeRef) -> PathBuf {
        self.recipe_dir(recipe).join(PACKAGES_DIR)
    }

    pub fn package_dir(&self, recipe: &RecipeRef, package_id: &PackageId) -> PathBuf {
        self.packages_dir(recipe).join(package_id.as_str())
    }

    /// Directory containing the entry for a scope.
    pub fn entry_dir(&self, recipe: &RecipeRef, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Global => self.recipe_dir(recipe).join(SYSTEM_REQS_DIR),
            Scope::Local(id) => self.package_dir(recipe, id).join(SYSTEM_REQS_DIR),
        }
    }

    /// Resolve the entry file for a recipe and scope. Does not touch disk.
    pub fn resolve(&self, recipe: &RecipeRef, scope: &Scope) -> PathBuf {
        self.entry_dir(recipe, scope).join(SYSTEM_REQS_FILE)
    }

    /// Global entry of a recipe.
    pub fn system_reqs(&self, recipe: &RecipeRef) -> PathBuf {
        self.resolve(recipe, &Scope::Global)
    }

    /// Local entry of a package.
    pub fn system_reqs_package(&self, package: &PackageRef) -> PathBuf {
        self.resolve(&package.recipe, &Scope::Local(package.package_id.clone()))
    }

    /// Lock file guarding a cache key.
    pub fn lock_path(&self, key: &CacheKey) -> PathBuf {
        let digest = Sha256::digest(key.to_string().as_bytes());
        self.root
            .join(LOCKS_DIR)
            .join(format!("{}.lock", hex::encode(&digest[..16])))
    }

    /// Every recipe that has a directory in the cache.
    ///
    /// Directories that don't form a valid reference are ignored.
    pub fn recipes(&self) -> Result<Vec<RecipeRef>> {
        let mut recipes = Vec::new();

        for name in subdirs(&self.root)? {
            for version in subdirs(&self.root.join(&name))? {
                let version_dir = self.root.join(&name).join(&version);
                for user in subdirs(&version_dir)? {
                    for channel in subdirs(&version_dir.join(&user))? {
                        if let Ok(recipe) = RecipeRef::new(&name, &version, &user, &channel) {
                            recipes.push(recipe);
                        }
                    }
                }
            }
        }

        recipes.sort();
        Ok(recipes)
    }

    /// Package identifiers of a recipe that currently have a local entry.
    pub fn local_package_ids(&self, recipe: &RecipeRef) -> Result<Vec<PackageId>> {
        let mut ids = Vec::new();

        for dir in subdirs(&self.packages_dir(recipe))? {
            let Ok(id) = PackageId::parse(&dir) else {
                continue;
            };
            if self.entry_dir(recipe, &Scope::Local(id.clone())).exists() {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }
}

/// Names of the visible subdirectories of `dir`; empty if `dir` is missing.
fn subdirs(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ReqCacheError::cache_io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ReqCacheError::cache_io(dir, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}
