//! Removal of system-requirements entries.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{CacheKey, Scope};
use super::system_reqs::SystemReqsCache;
use crate::error::{ReqCacheError, Result};
use crate::identity::PackageId;
use crate::reference::{RecipeRef, RefPattern};

/// Which entries of a matched recipe to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSelector {
    /// The global entry and every local entry.
    Everything,
    /// Every local entry; the global entry stays.
    AllLocal,
    /// Only the local entries of these packages.
    Ids(Vec<PackageId>),
}

/// What a prune removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PruneReport {
    /// Recipes that matched the pattern.
    pub recipes: Vec<RecipeRef>,
    /// Entry directories that existed and were deleted.
    pub removed: Vec<PathBuf>,
}

impl SystemReqsCache {
    /// Remove entries of every cached recipe matching `pattern`.
    ///
    /// Missing entries are skipped, so pruning twice is harmless.
    pub fn prune(&self, pattern: &RefPattern, selector: &PackageSelector) -> Result<PruneReport> {
        let mut report = PruneReport::default();

        for recipe in self.layout().recipes()? {
            if !pattern.matches(&recipe) {
                continue;
            }
            let removed = self.prune_recipe(&recipe, selector)?;
            report.removed.extend(removed);
            report.recipes.push(recipe);
        }

        info!(
            "Pruned {} entries from {} recipes matching '{}'",
            report.removed.len(),
            report.recipes.len(),
            pattern.as_str()
        );
        Ok(report)
    }

    /// Remove the selected entries of one recipe.
    pub fn prune_recipe(
        &self,
        recipe: &RecipeRef,
        selector: &PackageSelector,
    ) -> Result<Vec<PathBuf>> {
        let scopes: Vec<Scope> = match selector {
            PackageSelector::Everything => {
                let mut scopes: Vec<Scope> = self
                    .layout()
                    .local_package_ids(recipe)?
                    .into_iter()
                    .map(Scope::Local)
                    .collect();
                scopes.push(Scope::Global);
                scopes
            }
            PackageSelector::AllLocal => self
                .layout()
                .local_package_ids(recipe)?
                .into_iter()
                .map(Scope::Local)
                .collect(),
            PackageSelector::Ids(ids) => ids.iter().cloned().map(Scope::Local).collect(),
        };

        let mut removed = Vec::new();
        for scope in &scopes {
            if let Some(dir) = self.remove_entry(recipe, scope)? {
                removed.push(dir);
            }
        }

        Ok(removed)
    }

    /// Delete one entry under its key lock. Returns the directory if it existed.
    pub fn remove_entry(&self, recipe: &RecipeRef, scope: &Scope) -> Result<Option<PathBuf>> {
        let _lock = self.lock(&CacheKey::new(recipe, scope))?;
        let dir = self.layout().entry_dir(recipe, scope);

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!("Removed system requirements entry {}", dir.display());
                if let Scope::Local(id) = scope {
                    self.remove_empty_ancestors(&self.layout().package_dir(recipe, id));
                } else {
                    self.remove_empty_ancestors(&self.layout().recipe_dir(recipe));
                }
                Ok(Some(dir))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReqCacheError::cache_io(dir, e)),
        }
    }

    /// Remove `start` and its parents while they are empty, stopping at the root.
    fn remove_empty_ancestors(&self, start: &Path) {
        let root = self.layout().root();
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir == root || !dir.starts_with(root) {
                break;
            }
            if fs::remove_dir(dir).is_err() {
                break;
            }
            current = dir.parent();
        }
    }
}
