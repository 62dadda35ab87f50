//! Cache entry listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::paths::Scope;
use super::system_reqs::SystemReqsCache;
use crate::error::{ReqCacheError, Result};
use crate::reference::RecipeRef;

/// A system-requirements entry found on disk.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    /// Recipe the entry belongs to.
    pub recipe: RecipeRef,
    /// Global or per-package.
    pub scope: Scope,
    /// Path to the entry file.
    pub path: PathBuf,
    /// Size in bytes; zero for installers that returned nothing.
    pub size_bytes: u64,
    /// When the entry was written, if the filesystem reports it.
    pub modified: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Age of this entry, if its modification time is known.
    pub fn age(&self) -> Option<chrono::Duration> {
        self.modified
            .map(|modified| Utc::now().signed_duration_since(modified))
    }
}

impl SystemReqsCache {
    /// List every entry in the cache, global entries first per recipe.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        for recipe in self.layout().recipes()? {
            let mut scopes = vec![Scope::Global];
            scopes.extend(
                self.layout()
                    .local_package_ids(&recipe)?
                    .into_iter()
                    .map(Scope::Local),
            );

            for scope in scopes {
                let path = self.layout().resolve(&recipe, &scope);
                let metadata = match fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                    Err(e) => return Err(ReqCacheError::cache_io(path, e)),
                };

                entries.push(CacheEntry {
                    recipe: recipe.clone(),
                    scope,
                    path,
                    size_bytes: metadata.len(),
                    modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                });
            }
        }

        Ok(entries)
    }

    /// Total size of all entries in bytes.
    pub fn total_size(&self) -> Result<u64> {
        Ok(self.entries()?.iter().map(|e| e.size_bytes).sum())
    }
}
