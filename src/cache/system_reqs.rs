//! Memoized execution of system-requirements installers.
//!
//! The filesystem is the only record of what has run: an entry file that
//! exists means its key has been executed, whatever its content. There is
//! no in-memory layer, which keeps concurrent processes consistent.

use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::lock::KeyLock;
use super::paths::{CacheKey, CacheLayout, Scope};
use crate::error::{ReqCacheError, Result};
use crate::reference::RecipeRef;

/// Recipe-supplied logic that installs host-level dependencies.
///
/// Returns the text to persist; `None` is persisted as an empty entry.
pub trait Installer {
    fn install(&mut self) -> anyhow::Result<Option<String>>;
}

impl<F> Installer for F
where
    F: FnMut() -> anyhow::Result<Option<String>>,
{
    fn install(&mut self) -> anyhow::Result<Option<String>> {
        (self)()
    }
}

/// How an `ensure` call was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// An entry already existed; the installer was not invoked.
    Cached,
    /// The installer ran and its output was persisted.
    Installed,
}

/// Result of ensuring system requirements for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensured {
    pub output: String,
    pub outcome: Outcome,
    pub path: PathBuf,
}

/// System-requirements cache over a [`CacheLayout`].
#[derive(Debug, Clone)]
pub struct SystemReqsCache {
    layout: CacheLayout,
    lock_timeout: Option<Duration>,
}

impl SystemReqsCache {
    /// Create a cache that waits indefinitely for locks.
    pub fn new(layout: CacheLayout) -> Self {
        Self {
            layout,
            lock_timeout: None,
        }
    }

    /// Bound how long lock acquisition may wait.
    pub fn with_lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Take the lock guarding `key`.
    pub fn lock(&self, key: &CacheKey) -> Result<KeyLock> {
        KeyLock::acquire(
            &self.layout.lock_path(key),
            &key.to_string(),
            self.lock_timeout,
        )
    }

    /// Run `installer` unless an entry for `(recipe, scope)` exists.
    ///
    /// Returns the persisted text either way.
    pub fn ensure(
        &self,
        recipe: &RecipeRef,
        scope: &Scope,
        installer: &mut dyn Installer,
    ) -> Result<String> {
        self.ensure_with_outcome(recipe, scope, installer)
            .map(|ensured| ensured.output)
    }

    /// Like [`ensure`](Self::ensure), also reporting whether the installer ran.
    ///
    /// The key's lock is held from before the existence check until the
    /// entry is read or written. A failing installer leaves no entry behind.
    pub fn ensure_with_outcome(
        &self,
        recipe: &RecipeRef,
        scope: &Scope,
        installer: &mut dyn Installer,
    ) -> Result<Ensured> {
        let key = CacheKey::new(recipe, scope);
        let path = self.layout.resolve(recipe, scope);
        let _lock = self.lock(&key)?;

        if path.exists() {
            debug!("System requirements for {} already cached", key);
            let output = read_entry(&path)?;
            return Ok(Ensured {
                output,
                outcome: Outcome::Cached,
                path,
            });
        }

        debug!("No system requirements entry for {}, running installer", key);
        let output = installer
            .install()
            .map_err(|e| ReqCacheError::InstallerExecution {
                recipe: key.to_string(),
                message: format!("{:#}", e),
            })?
            .unwrap_or_default();

        write_entry(&path, &output)?;
        info!("Stored system requirements for {} ({})", recipe, scope);

        Ok(Ensured {
            output,
            outcome: Outcome::Installed,
            path,
        })
    }

    /// Read an entry without running anything.
    ///
    /// Entries are only ever replaced by rename, so this needs no lock.
    pub fn lookup(&self, recipe: &RecipeRef, scope: &Scope) -> Result<Option<String>> {
        let path = self.layout.resolve(recipe, scope);
        match read_entry(&path) {
            Ok(content) => Ok(Some(content)),
            Err(ReqCacheError::CacheIo { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether an entry exists for `(recipe, scope)`.
    pub fn is_cached(&self, recipe: &RecipeRef, scope: &Scope) -> bool {
        self.layout.resolve(recipe, scope).exists()
    }
}

/// Attempts at writing an entry whose parent directories are being pruned.
const WRITE_ATTEMPTS: u32 = 10;

/// Entries are decoded lossily; any existing file counts as a cache hit.
fn read_entry(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| ReqCacheError::cache_io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write-to-temp-then-rename so a partial write is never seen as present.
///
/// Ancestor directories are shared with sibling keys and may be removed by a
/// concurrent prune, so `NotFound` is retried.
fn write_entry(path: &Path, content: &str) -> Result<()> {
    let mut attempt = 1;
    loop {
        match write_entry_once(path, content) {
            Ok(()) => return Ok(()),
            Err((at, e)) if e.kind() == ErrorKind::NotFound && attempt < WRITE_ATTEMPTS => {
                debug!(
                    "{} vanished while writing entry (attempt {}), retrying",
                    at.display(),
                    attempt
                );
                attempt += 1;
            }
            Err((at, e)) => return Err(ReqCacheError::cache_io(at, e)),
        }
    }
}

fn write_entry_once(
    path: &Path,
    content: &str,
) -> std::result::Result<(), (PathBuf, std::io::Error)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| (parent.to_path_buf(), e))?;
    }

    let temp_path = path.with_extension("txt.tmp");
    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err((temp_path, e));
    }
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        (path.to_path_buf(), e)
    })
}
