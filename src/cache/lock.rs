//! Cross-process advisory locks on cache keys.
//!
//! A lock is an exclusive `flock`-style lock on a file under the cache's
//! lock directory. The OS releases it when the file descriptor closes, so
//! a crashed process never leaves a key locked.

use fs4::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ReqCacheError, Result};

/// Interval between attempts while waiting with a timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exclusive lock on one cache key, released on drop.
#[derive(Debug)]
pub struct KeyLock {
    _file: File,
    key: String,
    path: PathBuf,
}

impl KeyLock {
    /// Acquire the lock stored at `path` for `key`.
    ///
    /// With `timeout = None` this blocks until the lock is free. Otherwise
    /// it polls until `timeout` elapses and then fails with `LockTimeout`.
    pub fn acquire(path: &Path, key: &str, timeout: Option<Duration>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReqCacheError::cache_io(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| ReqCacheError::cache_io(path, e))?;

        match timeout {
            None => {
                file.lock_exclusive()
                    .map_err(|e| ReqCacheError::cache_io(path, e))?;
            }
            Some(timeout) => {
                let start = Instant::now();
                loop {
                    match file.try_lock_exclusive() {
                        Ok(()) => break,
                        Err(e) if e.kind() == ErrorKind::WouldBlock => {
                            if start.elapsed() >= timeout {
                                return Err(ReqCacheError::LockTimeout {
                                    key: key.to_string(),
                                    waited: start.elapsed(),
                                });
                            }
                            thread::sleep(POLL_INTERVAL);
                        }
                        Err(e) => return Err(ReqCacheError::cache_io(path, e)),
                    }
                }
            }
        }

        debug!("Acquired cache lock for {}", key);
        Ok(Self {
            _file: file,
            key: key.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Key this lock guards.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        debug!("Released cache lock for {}", self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_creates_lock_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".locks").join("k.lock");

        let lock = KeyLock::acquire(&path, "k", None).unwrap();

        assert!(path.exists());
        assert_eq!(lock.key(), "k");
        assert_eq!(lock.path(), path);
    }

    #[test]
    fn held_lock_times_out_second_acquire() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("k.lock");

        let _held = KeyLock::acquire(&path, "k", None).unwrap();
        let result = KeyLock::acquire(&path, "k", Some(Duration::from_millis(100)));

        assert!(matches!(result, Err(ReqCacheError::LockTimeout { .. })));
    }

    #[test]
    fn dropped_lock_can_be_reacquired() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("k.lock");

        drop(KeyLock::acquire(&path, "k", None).unwrap());
        let again = KeyLock::acquire(&path, "k", Some(Duration::from_millis(100)));

        assert!(again.is_ok());
    }

    #[test]
    fn different_keys_do_not_contend() {
        let temp = TempDir::new().unwrap();

        let _a = KeyLock::acquire(&temp.path().join("a.lock"), "a", None).unwrap();
        let b = KeyLock::acquire(
            &temp.path().join("b.lock"),
            "b",
            Some(Duration::from_millis(100)),
        );

        assert!(b.is_ok());
    }
}
