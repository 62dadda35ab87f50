//! Configuration schema.
//!
//! Configuration is stored at `<home>/config.yml`, where `<home>` is
//! `$REQCACHE_HOME` or `~/.reqcache`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReqCacheConfig {
    /// Cache root. Relative paths are resolved against the home directory.
    /// Defaults to `<home>/data`.
    pub storage_path: Option<PathBuf>,

    /// Maximum seconds to wait for a cache lock. Unset waits indefinitely.
    pub lock_timeout_secs: Option<u64>,
}

impl ReqCacheConfig {
    /// Lock timeout as a duration.
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: ReqCacheConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ReqCacheConfig::default());
        assert!(config.lock_timeout().is_none());
    }

    #[test]
    fn parses_all_fields() {
        let yaml = "storage_path: /var/cache/reqcache\nlock_timeout_secs: 30\n";
        let config: ReqCacheConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            config.storage_path,
            Some(PathBuf::from("/var/cache/reqcache"))
        );
        assert_eq!(config.lock_timeout(), Some(Duration::from_secs(30)));
    }
}
