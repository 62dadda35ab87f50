//! Home directory discovery and configuration loading.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::schema::ReqCacheConfig;
use crate::cache::{CacheLayout, SystemReqsCache};
use crate::error::{ReqCacheError, Result};

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "REQCACHE_HOME";

/// Name of the configuration file inside the home directory.
pub const CONFIG_FILE: &str = "config.yml";

/// Default cache directory name inside the home directory.
const DATA_DIR: &str = "data";

/// Resolve the home directory.
///
/// Order: explicit override, `$REQCACHE_HOME`, then `~/.reqcache`.
pub fn home_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".reqcache")
}

/// Loaded configuration together with the home it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub home: PathBuf,
    pub config: ReqCacheConfig,
}

impl LoadedConfig {
    /// Load `<home>/config.yml`, falling back to defaults if it is absent.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(CONFIG_FILE);

        let config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str(&content).map_err(|e| ReqCacheError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            debug!("No config at {}, using defaults", path.display());
            ReqCacheConfig::default()
        };

        Ok(Self {
            home: home.to_path_buf(),
            config,
        })
    }

    /// Cache root directory.
    pub fn storage_path(&self) -> PathBuf {
        match &self.config.storage_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.home.join(path),
            None => self.home.join(DATA_DIR),
        }
    }

    /// Build the system-requirements cache this configuration describes.
    pub fn cache(&self) -> SystemReqsCache {
        SystemReqsCache::new(CacheLayout::new(self.storage_path()))
            .with_lock_timeout(self.config.lock_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn explicit_home_wins() {
        let path = Path::new("/explicit/home");
        assert_eq!(home_dir(Some(path)), PathBuf::from("/explicit/home"));
    }

    #[test]
    fn missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = LoadedConfig::load(temp.path()).unwrap();

        assert_eq!(loaded.config, ReqCacheConfig::default());
        assert_eq!(loaded.storage_path(), temp.path().join("data"));
    }

    #[test]
    fn relative_storage_path_resolves_against_home() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "storage_path: cache\n").unwrap();

        let loaded = LoadedConfig::load(temp.path()).unwrap();

        assert_eq!(loaded.storage_path(), temp.path().join("cache"));
    }

    #[test]
    fn lock_timeout_reaches_cache() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "lock_timeout_secs: 5\n").unwrap();

        let loaded = LoadedConfig::load(temp.path()).unwrap();

        assert_eq!(loaded.config.lock_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(loaded.cache().layout().root(), temp.path().join("data"));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "lock_timeout_secs: [oops").unwrap();

        let err = LoadedConfig::load(temp.path()).unwrap_err();

        assert!(matches!(err, ReqCacheError::ConfigParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
