//! reqcache - Package identities and a system-requirements cache.
//!
//! reqcache derives stable package identifiers from a recipe's resolved
//! build configuration and memoizes the recipe's host-level "system
//! requirements" installer, so it runs at most once per recipe (global
//! scope) or per package (local scope), even across concurrent processes.
//!
//! # Modules
//!
//! - [`cache`] - Cache layout, per-key locks, memoized execution and pruning
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Home directory and `config.yml` loading
//! - [`error`] - Error types and result aliases
//! - [`identity`] - Build configurations and package identifiers
//! - [`recipe`] - Recipe files and the shell installer
//! - [`reference`] - Recipe references, package references and patterns
//! - [`shell`] - Shell command execution
//! - [`ui`] - Terminal output and confirmations
//!
//! # Example
//!
//! ```
//! use reqcache::cache::{CacheLayout, Scope, SystemReqsCache};
//! use reqcache::identity::{compute_package_id, BuildConfig};
//! use reqcache::reference::RecipeRef;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let cache = SystemReqsCache::new(CacheLayout::new(dir.path()));
//!
//! let recipe: RecipeRef = "zlib/1.2.11@conan/stable".parse().unwrap();
//! let config = BuildConfig::new().with_setting("os", "Linux");
//! let scope = Scope::Local(compute_package_id(&config).unwrap());
//!
//! let mut installer = || -> anyhow::Result<Option<String>> { Ok(Some("done".into())) };
//! assert_eq!(cache.ensure(&recipe, &scope, &mut installer).unwrap(), "done");
//! assert!(cache.is_cached(&recipe, &scope));
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod recipe;
pub mod reference;
pub mod shell;
pub mod ui;

pub use error::{ReqCacheError, Result};
