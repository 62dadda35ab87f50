//! Configuration loading.
//!
//! - [`loader`] - Home directory discovery and `config.yml` loading
//! - [`schema`] - Configuration structure

pub mod loader;
pub mod schema;

pub use loader::{home_dir, LoadedConfig, CONFIG_FILE, HOME_ENV};
pub use schema::ReqCacheConfig;
