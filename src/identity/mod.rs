//! Package identity derivation.
//!
//! A [`PackageId`] is a deterministic digest of a [`BuildConfig`]: the
//! settings, options, and transitive requirement identities of a recipe,
//! normalized into a sorted canonical encoding before hashing. Empty
//! configurations collapse onto [`NO_SETTINGS_PACKAGE_ID`].

pub mod build_config;
pub mod package_id;

pub use build_config::BuildConfig;
pub use package_id::{compute_package_id, PackageId, NO_SETTINGS_PACKAGE_ID};
