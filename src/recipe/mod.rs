//! Recipe declarations.
//!
//! A recipe file declares a package's name, version, the settings and
//! options its binaries depend on, and an optional shell command that
//! installs host-level system requirements.

pub mod installer;
pub mod schema;

pub use installer::ShellInstaller;
pub use schema::{OptionValue, Recipe, ResolvedRecipe, ANY_VALUE, RECIPE_FILE};
