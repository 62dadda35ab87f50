//! Recipe references, package references, and reference patterns.

pub mod pattern;
pub mod recipe_ref;

pub use pattern::RefPattern;
pub use recipe_ref::{PackageRef, RecipeRef};
