//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`], which loads the home configuration once for all
//! of them.

pub mod cache;
pub mod dispatcher;
pub mod info;
pub mod install;
pub mod remove;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
