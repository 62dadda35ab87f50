//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::HOME_ENV;
use crate::reference::PackageRef;

use super::commands::cache::CacheArgs;

/// reqcache - Package identities and a system-requirements cache.
#[derive(Debug, Parser)]
#[command(name = "reqcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Home directory holding config.yml and the cache
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a recipe's package and ensure its system requirements
    Install(InstallArgs),

    /// Show a recipe's package identity and cache state
    Info(InfoArgs),

    /// Remove cached system requirements of matching recipes
    Remove(RemoveArgs),

    /// Inspect the cache
    Cache(CacheArgs),
}

/// Recipe plus the configuration it is resolved with.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigurationArgs {
    /// Recipe file or directory containing reqcache.yml
    pub recipe: PathBuf,

    /// User and channel, e.g. `user/testing`
    pub user_channel: String,

    /// Setting value (repeatable)
    #[arg(short, long = "setting", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub settings: Vec<(String, String)>,

    /// Option value (repeatable)
    #[arg(short, long = "option", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub options: Vec<(String, String)>,

    /// Resolved requirement package reference (repeatable)
    #[arg(short, long = "require", value_name = "REF:ID")]
    pub requires: Vec<PackageRef>,
}

impl ConfigurationArgs {
    pub fn settings_map(&self) -> BTreeMap<String, String> {
        self.settings.iter().cloned().collect()
    }

    pub fn options_map(&self) -> BTreeMap<String, String> {
        self.options.iter().cloned().collect()
    }
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub configuration: ConfigurationArgs,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub configuration: ConfigurationArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remove` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveArgs {
    /// Recipe reference or glob, e.g. `Test/*@user/*`
    pub pattern: String,

    /// Only remove package entries; with ids, only those packages
    #[arg(short, long, num_args = 0.., value_name = "ID")]
    pub packages: Option<Vec<String>>,

    /// Don't prompt for confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Parse a `NAME=VALUE` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if name.trim().is_empty() {
        return Err(format!("missing name in '{}'", s));
    }
    Ok((name.trim().to_string(), value.to_string()))
}
