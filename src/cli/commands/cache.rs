//! Cache command implementation.
//!
//! Provides `reqcache cache list` and `reqcache cache path`.

use clap::{Args, Subcommand};

use crate::cache::SystemReqsCache;
use crate::config::LoadedConfig;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached system-requirements entries.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the cache root directory.
    Path,
}

/// The cache command implementation.
pub struct CacheCommand {
    cache: SystemReqsCache,
    args: CacheArgs,
}

impl CacheCommand {
    pub fn new(config: &LoadedConfig, args: CacheArgs) -> Self {
        Self {
            cache: config.cache(),
            args,
        }
    }
}

impl Command for CacheCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            CacheSubcommand::List { json } => list_entries(&self.cache, *json, ui)?,
            CacheSubcommand::Path => {
                ui.data(&self.cache.layout().root().display().to_string());
            }
        }
        Ok(CommandResult::success())
    }
}

fn list_entries(cache: &SystemReqsCache, json: bool, ui: &mut dyn UserInterface) -> Result<()> {
    let entries = cache.entries()?;

    if json {
        let output = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
        ui.data(&output);
        return Ok(());
    }

    if entries.is_empty() {
        ui.message("Cache is empty");
        return Ok(());
    }

    for entry in &entries {
        let age = entry
            .age()
            .map(format_age)
            .unwrap_or_else(|| "?".to_string());
        ui.data(&format!(
            "{}  {}  {} bytes  {} ago",
            entry.recipe, entry.scope, entry.size_bytes, age
        ));
    }

    let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
    ui.message(&format!("{} entries, {} bytes", entries.len(), total));
    Ok(())
}

/// Coarse age, largest unit only.
fn format_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds().max(0);

    if secs >= 86400 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
