//! `reqcache info`: show a package's identity and cache state.

use serde::Serialize;
use std::path::PathBuf;

use crate::cache::{Scope, SystemReqsCache};
use crate::cli::args::InfoArgs;
use crate::config::LoadedConfig;
use crate::error::Result;
use crate::identity::{BuildConfig, PackageId};
use crate::reference::RecipeRef;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::install::load_and_resolve;

/// The info command implementation.
pub struct InfoCommand {
    cache: SystemReqsCache,
    args: InfoArgs,
}

/// What `info` reports, also its JSON shape.
#[derive(Debug, Serialize)]
struct PackageInfo {
    reference: RecipeRef,
    package_id: PackageId,
    scope: Scope,
    configuration: BuildConfig,
    has_system_requirements: bool,
    path: PathBuf,
    cached: bool,
}

impl InfoCommand {
    pub fn new(config: &LoadedConfig, args: InfoArgs) -> Self {
        Self {
            cache: config.cache(),
            args,
        }
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (recipe, resolved) = load_and_resolve(&self.args.configuration)?;

        let info = PackageInfo {
            path: self.cache.layout().resolve(&resolved.reference, &resolved.scope),
            cached: self.cache.is_cached(&resolved.reference, &resolved.scope),
            has_system_requirements: recipe.system_requirements.is_some(),
            reference: resolved.reference,
            package_id: resolved.package_id,
            scope: resolved.scope,
            configuration: resolved.config,
        };

        if self.args.json {
            let output = serde_json::to_string_pretty(&info).map_err(anyhow::Error::from)?;
            ui.data(&output);
            return Ok(CommandResult::success());
        }

        ui.data(&format!("Reference:  {}", info.reference));
        ui.data(&format!("Package ID: {}", info.package_id));
        ui.data(&format!("Scope:      {}", info.scope));
        ui.data(&format!("Entry:      {}", info.path.display()));
        let state = match (info.has_system_requirements, info.cached) {
            (false, _) => "none declared",
            (true, true) => "installed",
            (true, false) => "not installed",
        };
        ui.data(&format!("System requirements: {}", state));

        Ok(CommandResult::success())
    }
}
