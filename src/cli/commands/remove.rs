//! `reqcache remove`: prune cached system requirements.

use crate::cache::{PackageSelector, SystemReqsCache};
use crate::cli::args::RemoveArgs;
use crate::config::LoadedConfig;
use crate::error::{ReqCacheError, Result};
use crate::identity::PackageId;
use crate::reference::RefPattern;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The remove command implementation.
pub struct RemoveCommand {
    cache: SystemReqsCache,
    args: RemoveArgs,
}

impl RemoveCommand {
    pub fn new(config: &LoadedConfig, args: RemoveArgs) -> Self {
        Self {
            cache: config.cache(),
            args,
        }
    }

    /// No `-p` removes everything; a bare `-p` keeps the global entry.
    fn selector(&self) -> Result<PackageSelector> {
        match &self.args.packages {
            None => Ok(PackageSelector::Everything),
            Some(ids) if ids.is_empty() => Ok(PackageSelector::AllLocal),
            Some(ids) => Ok(PackageSelector::Ids(
                ids.iter()
                    .map(|id| PackageId::parse(id))
                    .collect::<Result<Vec<_>>>()?,
            )),
        }
    }
}

impl Command for RemoveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let pattern = RefPattern::new(&self.args.pattern)?;
        let selector = self.selector()?;

        let matched: Vec<_> = self
            .cache
            .layout()
            .recipes()?
            .into_iter()
            .filter(|r| pattern.matches(r))
            .collect();

        if matched.is_empty() {
            ui.warning(&format!("No cached recipes match '{}'", pattern.as_str()));
            return Ok(CommandResult::success());
        }

        if !self.args.force {
            if !ui.is_interactive() {
                return Err(ReqCacheError::ConfirmationRequired {
                    action: "remove cached entries".to_string(),
                });
            }
            let what = match &selector {
                PackageSelector::Everything => "all system requirements",
                PackageSelector::AllLocal => "package system requirements",
                PackageSelector::Ids(_) => "the selected packages' system requirements",
            };
            let question = format!(
                "Remove {} of {} recipe(s) matching '{}'?",
                what,
                matched.len(),
                pattern.as_str()
            );
            if !ui.confirm(&question, false)? {
                ui.message("Cancelled");
                return Ok(CommandResult::success());
            }
        }

        let report = self.cache.prune(&pattern, &selector)?;

        if ui.output_mode().shows_details() {
            for path in &report.removed {
                ui.message(&format!("  removed {}", path.display()));
            }
        }
        ui.success(&format!(
            "Removed {} entries from {} recipe(s)",
            report.removed.len(),
            report.recipes.len()
        ));

        Ok(CommandResult::success())
    }
}
