//! `reqcache install`: resolve a package and ensure its system requirements.

use crate::cache::{Installer, Outcome, SystemReqsCache};
use crate::cli::args::{ConfigurationArgs, InstallArgs};
use crate::config::LoadedConfig;
use crate::error::Result;
use crate::recipe::{Recipe, ResolvedRecipe, ShellInstaller};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    cache: SystemReqsCache,
    args: InstallArgs,
}

impl InstallCommand {
    pub fn new(config: &LoadedConfig, args: InstallArgs) -> Self {
        Self {
            cache: config.cache(),
            args,
        }
    }
}

/// Load a recipe and resolve it with the given configuration flags.
pub(super) fn load_and_resolve(args: &ConfigurationArgs) -> Result<(Recipe, ResolvedRecipe)> {
    let recipe = Recipe::load(&args.recipe)?;
    let resolved = recipe.resolve(
        &args.user_channel,
        &args.settings_map(),
        &args.options_map(),
        &args.requires,
    )?;
    Ok((recipe, resolved))
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (recipe, resolved) = load_and_resolve(&self.args.configuration)?;
        let reference = &resolved.reference;

        ui.message(&format!("{}: Package ID {}", reference, resolved.package_id));

        let Some(command) = recipe.system_requirements.as_deref() else {
            ui.message(&format!("{}: No system requirements declared", reference));
            return Ok(CommandResult::success());
        };

        let mut shell = ShellInstaller::new(command);
        if let Some(dir) = recipe_dir(&self.args.configuration) {
            shell = shell.in_dir(dir);
        }

        let ensured = {
            let mut installer = || -> anyhow::Result<Option<String>> {
                ui.message(&format!("Running system requirements for {}", reference));
                shell.install()
            };
            self.cache
                .ensure_with_outcome(reference, &resolved.scope, &mut installer)?
        };

        match ensured.outcome {
            Outcome::Installed => ui.success(&format!(
                "Stored system requirements for {} ({})",
                reference, resolved.scope
            )),
            Outcome::Cached => {
                if ui.output_mode().shows_details() {
                    ui.message(&format!(
                        "System requirements already cached at {}",
                        ensured.path.display()
                    ));
                }
            }
        }

        if ui.output_mode().shows_details() && !ensured.output.is_empty() {
            ui.message(ensured.output.trim_end());
        }

        Ok(CommandResult::success())
    }
}

/// Directory the system-requirements command runs in.
fn recipe_dir(args: &ConfigurationArgs) -> Option<std::path::PathBuf> {
    if args.recipe.is_dir() {
        Some(args.recipe.clone())
    } else {
        args.recipe
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::ui::{MockUI, OutputMode};
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const RECIPE: &str = r#"
name: Test
version: "0.1"
options:
  myopt: [true, false]
default_options:
  myopt: true
system_requirements: echo "Installed my stuff"
"#;

    fn install(
        home: &Path,
        recipe_dir: &Path,
        extra: &[&str],
        ui: &mut MockUI,
    ) -> Result<CommandResult> {
        let recipe = recipe_dir.display().to_string();
        let mut argv = vec!["reqcache", "install", recipe.as_str(), "user/testing"];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Install(args) = cli.command else {
            unreachable!()
        };
        let config = LoadedConfig::load(home).unwrap();
        InstallCommand::new(&config, args).execute(ui)
    }

    fn setup() -> (TempDir, TempDir) {
        let home = TempDir::new().unwrap();
        let recipe = TempDir::new().unwrap();
        fs::write(recipe.path().join("reqcache.yml"), RECIPE).unwrap();
        (home, recipe)
    }

    #[test]
    fn runs_once_then_skips() {
        let (home, recipe) = setup();

        let mut first = MockUI::new();
        install(home.path(), recipe.path(), &[], &mut first).unwrap();
        assert!(first.has_message("Running system requirements for Test/0.1@user/testing"));
        assert!(first.has_success("Stored system requirements"));

        let mut second = MockUI::new();
        install(home.path(), recipe.path(), &[], &mut second).unwrap();
        assert!(!second.has_message("Running system requirements"));
        assert!(second.successes().is_empty());
    }

    #[test]
    fn other_option_runs_again() {
        let (home, recipe) = setup();

        install(home.path(), recipe.path(), &[], &mut MockUI::new()).unwrap();

        let mut ui = MockUI::new();
        install(home.path(), recipe.path(), &["-o", "myopt=False"], &mut ui).unwrap();
        assert!(ui.has_message("Running system requirements"));
    }

    #[test]
    fn verbose_shows_output() {
        let (home, recipe) = setup();
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        install(home.path(), recipe.path(), &[], &mut ui).unwrap();

        assert!(ui.has_message("Installed my stuff"));
    }

    #[test]
    fn failing_command_leaves_no_entry() {
        let home = TempDir::new().unwrap();
        let recipe = TempDir::new().unwrap();
        fs::write(
            recipe.path().join("reqcache.yml"),
            "name: Broken\nversion: \"1.0\"\nsystem_requirements: exit 3\n",
        )
        .unwrap();

        let result = install(home.path(), recipe.path(), &[], &mut MockUI::new());

        assert!(result.is_err());
        let config = LoadedConfig::load(home.path()).unwrap();
        assert!(config.cache().entries().unwrap().is_empty());
    }

    #[test]
    fn recipe_without_system_requirements() {
        let home = TempDir::new().unwrap();
        let recipe = TempDir::new().unwrap();
        fs::write(
            recipe.path().join("reqcache.yml"),
            "name: Plain\nversion: \"1.0\"\n",
        )
        .unwrap();
        let mut ui = MockUI::new();

        install(home.path(), recipe.path(), &[], &mut ui).unwrap();

        assert!(ui.has_message("No system requirements declared"));
        assert!(!home.path().join("data").exists());
    }
}
