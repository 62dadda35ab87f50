//! Shell-command installers.

use anyhow::Context;
use std::path::PathBuf;

use crate::cache::Installer;
use crate::error::ReqCacheError;
use crate::shell::{execute, CommandOptions};

/// Runs a recipe's system-requirements command through the platform shell.
///
/// Standard output becomes the cached result; standard error is shown to
/// the user as the command runs.
#[derive(Debug, Clone)]
pub struct ShellInstaller {
    command: String,
    cwd: Option<PathBuf>,
}

impl ShellInstaller {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: None,
        }
    }

    /// Run the command from `dir` (usually the recipe's directory).
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Installer for ShellInstaller {
    fn install(&mut self) -> anyhow::Result<Option<String>> {
        let options = CommandOptions {
            cwd: self.cwd.clone(),
            capture_stdout: true,
            capture_stderr: false,
            ..Default::default()
        };

        let result = execute(&self.command, &options)
            .with_context(|| format!("Could not start '{}'", self.command))?;

        if !result.success {
            return Err(ReqCacheError::CommandFailed {
                command: self.command.clone(),
                code: result.exit_code,
            }
            .into());
        }

        Ok(Some(result.stdout))
    }
}
