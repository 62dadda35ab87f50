//! Non-interactive UI for pipes, scripts and CI.

use crate::error::{ReqCacheError, Result};

use super::{OutputMode, UserInterface};

/// UI implementation that never prompts.
///
/// Confirmations fail instead of guessing; callers offer a flag such as
/// `--force` to skip them.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn data(&mut self, text: &str) {
        println!("{}", text);
    }

    fn confirm(&mut self, question: &str, _default: bool) -> Result<bool> {
        Err(ReqCacheError::configuration(format!(
            "Cannot ask '{}' in non-interactive mode",
            question
        )))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
