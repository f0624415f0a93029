//! Yes/no confirmation before irreversible or billable work.

use dialoguer::Confirm;

use crate::errors::{Result, SynthesiaError};

pub trait Prompter: Send + Sync {
    /// Ask a yes/no question; `default` is taken on a bare Enter.
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;
}

/// Interactive terminal prompt.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| SynthesiaError::Prompt(e.to_string()))
    }
}

/// Ask, and turn a "no" into [`SynthesiaError::Aborted`].
pub fn require_confirmation(prompter: &dyn Prompter, question: &str) -> Result<()> {
    if prompter.confirm(question, false)? {
        Ok(())
    } else {
        Err(SynthesiaError::Aborted(question.to_string()))
    }
}
