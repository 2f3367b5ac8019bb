//! Interactive yes/no confirmation.
//!
//! Prompts are only shown on an interactive terminal. Asking for confirmation
//! while stdin is not a TTY is an error rather than a silent "no".

use std::io::{self, BufRead, Write};

use crossterm::tty::IsTty;
use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("confirmation requested but stdin is not a terminal")]
    NotInteractive,

    #[error("failed to read answer: {0}")]
    Io(#[from] io::Error),
}

/// Source of yes/no answers for the confirmation driver.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError>;
}

/// Asks on stderr and reads the answer from stdin.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        let stdin = io::stdin();
        if !stdin.is_tty() {
            return Err(PromptError::NotInteractive);
        }

        let mut stderr = io::stderr();
        write!(stderr, "{question}? [y/N] ")?;
        stderr.flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        Ok(parse_answer(&answer))
    }
}

/// Only an explicit `y`/`yes` (any case) counts as consent.
pub fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
