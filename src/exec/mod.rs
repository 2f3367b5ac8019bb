//! Mutating git commands and the single place that decides whether they run.

use tracing::{debug, info};

use crate::git::cli::render;
use crate::git::{Git, GitError};

pub mod prompt;

pub use prompt::{Prompt, PromptError, TerminalPrompt};

/// A mutating git invocation together with a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    pub description: String,
    pub args: Vec<String>,
}

impl GitCommand {
    pub fn new<I, S>(description: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fetch(remote: &str, prune: bool) -> Self {
        let mut args = vec!["fetch"];
        if prune {
            args.push("--prune");
        }
        args.push(remote);
        Self::new(format!("Fetch from {remote}"), args)
    }

    pub fn checkout(branch: &str) -> Self {
        Self::new(format!("Check out {branch}"), ["checkout", branch])
    }

    /// Pull `remote/branch` into the checked-out branch. The reconcile mode is
    /// always explicit so git never stops to ask how to handle divergence.
    pub fn pull(remote: &str, branch: &str, rebase: bool) -> Self {
        let (mode, verb) = if rebase {
            ("--rebase", "Rebase")
        } else {
            ("--no-rebase", "Merge")
        };
        Self::new(
            format!("{verb} {branch} onto {remote}/{branch}"),
            ["pull", mode, remote, branch],
        )
    }

    /// The command as it would be typed in a shell.
    pub fn command_line(&self) -> String {
        render(&self.args)
    }
}

/// How submitted commands are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    DryRun,
    Confirm,
}

/// What happened to a submitted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed { exit_code: i32 },
    /// Printed instead of run.
    DryRun,
    /// The operator answered no.
    Declined,
}

impl Outcome {
    /// Whether callers should proceed as if the command took effect.
    pub fn went_ahead(&self) -> bool {
        matches!(self, Self::Succeeded | Self::DryRun)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Applies the dry-run/confirm/execute policy to every mutating command.
pub struct Driver<P> {
    mode: Mode,
    prompt: P,
}

impl<P: Prompt> Driver<P> {
    pub fn new(mode: Mode, prompt: P) -> Self {
        Self { mode, prompt }
    }

    pub async fn submit<G: Git>(&mut self, git: &G, cmd: &GitCommand) -> Result<Outcome, ExecError> {
        let line = cmd.command_line();
        match self.mode {
            Mode::DryRun => {
                eprintln!("would run: {line}");
                return Ok(Outcome::DryRun);
            }
            Mode::Confirm => {
                if !self.prompt.confirm(&format!("{} ({line})", cmd.description))? {
                    info!(command = %line, "declined");
                    return Ok(Outcome::Declined);
                }
            }
            Mode::Execute => {}
        }

        let output = git.run(&cmd.args).await?;
        if output.success() {
            Ok(Outcome::Succeeded)
        } else {
            debug!(
                command = %line,
                exit_code = output.exit_code,
                stderr = %output.stderr.trim(),
                "command failed"
            );
            Ok(Outcome::Failed {
                exit_code: output.exit_code,
            })
        }
    }
}
