//! Branch synchronization against a single remote.

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::info;

use crate::exec::{Driver, ExecError, GitCommand, Outcome, Prompt};
use crate::git::{Git, GitError};
use crate::output::Palette;

pub mod classify;
pub mod report;
pub mod safety;
pub mod update;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::BranchStatus;
pub use report::{BranchReport, Report};
pub use safety::{Safety, UnsafeReason};
pub use update::UpdateSummary;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("repository has no remotes")]
    NoRemotes,

    #[error("remote '{requested}' does not exist (available: {})", .available.join(", "))]
    UnknownRemote {
        requested: String,
        available: Vec<String>,
    },

    #[error("multiple remotes, choose one with --remote: {}", .0.join(", "))]
    AmbiguousRemote(Vec<String>),

    #[error("cannot update branches while on '{branch}': {reason}")]
    Unsafe {
        branch: String,
        reason: UnsafeReason,
    },

    #[error("fetch from '{remote}' failed with exit code {exit_code}")]
    FetchFailed { remote: String, exit_code: i32 },

    #[error("invalid branch pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}

/// Caller choices for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Check out and pull branches that are behind.
    pub update: bool,
    /// Also pull branches reported as ahead or diverged.
    pub force_all: bool,
    /// Pull with `--rebase` instead of merging.
    pub rebase: bool,
    /// Fetch with `--prune`.
    pub prune: bool,
    /// Glob patterns of branches never checked out by an update.
    pub exclude: Vec<String>,
}

/// Everything an operation needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct Context {
    pub remote: String,
    pub options: SyncOptions,
    pub palette: Palette,
    exclude: GlobSet,
}

impl Context {
    pub fn new(remote: String, options: SyncOptions, palette: Palette) -> Result<Self, SyncError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &options.exclude {
            let glob = Glob::new(pattern).map_err(|source| SyncError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let exclude = builder.build().map_err(|source| SyncError::InvalidPattern {
            pattern: options.exclude.join(", "),
            source,
        })?;

        Ok(Self {
            remote,
            options,
            palette,
            exclude,
        })
    }

    pub fn is_excluded(&self, branch: &str) -> bool {
        self.exclude.is_match(branch)
    }
}

/// Pick the remote to sync against.
///
/// A requested remote must exist. Without one, the repository must have
/// exactly one remote.
pub fn choose_remote(remotes: &[String], requested: Option<&str>) -> Result<String, SyncError> {
    if remotes.is_empty() {
        return Err(SyncError::NoRemotes);
    }

    match requested {
        Some(name) if remotes.iter().any(|r| r == name) => Ok(name.to_string()),
        Some(name) => Err(SyncError::UnknownRemote {
            requested: name.to_string(),
            available: remotes.to_vec(),
        }),
        None if remotes.len() == 1 => Ok(remotes[0].clone()),
        None => Err(SyncError::AmbiguousRemote(remotes.to_vec())),
    }
}

pub async fn select_remote<G: Git>(git: &G, requested: Option<&str>) -> Result<String, SyncError> {
    let remotes = git.remotes().await?;
    choose_remote(&remotes, requested)
}

/// Fetch from the selected remote. Failure is fatal; a declined fetch leaves
/// the remote-tracking refs as they are.
pub async fn fetch<G: Git, P: Prompt>(
    git: &G,
    driver: &mut Driver<P>,
    ctx: &Context,
) -> Result<(), SyncError> {
    let cmd = GitCommand::fetch(&ctx.remote, ctx.options.prune);
    match driver.submit(git, &cmd).await? {
        Outcome::Failed { exit_code } => Err(SyncError::FetchFailed {
            remote: ctx.remote.clone(),
            exit_code,
        }),
        Outcome::Declined => {
            info!(remote = %ctx.remote, "fetch skipped, using existing remote-tracking refs");
            Ok(())
        }
        Outcome::Succeeded | Outcome::DryRun => Ok(()),
    }
}
