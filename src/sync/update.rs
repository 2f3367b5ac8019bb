//! The guarded update procedure.
//!
//! fetch → safety check → per-branch checkout and pull → restore the original
//! branch. Branches are handled one at a time in listing order, since checkout
//! mutates the single working tree. Nothing is locked: an interrupted run
//! leaves the repository on whichever branch was checked out last.

use tracing::{debug, info, warn};

use super::classify::{classify_all, BranchStatus};
use super::safety::{check_current_branch, Safety};
use super::{fetch, Context, SyncError};
use crate::exec::{Driver, GitCommand, Outcome, Prompt};
use crate::git::{checked_out_branch, Git};

/// What an update run did to each branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Branches checked out and pulled (or that would be, in a dry run).
    pub updated: Vec<String>,
    /// Branches whose checkout or pull exited non-zero.
    pub failed: Vec<String>,
    /// Branches that needed an update but were excluded or declined.
    pub skipped: Vec<String>,
    /// Branch checked out again at the end, if any checkout happened.
    pub restored: Option<String>,
}

/// Whether a branch in this state gets checked out and pulled.
pub fn needs_update(status: BranchStatus, force_all: bool) -> bool {
    match status {
        BranchStatus::Behind(_) => true,
        BranchStatus::Ahead(_) | BranchStatus::Diverged => force_all,
        BranchStatus::UpToDate | BranchStatus::NoRemote => false,
    }
}

/// Bring every behind branch up to date with its remote counterpart.
///
/// Fails before touching any branch if the fetch fails or the current branch
/// is unsafe to leave. Individual checkout/pull failures are traced and the
/// loop moves on.
pub async fn update<G: Git, P: Prompt>(
    git: &G,
    driver: &mut Driver<P>,
    ctx: &Context,
) -> Result<UpdateSummary, SyncError> {
    let original = checked_out_branch(git).await?;

    fetch(git, driver, ctx).await?;

    if let Safety::Unsafe(reason) = check_current_branch(git).await? {
        return Err(SyncError::Unsafe {
            branch: original,
            reason,
        });
    }

    let statuses = classify_all(git, &ctx.remote).await?;

    let mut summary = UpdateSummary::default();
    let mut checked_out = false;
    let result = update_branches(git, driver, ctx, statuses, &mut summary, &mut checked_out).await;

    if checked_out {
        let restore = GitCommand::checkout(&original);
        match driver.submit(git, &restore).await {
            Ok(outcome) if outcome.went_ahead() => summary.restored = Some(original),
            Ok(outcome) => warn!(branch = %original, ?outcome, "could not restore original branch"),
            Err(err) => warn!(branch = %original, error = %err, "could not restore original branch"),
        }
    }

    result?;
    Ok(summary)
}

async fn update_branches<G: Git, P: Prompt>(
    git: &G,
    driver: &mut Driver<P>,
    ctx: &Context,
    statuses: Vec<(String, BranchStatus)>,
    summary: &mut UpdateSummary,
    checked_out: &mut bool,
) -> Result<(), SyncError> {
    for (branch, status) in statuses {
        if !needs_update(status, ctx.options.force_all) {
            debug!(%branch, status = status.label(), "no update needed");
            continue;
        }
        if ctx.is_excluded(&branch) {
            info!(%branch, "excluded from update");
            summary.skipped.push(branch);
            continue;
        }

        match driver.submit(git, &GitCommand::checkout(&branch)).await? {
            outcome if outcome.went_ahead() => *checked_out = true,
            Outcome::Declined => {
                summary.skipped.push(branch);
                continue;
            }
            outcome => {
                debug!(%branch, ?outcome, "checkout failed, skipping branch");
                summary.failed.push(branch);
                continue;
            }
        }

        let pull = GitCommand::pull(&ctx.remote, &branch, ctx.options.rebase);
        match driver.submit(git, &pull).await? {
            outcome if outcome.went_ahead() => summary.updated.push(branch),
            Outcome::Declined => summary.skipped.push(branch),
            outcome => {
                debug!(%branch, ?outcome, "pull failed, continuing with next branch");
                summary.failed.push(branch);
            }
        }
    }
    Ok(())
}
