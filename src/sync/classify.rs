use std::collections::HashSet;

use crate::git::parse::{local_ref, remote_ref};
use crate::git::{Git, GitError};

/// Relationship between a local branch and its same-named remote branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStatus {
    UpToDate,
    Ahead(u32),
    Behind(u32),
    /// Trees differ but neither side has commits the other lacks.
    Diverged,
    NoRemote,
}

impl BranchStatus {
    /// Stable machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpToDate => "up-to-date",
            Self::Ahead(_) => "ahead",
            Self::Behind(_) => "behind",
            Self::Diverged => "diverged",
            Self::NoRemote => "no-remote",
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            Self::Ahead(n) | Self::Behind(n) => *n,
            _ => 0,
        }
    }
}

/// Turn commit counts into a status.
///
/// A branch with commits on both sides is reported as ahead, and its behind
/// count is dropped.
pub fn pick_status(ahead: u32, behind: u32) -> BranchStatus {
    if ahead > 0 {
        BranchStatus::Ahead(ahead)
    } else if behind > 0 {
        BranchStatus::Behind(behind)
    } else {
        BranchStatus::Diverged
    }
}

/// Classify `branch` against `remote/branch`, which must exist.
///
/// Identical trees count as up to date even when the histories differ.
pub async fn classify<G: Git>(git: &G, remote: &str, branch: &str) -> Result<BranchStatus, GitError> {
    let local = local_ref(branch);
    let tracking = remote_ref(remote, branch);

    if !git.trees_differ(&local, &tracking).await? {
        return Ok(BranchStatus::UpToDate);
    }

    let ahead = git.count_commits(&tracking, &local).await?;
    let behind = git.count_commits(&local, &tracking).await?;
    Ok(pick_status(ahead, behind))
}

/// Classify every local branch, in the order git lists them.
pub async fn classify_all<G: Git>(
    git: &G,
    remote: &str,
) -> Result<Vec<(String, BranchStatus)>, GitError> {
    let remote_branches: HashSet<String> = git.remote_branches(remote).await?.into_iter().collect();

    let mut statuses = Vec::new();
    for branch in git.local_branches().await? {
        let status = if remote_branches.contains(&branch) {
            classify(git, remote, &branch).await?
        } else {
            BranchStatus::NoRemote
        };
        statuses.push((branch, status));
    }
    Ok(statuses)
}
