//! Detection of in-progress multi-step operations.
//!
//! Git records rebases, merges, cherry-picks, reverts and bisects as marker
//! files in its metadata directory. The layout is git's own and not a stable
//! interface, so detection is best-effort.

use std::fmt;
use std::path::Path;

use super::parse::strip_heads_prefix;
use super::GitError;

/// The repository-wide special operation, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    None,
    Rebasing,
    ApplyingPatch,
    Merging,
    CherryPicking,
    Reverting,
    Bisecting,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rebasing => "rebasing",
            Self::ApplyingPatch => "applying a patch",
            Self::Merging => "merging",
            Self::CherryPicking => "cherry-picking",
            Self::Reverting => "reverting",
            Self::Bisecting => "bisecting",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of probing the metadata directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoState {
    pub operation: Operation,
    /// Set for `rebase -i`.
    pub interactive: bool,
    /// Branch being rebased, when git recorded one.
    pub rebase_branch: Option<String>,
}

impl RepoState {
    pub fn clean() -> Self {
        Self::of(Operation::None)
    }

    pub fn of(operation: Operation) -> Self {
        Self {
            operation,
            interactive: false,
            rebase_branch: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.operation == Operation::None
    }
}

impl fmt::Display for RepoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interactive {
            f.write_str("interactively ")?;
        }
        f.write_str(self.operation.as_str())?;
        if let Some(branch) = &self.rebase_branch {
            write!(f, " '{branch}'")?;
        }
        Ok(())
    }
}

/// Probe `git_dir` for operation markers. The first match wins.
pub fn detect(git_dir: &Path) -> Result<RepoState, GitError> {
    if !git_dir.is_dir() {
        return Err(GitError::NotAGitRepo {
            path: git_dir.to_path_buf(),
        });
    }

    let rebase_merge = git_dir.join("rebase-merge");
    if rebase_merge.is_dir() {
        return Ok(RepoState {
            operation: Operation::Rebasing,
            interactive: rebase_merge.join("interactive").exists(),
            rebase_branch: read_head_name(&rebase_merge),
        });
    }

    let rebase_apply = git_dir.join("rebase-apply");
    if rebase_apply.is_dir() {
        if rebase_apply.join("applying").exists() {
            return Ok(RepoState::of(Operation::ApplyingPatch));
        }
        return Ok(RepoState {
            operation: Operation::Rebasing,
            interactive: false,
            rebase_branch: read_head_name(&rebase_apply),
        });
    }

    let markers = [
        ("MERGE_HEAD", Operation::Merging),
        ("CHERRY_PICK_HEAD", Operation::CherryPicking),
        ("REVERT_HEAD", Operation::Reverting),
        ("BISECT_LOG", Operation::Bisecting),
    ];
    for (marker, operation) in markers {
        if git_dir.join(marker).exists() {
            return Ok(RepoState::of(operation));
        }
    }

    Ok(RepoState::clean())
}

fn read_head_name(rebase_dir: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(rebase_dir.join("head-name")).ok()?;
    let name = strip_heads_prefix(&contents);
    // A rebase started on a detached HEAD records "detached HEAD".
    if name.is_empty() || name == "detached HEAD" {
        return None;
    }
    Some(name.to_string())
}
