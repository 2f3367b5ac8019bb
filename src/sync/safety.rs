use std::fmt;

use crate::git::{Git, GitError, RepoState};

/// Why switching away from the current branch is not safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsafeReason {
    /// A rebase, merge, cherry-pick, revert or bisect is in progress.
    InOperation(RepoState),
    /// The working tree or index holds uncommitted modifications.
    Uncommitted { staged: bool, unstaged: bool },
}

impl UnsafeReason {
    /// An in-progress operation must be finished or aborted; uncommitted
    /// changes must be committed or stashed.
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::InOperation(_))
    }
}

impl fmt::Display for UnsafeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InOperation(state) => {
                write!(f, "{state} in progress, finish or abort it first")
            }
            Self::Uncommitted { staged, unstaged } => {
                let what = match (staged, unstaged) {
                    (true, true) => "staged and unstaged",
                    (true, false) => "staged",
                    _ => "unstaged",
                };
                write!(f, "{what} changes, commit or stash them first")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Unsafe(UnsafeReason),
}

impl Safety {
    pub fn reason(&self) -> Option<&UnsafeReason> {
        match self {
            Self::Safe => None,
            Self::Unsafe(reason) => Some(reason),
        }
    }
}

/// Decide whether the checked-out branch may be switched away from.
///
/// An in-progress operation is reported before uncommitted changes, since a
/// half-finished rebase usually also leaves the tree dirty.
pub async fn check_current_branch<G: Git>(git: &G) -> Result<Safety, GitError> {
    let state = git.operation_state()?;
    if !state.is_clean() {
        return Ok(Safety::Unsafe(UnsafeReason::InOperation(state)));
    }

    let unstaged = git.has_unstaged_changes().await?;
    let staged = git.has_staged_changes().await?;
    if staged || unstaged {
        return Ok(Safety::Unsafe(UnsafeReason::Uncommitted { staged, unstaged }));
    }

    Ok(Safety::Safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Operation;
    use crate::sync::testing::FakeGit;

    #[tokio::test]
    async fn clean_repository_is_safe() {
        let git = FakeGit::new("master", &["master"]);
        assert_eq!(check_current_branch(&git).await.unwrap(), Safety::Safe);
    }

    #[tokio::test]
    async fn mid_rebase_is_unsafe_with_rebasing_reason() {
        let state = RepoState {
            operation: Operation::Rebasing,
            interactive: false,
            rebase_branch: Some("dev".into()),
        };
        let git = FakeGit::new("master", &["master"]).state(state);

        let safety = check_current_branch(&git).await.unwrap();

        let reason = safety.reason().expect("should be unsafe");
        assert!(reason.is_operation());
        assert!(reason.to_string().contains("rebasing"), "got: {reason}");
        assert_eq!(
            reason.to_string(),
            "rebasing 'dev' in progress, finish or abort it first"
        );
    }

    #[tokio::test]
    async fn operation_wins_over_uncommitted_changes() {
        let git = FakeGit::new("master", &["master"])
            .state(RepoState::of(Operation::Merging))
            .dirty(true, true);

        let safety = check_current_branch(&git).await.unwrap();

        assert_eq!(
            safety,
            Safety::Unsafe(UnsafeReason::InOperation(RepoState::of(Operation::Merging)))
        );
    }

    #[tokio::test]
    async fn staged_and_unstaged_are_independent_checks() {
        for (staged, unstaged, expected) in [
            (true, false, "staged changes, commit or stash them first"),
            (false, true, "unstaged changes, commit or stash them first"),
            (true, true, "staged and unstaged changes, commit or stash them first"),
        ] {
            let git = FakeGit::new("master", &["master"]).dirty(staged, unstaged);
            let safety = check_current_branch(&git).await.unwrap();
            let reason = safety.reason().expect("should be unsafe");
            assert!(!reason.is_operation());
            assert_eq!(reason.to_string(), expected);
        }
    }
}
