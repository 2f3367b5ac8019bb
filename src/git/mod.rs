use std::path::{Path, PathBuf};

pub mod cli;
pub mod parse;
pub mod state;

pub use cli::GitCli;
pub use state::{Operation, RepoState};

/// Information about a discovered working copy.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Root of the working tree.
    pub workdir: PathBuf,
    /// The metadata directory (`.git`, or the per-worktree directory for linked worktrees).
    pub git_dir: PathBuf,
}

/// Errors specific to git operations.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("not a git repository: {path}")]
    NotAGitRepo { path: PathBuf },

    #[error("git executable not found or not runnable")]
    NotAvailable,

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Captured result of a mutating git command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Everything the branch synchronizer needs from the version-control tool.
///
/// Refs passed to [`Git::count_commits`] and [`Git::trees_differ`] are fully
/// qualified (`refs/heads/dev`, `refs/remotes/origin/dev`).
#[allow(async_fn_in_trait)]
pub trait Git {
    /// Local branch names, in the order the tool lists them.
    async fn local_branches(&self) -> Result<Vec<String>, GitError>;

    async fn remotes(&self) -> Result<Vec<String>, GitError>;

    /// Name of the checked-out branch. Detached HEAD is an error; see
    /// [`checked_out_branch`] for the rebase-aware variant.
    async fn current_branch(&self) -> Result<String, GitError>;

    async fn has_unstaged_changes(&self) -> Result<bool, GitError>;

    async fn has_staged_changes(&self) -> Result<bool, GitError>;

    /// Branch names under `refs/remotes/<remote>/`, without the remote prefix.
    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, GitError>;

    /// Number of commits reachable from `tip` but not from `base`.
    async fn count_commits(&self, base: &str, tip: &str) -> Result<u32, GitError>;

    /// Whether the trees at `a` and `b` have different contents.
    async fn trees_differ(&self, a: &str, b: &str) -> Result<bool, GitError>;

    /// In-progress multi-step operation recorded in the metadata directory.
    fn operation_state(&self) -> Result<RepoState, GitError>;

    /// Run a mutating command. A non-zero exit is reported in the output, not as an error.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, GitError>;
}

/// The branch the working copy belongs to.
///
/// Git detaches HEAD while a rebase is stopped; the branch being rebased is
/// then taken from the rebase metadata. A detached HEAD with no rebase in
/// progress stays an error.
pub async fn checked_out_branch<G: Git>(git: &G) -> Result<String, GitError> {
    match git.current_branch().await {
        Err(GitError::DetachedHead) => git
            .operation_state()?
            .rebase_branch
            .ok_or(GitError::DetachedHead),
        other => other,
    }
}

/// Discover the working copy containing `path` by walking up the directory tree.
pub fn discover_repo(path: &Path) -> Result<RepoInfo, GitError> {
    let not_a_repo = || GitError::NotAGitRepo {
        path: path.to_path_buf(),
    };

    let repo = git2::Repository::discover(path).map_err(|_| not_a_repo())?;

    let workdir = repo
        .workdir()
        .ok_or_else(not_a_repo)?
        .canonicalize()
        .map_err(|_| not_a_repo())?;

    let git_dir = repo.path().canonicalize().map_err(|_| not_a_repo())?;

    Ok(RepoInfo { workdir, git_dir })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::FakeGit;

    /// Helper: create a temp git repo with an initial commit.
    fn init_repo_with_commit(dir: &Path) -> git2::Repository {
        let repo = git2::Repository::init(dir).expect("failed to init repo");
        {
            let sig = git2::Signature::now("Test", "test@test.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn discover_repo_finds_repo_at_root() {
        let tmp = tempfile::tempdir().unwrap();
        let _repo = init_repo_with_commit(tmp.path());

        let info = discover_repo(tmp.path()).expect("should discover repo");

        assert_eq!(info.workdir, tmp.path().canonicalize().unwrap());
        assert_eq!(info.git_dir, tmp.path().join(".git").canonicalize().unwrap());
    }

    #[test]
    fn discover_repo_finds_repo_from_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        let _repo = init_repo_with_commit(tmp.path());

        let subdir = tmp.path().join("src").join("deep");
        std::fs::create_dir_all(&subdir).unwrap();

        let info = discover_repo(&subdir).expect("should discover repo from subdir");

        assert_eq!(info.workdir, tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn discover_repo_fails_for_bare_repository() {
        let tmp = tempfile::tempdir().unwrap();
        git2::Repository::init_bare(tmp.path()).unwrap();

        let err = discover_repo(tmp.path()).unwrap_err();
        assert!(
            matches!(err, GitError::NotAGitRepo { .. }),
            "expected NotAGitRepo, got: {err:?}"
        );
    }

    #[test]
    fn discover_repo_fails_for_non_git_directory() {
        let tmp = tempfile::tempdir().unwrap();

        let result = discover_repo(tmp.path());

        let err = result.unwrap_err();
        assert!(
            matches!(err, GitError::NotAGitRepo { .. }),
            "expected NotAGitRepo, got: {err:?}"
        );
    }

    #[test]
    fn command_output_success_follows_exit_code() {
        let ok = CommandOutput::default();
        let failed = CommandOutput {
            exit_code: 128,
            ..Default::default()
        };

        assert!(ok.success());
        assert!(!failed.success());
    }

    fn rebasing(branch: Option<&str>) -> RepoState {
        RepoState {
            operation: Operation::Rebasing,
            interactive: false,
            rebase_branch: branch.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn checked_out_branch_during_rebase_is_the_rebased_branch() {
        let git = FakeGit::new("topic", &["master", "topic"]).state(rebasing(Some("topic")));

        assert!(matches!(git.current_branch().await, Err(GitError::DetachedHead)));
        assert_eq!(checked_out_branch(&git).await.unwrap(), "topic");
    }

    #[tokio::test]
    async fn rebase_of_detached_head_stays_detached() {
        let git = FakeGit::new("master", &["master"]).state(rebasing(None));

        let err = checked_out_branch(&git).await.unwrap_err();
        assert!(matches!(err, GitError::DetachedHead), "got: {err:?}");
    }

    #[tokio::test]
    async fn plain_detached_head_is_an_error() {
        let git = FakeGit::new("master", &["master"]).detached();

        let err = checked_out_branch(&git).await.unwrap_err();
        assert!(matches!(err, GitError::DetachedHead), "got: {err:?}");
    }
}
