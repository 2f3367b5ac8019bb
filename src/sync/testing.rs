//! Scripted in-memory stand-ins for git and the operator.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::exec::{Prompt, PromptError};
use crate::git::parse::{local_ref, remote_ref};
use crate::git::{CommandOutput, Git, GitError, Operation, RepoState};

/// A repository whose query answers are fixed up front. Mutating commands are
/// recorded; `checkout` moves the current branch. Like git, HEAD is detached
/// while a rebase is in progress.
pub struct FakeGit {
    branches: Vec<String>,
    current: RefCell<String>,
    remotes: Vec<String>,
    remote_branches: HashMap<String, Vec<String>>,
    counts: HashMap<(String, String), u32>,
    differing: HashSet<(String, String)>,
    state: RepoState,
    staged: bool,
    unstaged: bool,
    detached: bool,
    failing: HashSet<String>,
    broken: HashSet<String>,
    log: RefCell<Vec<String>>,
}

impl FakeGit {
    pub fn new(current: &str, branches: &[&str]) -> Self {
        Self {
            branches: branches.iter().map(|b| b.to_string()).collect(),
            current: RefCell::new(current.to_string()),
            remotes: Vec::new(),
            remote_branches: HashMap::new(),
            counts: HashMap::new(),
            differing: HashSet::new(),
            state: RepoState::clean(),
            staged: false,
            unstaged: false,
            detached: false,
            failing: HashSet::new(),
            broken: HashSet::new(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Add a remote carrying the given branches, all identical to their local twins.
    pub fn remote(mut self, name: &str, branches: &[&str]) -> Self {
        self.remotes.push(name.to_string());
        self.remote_branches.insert(
            name.to_string(),
            branches.iter().map(|b| b.to_string()).collect(),
        );
        self
    }

    /// Make `branch` differ from `remote/branch` with the given commit counts.
    pub fn diverge(mut self, remote: &str, branch: &str, ahead: u32, behind: u32) -> Self {
        let local = local_ref(branch);
        let tracking = remote_ref(remote, branch);
        self.counts.insert((tracking.clone(), local.clone()), ahead);
        self.counts.insert((local.clone(), tracking.clone()), behind);
        self.differing.insert((local, tracking));
        self
    }

    pub fn behind(self, remote: &str, branch: &str, n: u32) -> Self {
        self.diverge(remote, branch, 0, n)
    }

    pub fn ahead(self, remote: &str, branch: &str, n: u32) -> Self {
        self.diverge(remote, branch, n, 0)
    }

    pub fn state(mut self, state: RepoState) -> Self {
        self.state = state;
        self
    }

    pub fn dirty(mut self, staged: bool, unstaged: bool) -> Self {
        self.staged = staged;
        self.unstaged = unstaged;
        self
    }

    /// Detach HEAD without any operation in progress.
    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    /// Make the command with these space-joined args exit non-zero.
    pub fn fail_on(mut self, command: &str) -> Self {
        self.failing.insert(command.to_string());
        self
    }

    /// Make the command with these space-joined args fail to start at all.
    pub fn break_on(mut self, command: &str) -> Self {
        self.broken.insert(command.to_string());
        self
    }

    /// Mutating commands run so far, args joined by spaces.
    pub fn commands(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }
}

impl Git for FakeGit {
    async fn local_branches(&self) -> Result<Vec<String>, GitError> {
        Ok(self.branches.clone())
    }

    async fn remotes(&self) -> Result<Vec<String>, GitError> {
        Ok(self.remotes.clone())
    }

    async fn current_branch(&self) -> Result<String, GitError> {
        if self.detached || self.state.operation == Operation::Rebasing {
            return Err(GitError::DetachedHead);
        }
        Ok(self.current())
    }

    async fn has_unstaged_changes(&self) -> Result<bool, GitError> {
        Ok(self.unstaged)
    }

    async fn has_staged_changes(&self) -> Result<bool, GitError> {
        Ok(self.staged)
    }

    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, GitError> {
        Ok(self.remote_branches.get(remote).cloned().unwrap_or_default())
    }

    async fn count_commits(&self, base: &str, tip: &str) -> Result<u32, GitError> {
        Ok(self
            .counts
            .get(&(base.to_string(), tip.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn trees_differ(&self, a: &str, b: &str) -> Result<bool, GitError> {
        let key = (a.to_string(), b.to_string());
        let reversed = (b.to_string(), a.to_string());
        Ok(self.differing.contains(&key) || self.differing.contains(&reversed))
    }

    fn operation_state(&self) -> Result<RepoState, GitError> {
        Ok(self.state.clone())
    }

    async fn run(&self, args: &[String]) -> Result<CommandOutput, GitError> {
        let line = args.join(" ");
        self.log.borrow_mut().push(line.clone());

        if self.broken.contains(&line) {
            return Err(GitError::NotAvailable);
        }
        if self.failing.contains(&line) {
            return Ok(CommandOutput {
                exit_code: 1,
                stderr: format!("error: {line}"),
                ..Default::default()
            });
        }

        if let [cmd, branch] = args {
            if cmd == "checkout" {
                *self.current.borrow_mut() = branch.clone();
            }
        }
        Ok(CommandOutput::default())
    }
}

/// Pre-recorded operator answers. Running out means the terminal went away.
pub struct Answers(VecDeque<bool>);

impl Answers {
    pub fn new(answers: &[bool]) -> Self {
        Self(answers.iter().copied().collect())
    }

    pub fn none() -> Self {
        Self(VecDeque::new())
    }
}

impl Prompt for Answers {
    fn confirm(&mut self, _question: &str) -> Result<bool, PromptError> {
        self.0.pop_front().ok_or(PromptError::NotInteractive)
    }
}
