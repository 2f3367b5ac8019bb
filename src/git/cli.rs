use std::path::PathBuf;
use std::process::{Output, Stdio};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use super::parse;
use super::{state, CommandOutput, Git, GitError, RepoInfo, RepoState};

/// [`Git`] backed by the `git` executable.
///
/// Every call is a separate `git -C <workdir> ...` subprocess that is awaited
/// before the next one starts.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    git_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo: &RepoInfo) -> Self {
        Self {
            workdir: repo.workdir.clone(),
            git_dir: repo.git_dir.clone(),
        }
    }

    fn command<S: AsRef<str>>(&self, args: &[S]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(&self.workdir)
            .args(args.iter().map(AsRef::<str>::as_ref))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    async fn output(&self, args: &[&str]) -> Result<Output, GitError> {
        debug!(command = %render(args), "git query");
        self.command(args).output().await.map_err(spawn_error)
    }

    /// Run a query and return its stdout. A non-zero exit is an error.
    async fn query(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(failed(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a `--quiet` diff-style check: exit 0 is `false`, exit 1 is `true`.
    async fn check(&self, args: &[&str]) -> Result<bool, GitError> {
        let output = self.output(args).await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failed(args, &output)),
        }
    }
}

impl Git for GitCli {
    async fn local_branches(&self) -> Result<Vec<String>, GitError> {
        let out = self
            .query(&["for-each-ref", "--format=%(refname)", "refs/heads/"])
            .await?;
        Ok(parse::parse_local_branches(&out))
    }

    async fn remotes(&self) -> Result<Vec<String>, GitError> {
        let out = self.query(&["remote"]).await?;
        Ok(parse::parse_lines(&out))
    }

    async fn current_branch(&self) -> Result<String, GitError> {
        let args = ["symbolic-ref", "--quiet", "HEAD"];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => {}
            Some(1) => return Err(GitError::DetachedHead),
            _ => return Err(failed(&args, &output)),
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let branch = parse::strip_heads_prefix(&stdout);
        if branch.is_empty() {
            return Err(GitError::UnexpectedOutput {
                command: render(&args),
                output: stdout.to_string(),
            });
        }
        Ok(branch.to_string())
    }

    async fn has_unstaged_changes(&self) -> Result<bool, GitError> {
        // Refresh stat info first so touched-but-unchanged files don't count.
        let refresh = self.output(&["update-index", "-q", "--refresh"]).await?;
        if !refresh.status.success() {
            debug!(code = ?refresh.status.code(), "index refresh reported stale entries");
        }
        self.check(&["diff", "--quiet", "--ignore-submodules"]).await
    }

    async fn has_staged_changes(&self) -> Result<bool, GitError> {
        self.check(&["diff", "--cached", "--quiet", "--ignore-submodules"])
            .await
    }

    async fn remote_branches(&self, remote: &str) -> Result<Vec<String>, GitError> {
        let pattern = format!("refs/remotes/{remote}/");
        let out = self
            .query(&["for-each-ref", "--format=%(refname)", &pattern])
            .await?;
        Ok(parse::parse_remote_branches(remote, &out))
    }

    async fn count_commits(&self, base: &str, tip: &str) -> Result<u32, GitError> {
        let range = format!("{base}..{tip}");
        let args = ["rev-list", "--count", range.as_str()];
        let out = self.query(&args).await?;
        parse::parse_count(&out).ok_or_else(|| GitError::UnexpectedOutput {
            command: render(&args),
            output: out,
        })
    }

    async fn trees_differ(&self, a: &str, b: &str) -> Result<bool, GitError> {
        self.check(&["diff", "--quiet", a, b, "--"]).await
    }

    fn operation_state(&self) -> Result<RepoState, GitError> {
        state::detect(&self.git_dir)
    }

    async fn run(&self, args: &[String]) -> Result<CommandOutput, GitError> {
        debug!(command = %render(args), "git");

        let mut child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(GitError::Io(std::io::Error::other("child output not captured")));
        };

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let mut stderr_buf = String::new();
        let mut stdout_done = false;
        let mut stderr_done = false;

        // Both streams go to stderr: stdout is reserved for the report.
        while !stdout_done || !stderr_done {
            tokio::select! {
                result = stdout_reader.next_line(), if !stdout_done => {
                    match result? {
                        Some(line) => eprintln!("{line}"),
                        None => stdout_done = true,
                    }
                }
                result = stderr_reader.next_line(), if !stderr_done => {
                    match result? {
                        Some(line) => {
                            eprintln!("{line}");
                            push_line(&mut stderr_buf, &line);
                        }
                        None => stderr_done = true,
                    }
                }
            }
        }

        let status = child.wait().await?;

        Ok(CommandOutput {
            stderr: stderr_buf,
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

/// Render a git invocation as a copy-pasteable command line.
pub fn render<S: AsRef<str>>(args: &[S]) -> String {
    let words: Vec<&str> = args.iter().map(AsRef::<str>::as_ref).collect();
    format!("git {}", shell_words::join(words))
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

fn spawn_error(err: std::io::Error) -> GitError {
    if err.kind() == std::io::ErrorKind::NotFound {
        GitError::NotAvailable
    } else {
        GitError::Io(err)
    }
}

fn failed(args: &[&str], output: &Output) -> GitError {
    GitError::CommandFailed {
        command: render(args),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
