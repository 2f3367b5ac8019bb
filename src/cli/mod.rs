use std::io;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use crossterm::tty::IsTty;
use tracing::debug;

use crate::config::{self, CliConfigOverrides};
use crate::exec::{Driver, Mode, TerminalPrompt};
use crate::git::{self, GitCli};
use crate::output::{Format, OutputConfig};
use crate::sync::{self, Context, SyncOptions};

pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "gitup",
    version,
    about = "Report and update every local branch against its remote counterpart"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Run as if started in <PATH>
    #[arg(short = 'C', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Remote to sync against (required when several exist)
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Check out and pull every branch that is behind
    #[arg(short, long)]
    pub update: bool,

    /// Also pull branches that are ahead or diverged (implies --update)
    #[arg(short, long)]
    pub all: bool,

    /// Pull with --rebase (implies --update)
    #[arg(short = 'R', long)]
    pub rebase: bool,

    /// Prune deleted remote branches when fetching
    #[arg(short, long)]
    pub prune: bool,

    /// Print mutating git commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Ask before each mutating git command
    #[arg(short = 'i', long)]
    pub confirm: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Trace every git invocation to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Output the report as JSON
    #[arg(long, conflicts_with = "porcelain")]
    pub json: bool,

    /// Output the report in machine-readable colon-separated format
    #[arg(long)]
    pub porcelain: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    pub fn wants_update(&self) -> bool {
        self.update || self.all || self.rebase
    }

    pub fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else if self.porcelain {
            Format::Porcelain
        } else {
            Format::Text
        }
    }

    fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            remote: self.remote.clone(),
            rebase: self.rebase,
            prune: self.prune,
            confirm: self.confirm,
            no_color: self.no_color,
        }
    }
}

/// A fatal error together with the colour setting in effect when it happened.
#[derive(Debug)]
pub struct Failure {
    pub error: anyhow::Error,
    pub color: bool,
}

/// Run the parsed command line to completion, writing the report to stdout.
pub async fn run(cli: Cli) -> std::result::Result<(), Failure> {
    let mut color = !cli.no_color;
    let result = execute(cli, &mut color).await;
    result.map_err(|error| Failure { error, color })
}

async fn execute(cli: Cli, color: &mut bool) -> Result<()> {
    if let Some(Command::Completions { shell }) = cli.command {
        commands::completions::execute(shell, &mut io::stdout());
        return Ok(());
    }

    let cwd = match &cli.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };
    let repo = git::discover_repo(&cwd)?;
    debug!(workdir = %repo.workdir.display(), git_dir = %repo.git_dir.display(), "discovered repository");

    let project = config::load_project_config(&repo.workdir)?;
    let global = config::load_global_config()?;
    let resolved = config::resolve_config(Some(&cli.overrides()), project.as_ref(), &global);
    debug!(?resolved, "resolved configuration");
    *color = resolved.color;

    let output = OutputConfig::from_env(!resolved.color, io::stdout().is_tty());
    let git = GitCli::new(&repo);
    let remote = sync::select_remote(&git, resolved.remote.as_deref()).await?;

    let options = SyncOptions {
        update: cli.wants_update(),
        force_all: cli.all,
        rebase: resolved.rebase,
        prune: resolved.prune,
        exclude: resolved.exclude,
    };
    let ctx = Context::new(remote, options, output.palette())?;

    let mode = if cli.dry_run {
        Mode::DryRun
    } else if resolved.confirm {
        Mode::Confirm
    } else {
        Mode::Execute
    };
    let mut driver = Driver::new(mode, TerminalPrompt);
    let format = cli.format();

    let rendered = if ctx.options.update {
        let (rendered, summary) = commands::update::execute(&git, &mut driver, &ctx, format).await?;
        if let Some(note) = commands::update::failure_note(&summary, &ctx.palette) {
            eprintln!("{note}");
        }
        rendered
    } else {
        commands::status::execute(&git, &mut driver, &ctx, format).await?
    };
    print!("{rendered}");
    Ok(())
}
