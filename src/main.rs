use std::process::ExitCode;

use clap::Parser;
use crossterm::tty::IsTty;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitup::cli::{self, Cli};
use gitup::output::OutputConfig;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitup=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gitup=warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            let palette = OutputConfig::from_env(!failure.color, std::io::stderr().is_tty()).palette();
            eprintln!("{} {:#}", palette.warning("error:"), failure.error);
            ExitCode::FAILURE
        }
    }
}
