use anyhow::Result;

use crate::exec::{Driver, Prompt};
use crate::git::Git;
use crate::output::porcelain::format_porcelain;
use crate::output::{Format, Palette};
use crate::sync::{self, report::build_report, Context, Report};

/// Execute the read-only `gitup` run.
///
/// Fetches from the selected remote, classifies every local branch and
/// returns the formatted report. No branch is checked out.
pub async fn execute<G: Git, P: Prompt>(
    git: &G,
    driver: &mut Driver<P>,
    ctx: &Context,
    format: Format,
) -> Result<String> {
    sync::fetch(git, driver, ctx).await?;
    let report = build_report(git, ctx).await?;
    render(&report, &ctx.palette, format)
}

pub fn render(report: &Report, palette: &Palette, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(report.render(palette)),
        Format::Json => report.to_json(),
        Format::Porcelain => Ok(format_porcelain(&report.branches)),
    }
}
