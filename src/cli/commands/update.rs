use anyhow::Result;

use super::status;
use crate::exec::{Driver, Prompt};
use crate::git::Git;
use crate::output::{Format, Palette};
use crate::sync::report::build_report;
use crate::sync::update::update;
use crate::sync::{Context, UpdateSummary};

/// Execute `gitup --update`.
///
/// Runs the update procedure, then classifies the branches again so the
/// returned report shows where they ended up.
pub async fn execute<G: Git, P: Prompt>(
    git: &G,
    driver: &mut Driver<P>,
    ctx: &Context,
    format: Format,
) -> Result<(String, UpdateSummary)> {
    let summary = update(git, driver, ctx).await?;
    let report = build_report(git, ctx).await?;
    let rendered = status::render(&report, &ctx.palette, format)?;
    Ok((rendered, summary))
}

/// A one-line note for stderr listing branches that could not be updated.
pub fn failure_note(summary: &UpdateSummary, palette: &Palette) -> Option<String> {
    if summary.failed.is_empty() {
        return None;
    }
    let text = format!(
        "failed to update: {} (run with --verbose for details)",
        summary.failed.join(", ")
    );
    Some(palette.warning(&text))
}
