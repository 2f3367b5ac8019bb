use serde::Serialize;

use super::classify::{classify_all, BranchStatus};
use super::safety::{check_current_branch, UnsafeReason};
use super::{Context, SyncError};
use crate::git::{checked_out_branch, Git};
use crate::output::porcelain::PorcelainRecord;
use crate::output::Palette;

/// One local branch as shown in the status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchReport {
    pub name: String,
    pub remote: String,
    pub current: bool,
    pub status: BranchStatus,
    /// Set only for the current branch when switching away is unsafe.
    pub unsafe_reason: Option<UnsafeReason>,
}

impl BranchReport {
    /// Human phrase shown between the parentheses.
    pub fn phrase(&self) -> String {
        if let Some(reason) = &self.unsafe_reason {
            return reason.to_string();
        }
        let tracking = format!("{}/{}", self.remote, self.name);
        match self.status {
            BranchStatus::UpToDate => "up to date".to_string(),
            BranchStatus::Behind(n) => format!("{} behind {tracking}", commits(n)),
            BranchStatus::Ahead(n) => format!("{} ahead of {tracking}", commits(n)),
            BranchStatus::Diverged => format!("diverged from {tracking}"),
            BranchStatus::NoRemote => format!("has no remote on {}", self.remote),
        }
    }

    /// `* master ( up to date )`
    pub fn render_line(&self, palette: &Palette) -> String {
        let marker = if self.current {
            palette.current_marker("*")
        } else {
            " ".to_string()
        };
        let phrase = self.phrase();
        let phrase = if self.unsafe_reason.is_some() {
            palette.warning(&phrase)
        } else {
            palette.status(self.status, &phrase)
        };
        format!(
            "{marker} {} ( {phrase} )",
            palette.branch(&self.name, self.current)
        )
    }
}

impl PorcelainRecord for BranchReport {
    /// `current:branch:status:count:phrase`
    fn porcelain_fields(&self) -> Vec<String> {
        vec![
            if self.current { "*" } else { "" }.to_string(),
            self.name.clone(),
            self.status.label().to_string(),
            self.status.count().to_string(),
            self.phrase(),
        ]
    }
}

fn commits(n: u32) -> String {
    if n == 1 {
        "1 commit".to_string()
    } else {
        format!("{n} commits")
    }
}

#[derive(Serialize)]
struct BranchJson {
    name: String,
    current: bool,
    status: &'static str,
    count: u32,
    remote_branch: Option<String>,
    unsafe_reason: Option<String>,
    /// `operation` or `uncommitted`, matching the remedy in `unsafe_reason`.
    unsafe_kind: Option<&'static str>,
}

/// Read-only snapshot of every local branch against one remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub branches: Vec<BranchReport>,
}

impl Report {
    pub fn render(&self, palette: &Palette) -> String {
        self.branches
            .iter()
            .map(|b| b.render_line(palette) + "\n")
            .collect()
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let rows: Vec<BranchJson> = self
            .branches
            .iter()
            .map(|b| BranchJson {
                name: b.name.clone(),
                current: b.current,
                status: b.status.label(),
                count: b.status.count(),
                remote_branch: (b.status != BranchStatus::NoRemote)
                    .then(|| format!("{}/{}", b.remote, b.name)),
                unsafe_reason: b.unsafe_reason.as_ref().map(ToString::to_string),
                unsafe_kind: b.unsafe_reason.as_ref().map(|r| {
                    if r.is_operation() {
                        "operation"
                    } else {
                        "uncommitted"
                    }
                }),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&rows)?)
    }
}

/// Classify every local branch without touching the working tree.
pub async fn build_report<G: Git>(git: &G, ctx: &Context) -> Result<Report, SyncError> {
    let current = checked_out_branch(git).await?;
    let safety = check_current_branch(git).await?;
    let statuses = classify_all(git, &ctx.remote).await?;

    let branches = statuses
        .into_iter()
        .map(|(name, status)| {
            let is_current = name == current;
            BranchReport {
                unsafe_reason: if is_current {
                    safety.reason().cloned()
                } else {
                    None
                },
                current: is_current,
                remote: ctx.remote.clone(),
                name,
                status,
            }
        })
        .collect();

    Ok(Report { branches })
}
