use crossterm::style::Stylize;

use crate::sync::BranchStatus;

/// Terminal colours for the status report. Disabled palettes return text
/// unchanged, so output piped to files never contains escape codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn current_marker(&self, text: &str) -> String {
        if self.enabled {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn branch(&self, name: &str, current: bool) -> String {
        if self.enabled && current {
            name.bold().to_string()
        } else {
            name.to_string()
        }
    }

    pub fn status(&self, status: BranchStatus, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match status {
            BranchStatus::UpToDate => text.green().to_string(),
            BranchStatus::Behind(_) => text.yellow().to_string(),
            BranchStatus::Ahead(_) => text.cyan().to_string(),
            BranchStatus::Diverged => text.magenta().to_string(),
            BranchStatus::NoRemote => text.dark_grey().to_string(),
        }
    }

    pub fn warning(&self, text: &str) -> String {
        if self.enabled {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}
