pub mod porcelain;
pub mod style;

pub use style::Palette;

/// Resolved output configuration derived from CLI flags, configuration, the
/// `NO_COLOR` environment variable and terminal detection. Constructed once at
/// startup and handed to every formatter.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    color: bool,
}

impl OutputConfig {
    pub fn from_env(no_color: bool, is_tty: bool) -> Self {
        let env_no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let color = !no_color && !env_no_color && is_tty;
        Self { color }
    }

    pub fn palette(&self) -> Palette {
        Palette::new(self.color)
    }
}

/// How a report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
    Porcelain,
}
