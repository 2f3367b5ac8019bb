pub mod completions;
pub mod status;
pub mod update;
