pub mod cli;
pub mod config;
pub mod exec;
pub mod git;
pub mod output;
pub mod paths;
pub mod sync;
