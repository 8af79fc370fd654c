//! Command line front end: argument parsing, configuration and the stage
//! runner.

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::{Cli, Command};
pub use config::PipelineConfig;
pub use runner::Pipeline;
