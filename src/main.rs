//! Repository quality mining tool
//!
//! Runs the discovery, collection and analysis stages from the command line.

use clap::Parser;
use std::process::ExitCode;

use repo_quality::{Cli, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match Pipeline::from_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
