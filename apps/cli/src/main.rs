//! jobsift CLI — job posting harvester and query tool.
//!
//! Scrapes public job boards into a local database, extracting salary,
//! skills, seniority and posting dates along the way.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
