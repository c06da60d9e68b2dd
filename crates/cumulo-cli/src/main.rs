//! # cumulo — web application stack synthesizer
//!
//! Declares the cloud resources of a containerized web application and
//! renders them as a provisioning template from one configuration.

mod commands;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
        )
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
