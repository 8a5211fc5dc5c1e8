mod cli;
mod commands;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classification(args) => commands::classification::run(args),
        Commands::Roc(args) => commands::curves::run_roc(args),
        Commands::Pr(args) => commands::curves::run_pr(args),
        Commands::Drift(args) => commands::drift::run(args),
        Commands::Quality(args) => commands::quality::run(args),
        Commands::Confusion(args) => commands::confusion::run(args),
        Commands::Attribution(args) => commands::attribution::run(args),
        Commands::LearningCurve(args) => commands::training::run(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
