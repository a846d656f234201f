//! Schema Validator CLI
//!
//! Verifies that the SQLite schema at one commit applies cleanly on top of the
//! schema at an earlier commit.

use std::path::PathBuf;
use std::process::ExitCode;

use cat_launcher_release::{
    discover_repository, CompatibilityChecker, ReleaseConfig, SchemaSnapshot,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-validator")]
#[command(about = "Verify SQLite schema compatibility between two commits")]
struct Cli {
    /// Previous commit SHA
    commit_prev: String,

    /// Current commit SHA
    commit_curr: String,

    /// Extra config file layered over release.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ReleaseConfig::load_from(cli.config.as_deref())?;
    let cwd = std::env::current_dir()?;

    let snapshots = discover_repository(&cwd).and_then(|repo| {
        let prev = SchemaSnapshot::at_revision(&repo, &cli.commit_prev, &config.schema.path)?;
        let curr = SchemaSnapshot::at_revision(&repo, &cli.commit_curr, &config.schema.path)?;
        Ok((prev, curr))
    });
    let (prev, curr) = match snapshots {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error retrieving schemas from git: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    // The scratch database is gone by the time `check` returns.
    let report = CompatibilityChecker::new(config.scratch_db_path()).check(&prev, &curr)?;

    if report.verdict.is_compatible() {
        println!("{}", report.summary());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", report.summary());
        Ok(ExitCode::FAILURE)
    }
}
