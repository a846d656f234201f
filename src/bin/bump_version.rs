//! Version Bump CLI
//!
//! Writes a new release version into every project file that carries it.
//!
//! Usage:
//!   bump-version 0.13.0
//!   bump-version 0.13.0 --root /path/to/cat-launcher-repo

use std::path::PathBuf;
use std::process::ExitCode;

use cat_launcher_release::{ReleaseConfig, ReleaseVersion, VersionBumper};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bump-version")]
#[command(about = "Bump version in all project files")]
struct Cli {
    /// New version (e.g., 0.13.0)
    version: String,

    /// Repository root (default: enclosing git work tree)
    #[arg(long)]
    root: Option<PathBuf>,

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
    let version = match ReleaseVersion::parse(&cli.version) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: Version must be a valid semantic version (e.g., 0.13.0)");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut config = ReleaseConfig::load_from(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        config.paths.root = Some(root);
    }

    let bumper = VersionBumper::from_config(&config);
    bumper.apply(&version, |target| {
        println!("Updated {}", target.path.display());
    })?;

    println!("\nVersion bumped to {}", version);
    Ok(ExitCode::SUCCESS)
}
