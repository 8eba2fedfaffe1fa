//! elaine-crud CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{CssCommand, DemoCommand, SpecCommand};
use elaine_crud::config::{resolve_root, ElaineConfig};

#[derive(Parser)]
#[command(name = "elaine-crud")]
#[command(version)]
#[command(about = "Development tasks for the ElaineCrud engine", long_about = None)]
struct Cli {
    /// Package root all relative paths resolve against
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to `<root>/elaine.toml`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the engine stylesheet
    Css {
        #[command(subcommand)]
        command: CssCommand,
    },
    /// Manage and run the demo application
    Demo {
        #[command(subcommand)]
        command: DemoCommand,
    },
    /// Run the engine test suites
    Spec {
        #[command(subcommand)]
        command: SpecCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    elaine_crud::observability::init(cli.verbose);

    let root = resolve_root(&cli.root)
        .with_context(|| format!("Failed to resolve package root {}", cli.root.display()))?;
    let config = ElaineConfig::load(&root, cli.config.as_deref())?;
    tracing::debug!(root = %root.display(), "configuration ready");

    match cli.command {
        Commands::Css { command } => command.execute(&root, &config),
        Commands::Demo { command } => command.execute(&root, &config),
        Commands::Spec { command } => command.execute(&root, &config),
    }
}
