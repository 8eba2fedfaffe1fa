//! Stylesheet build commands

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use elaine_crud::config::ElaineConfig;
use elaine_crud::css::{CssBuilder, InstallInstructions, Platform};
use elaine_crud::error::ElaineError;
use indicatif::{ProgressBar, ProgressStyle};

/// Stylesheet commands
#[derive(Debug, Subcommand)]
pub enum CssCommand {
    /// Compile the engine stylesheet with Tailwind CSS
    Build {
        /// Minify the generated stylesheet
        #[arg(long)]
        minify: bool,
    },
    /// Show which Tailwind CSS compiler a build would use
    Locate {
        /// Report install instructions for this release identifier (e.g. `macos-arm64`)
        #[arg(long, hide = true)]
        platform: Option<String>,
    },
}

impl CssCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No Tailwind CSS compiler is found
    /// - The compiler exits with an error
    /// - The generated stylesheet cannot be rewritten
    pub fn execute(&self, root: &Path, config: &ElaineConfig) -> Result<()> {
        let builder = CssBuilder::new(root, &config.css);

        match self {
            Self::Build { minify } => Self::build(&builder, *minify),
            Self::Locate { platform } => match platform {
                Some(identifier) => {
                    Self::locate(&builder.with_platform(Platform::from_identifier(identifier)))
                }
                None => Self::locate(&builder),
            },
        }
    }

    fn build(builder: &CssBuilder, minify: bool) -> Result<()> {
        println!(
            "{} {}",
            style("Building").green().bold(),
            style("ElaineCrud stylesheet...").bold()
        );
        println!();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Running Tailwind CSS...");

        let result = builder.build(minify);
        spinner.finish_and_clear();

        match result {
            Ok(report) => {
                println!("  {} {}", style("Compiler:").dim(), report.compiler.display());
                println!("  {} {}", style("Version:").dim(), report.version);
                println!();
                println!(
                    "{} {}",
                    style("✓ Stylesheet written to").green().bold(),
                    style(report.output.display()).cyan()
                );
                Ok(())
            }
            Err(ElaineError::CompilerNotFound { instructions }) => {
                Self::print_not_found(builder, &instructions);
                anyhow::bail!("Tailwind CSS compiler not found")
            }
            Err(ElaineError::BuildFailed {
                status,
                stdout,
                stderr,
            }) => {
                if !stdout.trim().is_empty() {
                    println!("{}", style("Output:").bold());
                    println!("{}", stdout.trim_end());
                    println!();
                }
                if !stderr.trim().is_empty() {
                    println!("{}", style("Errors:").red().bold());
                    println!("{}", stderr.trim_end());
                    println!();
                }
                anyhow::bail!("Tailwind CSS build failed ({status})")
            }
            Err(e) => Err(e).context("Failed to build stylesheet"),
        }
    }

    fn locate(builder: &CssBuilder) -> Result<()> {
        match builder.locate() {
            Ok(compiler) => {
                println!(
                    "{} {}",
                    style("✓ Found").green().bold(),
                    style(compiler.path.display()).cyan()
                );
                println!(
                    "  {} {}",
                    style("Version:").dim(),
                    elaine_crud::css::extract_version(&compiler.help)
                );
                Ok(())
            }
            Err(ElaineError::CompilerNotFound { instructions }) => {
                Self::print_not_found(builder, &instructions);
                anyhow::bail!("Tailwind CSS compiler not found")
            }
            Err(e) => Err(e.into()),
        }
    }

    fn print_not_found(builder: &CssBuilder, instructions: &InstallInstructions) {
        println!(
            "{} is not installed.",
            style("Tailwind CSS").yellow().bold()
        );
        println!();
        println!("Searched:");
        for candidate in builder.candidates() {
            println!("  {} {}", style("-").dim(), candidate.display());
        }
        println!();
        for line in instructions.to_string().lines() {
            match line.strip_prefix("  ") {
                Some(step) => println!("  {} {}", style("$").dim(), style(step).cyan()),
                None => println!("{line}"),
            }
        }
        println!();
    }
}
