//! Test suite commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use elaine_crud::config::ElaineConfig;
use elaine_crud::error::ElaineError;
use elaine_crud::specs::SpecRunner;

/// Test suite command variants
#[derive(Debug, Subcommand)]
pub enum SpecCommand {
    /// Run the integration specs
    Integration,
    /// Run controller specs, all of them or a single controller
    Controller {
        /// Controller name (e.g. `books`, `BookCopies`)
        name: Option<String>,
    },
}

impl SpecCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The named controller spec does not exist
    /// - The test runner cannot be started or reports failures
    pub fn execute(&self, root: &Path, config: &ElaineConfig) -> Result<()> {
        let runner = SpecRunner::new(root, &config.specs);

        let (label, command) = match self {
            Self::Integration => ("integration specs".to_string(), runner.integration_command()),
            Self::Controller { name } => (
                name.as_deref().map_or_else(
                    || "controller specs".to_string(),
                    |name| format!("{name} controller spec"),
                ),
                runner.controller_command(name.as_deref()),
            ),
        };

        let command = match command {
            Ok(command) => command,
            Err(ElaineError::SpecNotFound { path, available }) => {
                println!(
                    "{} {}",
                    style("No spec file at").yellow().bold(),
                    path.display()
                );
                if !available.is_empty() {
                    println!();
                    println!("Available controllers:");
                    for name in &available {
                        println!("  {} {}", style("-").dim(), style(name).cyan());
                    }
                }
                println!();
                anyhow::bail!("Spec file not found: {}", path.display());
            }
            Err(e) => return Err(e.into()),
        };

        println!(
            "{} {}",
            style("Running").green().bold(),
            style(format!("{label}...")).bold()
        );
        println!("  {} {}", style("$").dim(), style(command.display()).cyan());
        println!();

        command.run().context("Specs failed")?;

        println!();
        println!("{}", style("✓ Specs passed!").green().bold());
        Ok(())
    }
}
