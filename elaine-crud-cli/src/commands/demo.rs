//! Demo application commands

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use dialoguer::Confirm;
use elaine_crud::config::ElaineConfig;
use elaine_crud::demo::{
    resources, DemoDatabase, DemoProcess, DemoTasks, ExportFormat, SetupReport,
};
use elaine_crud::error::ElaineError;
use indicatif::{ProgressBar, ProgressStyle};

/// Demo command variants
#[derive(Debug, Subcommand)]
pub enum DemoCommand {
    /// Start the demo server
    Server,
    /// Create, migrate and seed the demo database
    Setup,
    /// Drop the demo database and set it up again
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Open the demo application console
    Console,
    /// Open a database shell on the demo database
    Dbconsole,
    /// Show demo environment details
    Info,
    /// List resource routes and export downloads
    Routes {
        /// Only this resource (model, table or singular name)
        resource: Option<String>,
    },
}

impl DemoCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The demo configuration is invalid
    /// - A database step fails
    /// - A demo process cannot be started or exits with an error
    pub fn execute(&self, root: &Path, config: &ElaineConfig) -> Result<()> {
        let tasks = DemoTasks::new(root, &config.demo);

        match self {
            Self::Server => Self::run(&tasks, DemoProcess::Server),
            Self::Console => Self::run(&tasks, DemoProcess::Console),
            Self::Dbconsole => Self::run(&tasks, DemoProcess::DbConsole),
            Self::Setup => Self::setup(&tasks),
            Self::Reset { yes } => Self::reset(&tasks, *yes),
            Self::Info => {
                Self::info(&tasks);
                Ok(())
            }
            Self::Routes { resource } => Self::routes(resource.as_deref()),
        }
    }

    fn run(tasks: &DemoTasks, process: DemoProcess) -> Result<()> {
        let command = tasks.command(process)?;

        println!(
            "{} {}",
            style("Starting").green().bold(),
            style(format!("demo {}...", process.name())).bold()
        );
        if process == DemoProcess::Server {
            println!(
                "  {} {}",
                style("URL:").dim(),
                style(tasks.settings().server_url()).cyan()
            );
        }
        println!("  {} {}", style("$").dim(), style(command.display()).cyan());
        println!();

        command
            .run()
            .with_context(|| format!("Demo {} exited with error", process.name()))
    }

    fn setup(tasks: &DemoTasks) -> Result<()> {
        let database = tasks.database()?;

        println!(
            "{} {}",
            style("Setting up").green().bold(),
            style("demo database...").bold()
        );
        println!();

        let report = Self::block_on_database("Migrating and seeding...", database.setup())
            .context("Failed to set up demo database")?;

        Self::print_setup(&database, report);
        Ok(())
    }

    fn reset(tasks: &DemoTasks, yes: bool) -> Result<()> {
        let database = tasks.database()?;

        if !yes && database.exists() {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Drop {} and rebuild it from scratch?",
                    database.path().display()
                ))
                .default(false)
                .interact()
                .context("Failed to read confirmation")?;

            if !confirmed {
                println!("{}", style("Reset cancelled.").yellow());
                return Ok(());
            }
        }

        println!(
            "{} {}",
            style("Resetting").yellow().bold(),
            style("demo database...").bold()
        );
        println!();

        println!("  {} Dropping database...", style("1.").cyan());
        if !database.drop_database()? {
            println!("    {} Database did not exist (continuing)", style("!").yellow());
        }

        println!("  {} Creating, migrating and seeding...", style("2.").cyan());
        let report = Self::block_on_database("Migrating and seeding...", database.setup())
            .context("Failed to rebuild demo database")?;

        println!();
        Self::print_setup(&database, report);
        Ok(())
    }

    /// Drive a database future on a single-threaded runtime behind a spinner
    fn block_on_database<F>(message: &'static str, future: F) -> Result<SetupReport>
    where
        F: std::future::Future<Output = elaine_crud::error::Result<SetupReport>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message);

        let result = runtime.block_on(future);
        spinner.finish_and_clear();

        Ok(result?)
    }

    fn print_setup(database: &DemoDatabase, report: SetupReport) {
        if report.created {
            println!("  {} Created {}", style("+").green(), database.path().display());
        }
        println!(
            "  {} {} migration(s) applied",
            style("+").green(),
            report.migrations_applied
        );
        println!("  {} Seed data loaded", style("+").green());
        println!();
        println!("{}", style("✓ Demo database ready!").green().bold());
        println!();
        println!("Start the demo with:");
        println!("  {} {}", style("$").dim(), style("elaine-crud demo server").cyan());
    }

    fn info(tasks: &DemoTasks) {
        let info = tasks.info();

        println!("{}", style("ElaineCrud demo").bold());
        println!();
        println!("  {} {}", style("App directory:").dim(), info.app_dir.display());
        println!("  {} {}", style("Database URL:").dim(), info.database_url);
        match &info.database {
            Some(path) if info.database_exists => {
                println!("  {} {}", style("Database file:").dim(), path.display());
            }
            Some(path) => println!(
                "  {} {} {}",
                style("Database file:").dim(),
                path.display(),
                style("(missing, run `elaine-crud demo setup`)").yellow()
            ),
            None => println!("  {} in-memory", style("Database file:").dim()),
        }
        println!("  {} {}", style("Migrations:").dim(), info.migrations);
        println!("  {} {}", style("Server URL:").dim(), style(&info.server_url).cyan());
        println!();

        println!("{}", style("Resources:").bold());
        for resource in info.resources {
            let foreign_keys = if resource.foreign_keys.is_empty() {
                String::new()
            } else {
                format!(" (belongs to: {})", resource.foreign_keys.join(", "))
            };
            println!(
                "  {:<10} {}{}",
                style(resource.model).green(),
                info.resource_url(resource),
                style(foreign_keys).dim()
            );
        }
        println!();

        println!("{}", style("Commands:").bold());
        for (command, description) in [
            ("demo setup", "create, migrate and seed the database"),
            ("demo reset", "drop and rebuild the database"),
            ("demo server", "start the demo server"),
            ("demo console", "open the application console"),
            ("demo dbconsole", "open a database shell"),
            ("demo routes", "list resource routes"),
        ] {
            println!(
                "  {} {:<24} {}",
                style("$").dim(),
                style(format!("elaine-crud {command}")).cyan(),
                description
            );
        }
    }

    fn routes(name: Option<&str>) -> Result<()> {
        let selected = match resources::select(name) {
            Ok(selected) => selected,
            Err(ElaineError::UnknownResource { name, available }) => {
                println!("{} {}", style("Unknown resource").yellow().bold(), name);
                println!();
                println!("Available resources:");
                for table in &available {
                    println!("  {} {}", style("-").dim(), style(table).cyan());
                }
                println!();
                anyhow::bail!("Unknown demo resource: {name}");
            }
            Err(e) => return Err(e.into()),
        };

        for resource in &selected {
            for route in resource.routes() {
                println!(
                    "{:<22} {:<7} {:<32} {}#{}",
                    route.name,
                    route.verb.to_string(),
                    route.path,
                    resource.table,
                    route.action
                );
            }
        }

        println!();
        println!("{}", style("Exports:").bold());
        for resource in &selected {
            let downloads: Vec<String> = ExportFormat::ALL
                .into_iter()
                .map(|format| resource.export_path(format))
                .collect();
            println!("  {:<10} {}", style(resource.model).green(), downloads.join("  "));
        }
        Ok(())
    }
}
