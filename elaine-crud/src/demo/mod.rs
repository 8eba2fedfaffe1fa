//! Demo host application tasks
//!
//! The demo is a library-book-loan application mounting the engine. These
//! tasks manage its database and launch its processes:
//!
//! - `setup` / `reset` - create, migrate and seed the `SQLite` database
//! - `server` / `console` / `dbconsole` - run the configured host commands
//! - `info` / `routes` - describe the demo resources

pub mod database;
pub mod resources;

use std::path::{Path, PathBuf};

use crate::config::{absolute_root, DemoSettings};
use crate::error::Result;
use crate::runner::{CommandTemplate, ShellCommand};

pub use database::{DemoDatabase, SetupReport, MIGRATOR, SEEDS};
pub use resources::{ExportFormat, HttpVerb, Resource, Route, RESOURCES};

/// Host processes the demo can launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoProcess {
    /// Web server
    Server,
    /// Application console
    Console,
    /// Database shell
    DbConsole,
}

impl DemoProcess {
    /// Name used in messages and config errors
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Console => "console",
            Self::DbConsole => "dbconsole",
        }
    }

    fn template(self, settings: &DemoSettings) -> &[String] {
        match self {
            Self::Server => &settings.server_command,
            Self::Console => &settings.console_command,
            Self::DbConsole => &settings.dbconsole_command,
        }
    }
}

/// Demo tasks bound to a package root
#[derive(Debug, Clone)]
pub struct DemoTasks {
    root: PathBuf,
    settings: DemoSettings,
}

impl DemoTasks {
    /// Create the task set
    ///
    /// A relative `root` is made absolute: host commands run from the app
    /// directory, so placeholders must not depend on the caller's cwd.
    pub fn new(root: impl AsRef<Path>, settings: &DemoSettings) -> Self {
        Self {
            root: absolute_root(root.as_ref()),
            settings: settings.clone(),
        }
    }

    /// Demo settings in use
    #[must_use]
    pub const fn settings(&self) -> &DemoSettings {
        &self.settings
    }

    /// Host application directory
    #[must_use]
    pub fn app_dir(&self) -> PathBuf {
        self.root.join(&self.settings.app_dir)
    }

    /// Demo database handle
    pub fn database(&self) -> Result<DemoDatabase> {
        DemoDatabase::from_settings(&self.root, &self.settings)
    }

    /// Placeholder values for command templates
    fn placeholders(&self) -> Vec<(&'static str, String)> {
        let database_path = self
            .settings
            .database_path(&self.root)
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        vec![
            ("host", self.settings.host.clone()),
            ("port", self.settings.port.to_string()),
            ("database_url", self.settings.database_url.clone()),
            ("database_path", database_path),
            ("app_dir", self.app_dir().display().to_string()),
        ]
    }

    /// Rendered command for a host process, run from the app directory
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ElaineError::Config`] when the configured command is empty.
    pub fn command(&self, process: DemoProcess) -> Result<ShellCommand> {
        let template = CommandTemplate::new(process.name(), process.template(&self.settings))?;
        Ok(template
            .render(&self.placeholders())
            .current_dir(self.app_dir()))
    }

    /// Run a host process in the foreground until it exits
    pub fn run(&self, process: DemoProcess) -> Result<()> {
        let command = self.command(process)?;
        tracing::info!(
            process = process.name(),
            command = %command.display(),
            "starting demo process"
        );
        command.run()
    }

    /// Summary shown by `demo info`
    #[must_use]
    pub fn info(&self) -> DemoInfo {
        let database = self.settings.database_path(&self.root);
        let database_exists = database.as_deref().is_some_and(Path::is_file);

        DemoInfo {
            app_dir: self.app_dir(),
            database_url: self.settings.database_url.clone(),
            database,
            database_exists,
            server_url: self.settings.server_url(),
            resources: RESOURCES,
            migrations: MIGRATOR.iter().count(),
        }
    }
}

/// Description of the demo environment
#[derive(Debug, Clone)]
pub struct DemoInfo {
    /// Host application directory
    pub app_dir: PathBuf,
    /// Configured database URL
    pub database_url: String,
    /// Database file, absent for in-memory URLs
    pub database: Option<PathBuf>,
    /// The database file exists
    pub database_exists: bool,
    /// Base URL of the demo server
    pub server_url: String,
    /// Demo resources
    pub resources: &'static [Resource],
    /// Number of embedded migrations
    pub migrations: usize,
}

impl DemoInfo {
    /// Index URL of a resource on the running server
    #[must_use]
    pub fn resource_url(&self, resource: &Resource) -> String {
        format!("{}{}", self.server_url, resource.collection_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_command_renders_host_and_port() {
        let mut settings = DemoSettings::default();
        settings.port = 4100;
        let tasks = DemoTasks::new("/engine", &settings);

        let command = tasks.command(DemoProcess::Server).unwrap();
        assert_eq!(command.display(), "bin/rails server -b localhost -p 4100");
    }

    #[test]
    fn test_dbconsole_points_at_database_file() {
        let tasks = DemoTasks::new("/engine", &DemoSettings::default());
        let command = tasks.command(DemoProcess::DbConsole).unwrap();
        assert_eq!(
            command.display(),
            "sqlite3 /engine/spec/dummy/db/development.sqlite3"
        );
    }

    #[test]
    fn test_empty_command_is_config_error() {
        let settings = DemoSettings {
            console_command: Vec::new(),
            ..DemoSettings::default()
        };
        let tasks = DemoTasks::new("/engine", &settings);
        assert!(tasks.command(DemoProcess::Console).is_err());
    }

    #[test]
    fn test_info_lists_all_resources() {
        let tasks = DemoTasks::new("/nonexistent/engine", &DemoSettings::default());
        let info = tasks.info();

        assert_eq!(info.resources.len(), 9);
        assert!(!info.database_exists);
        assert_eq!(info.migrations, 9);
        assert_eq!(info.resource_url(&RESOURCES[2]), "http://localhost:3000/books");
    }
}
