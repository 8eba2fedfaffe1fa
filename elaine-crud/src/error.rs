//! Error types and error handling

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::css::InstallInstructions;

/// Result alias used throughout the crate
pub type Result<T, E = ElaineError> = std::result::Result<T, E>;

/// Tooling error type
///
/// Every variant is terminal for the task that produced it.
#[derive(Debug, Error)]
pub enum ElaineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error at a known path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// No candidate path holds a usable Tailwind CSS compiler
    #[error("Tailwind CSS compiler not found")]
    CompilerNotFound {
        /// Platform-specific remediation
        instructions: InstallInstructions,
    },

    /// The compiler ran and exited non-zero
    #[error("Tailwind CSS build failed ({status})")]
    BuildFailed {
        /// Exit status of the compiler
        status: ExitStatus,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// An external command could not be started
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// An external command exited non-zero
    #[error("`{command}` exited with {status}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status
        status: ExitStatus,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A requested spec file does not exist
    #[error("Spec file not found: {}", path.display())]
    SpecNotFound {
        /// Path that was looked up
        path: PathBuf,
        /// Spec files that do exist in the same directory
        available: Vec<String>,
    },

    /// A requested demo resource does not exist
    #[error("Unknown demo resource `{name}`")]
    UnknownResource {
        /// Name that was looked up
        name: String,
        /// Tables of the demo resources
        available: Vec<String>,
    },
}

impl ElaineError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
