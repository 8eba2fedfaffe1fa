//! Configuration management for elaine-crud
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ELAINE_` prefix, `__` for nesting)
//! 2. `<root>/elaine.toml`, or the file passed with `--config`
//! 3. Hardcoded defaults (fallback)
//!
//! Environment variable format: `ELAINE_SECTION__FIELD_NAME`
//! - Example: `ELAINE_DEMO__PORT=4000`
//!
//! # Example Configuration
//!
//! ```toml
//! # elaine.toml
//! [css]
//! input = "assets/stylesheets/elaine_crud.tailwind.css"
//! output = "assets/builds/elaine_crud.css"
//! config = "tailwind.config.js"
//!
//! [demo]
//! app_dir = "spec/dummy"
//! database_url = "sqlite://spec/dummy/db/development.sqlite3"
//! port = 3000
//!
//! [specs]
//! runner = ["bundle", "exec", "rspec"]
//! ```

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ElaineError, Result};

/// File name looked up in the package root
pub const CONFIG_FILE_NAME: &str = "elaine.toml";

/// Stylesheet build settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CssSettings {
    /// Tailwind source stylesheet, relative to the package root
    pub input: PathBuf,

    /// Generated stylesheet, relative to the package root
    pub output: PathBuf,

    /// Tailwind config file, relative to the package root
    pub config: PathBuf,

    /// Compiler paths searched before the built-in candidates
    pub extra_candidates: Vec<PathBuf>,
}

impl Default for CssSettings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("assets/stylesheets/elaine_crud.tailwind.css"),
            output: PathBuf::from("assets/builds/elaine_crud.css"),
            config: PathBuf::from("tailwind.config.js"),
            extra_candidates: Vec::new(),
        }
    }
}

/// Demo host application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DemoSettings {
    /// Directory of the demo host application
    pub app_dir: PathBuf,

    /// `SQLite` database URL; relative paths resolve against the package root
    pub database_url: String,

    /// Host the demo server binds to
    pub host: String,

    /// Port the demo server listens on
    pub port: u16,

    /// Command template for `demo server`
    pub server_command: Vec<String>,

    /// Command template for `demo console`
    pub console_command: Vec<String>,

    /// Command template for `demo dbconsole`
    pub dbconsole_command: Vec<String>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("spec/dummy"),
            database_url: "sqlite://spec/dummy/db/development.sqlite3".to_string(),
            host: "localhost".to_string(),
            port: 3000,
            server_command: to_strings(&["bin/rails", "server", "-b", "{host}", "-p", "{port}"]),
            console_command: to_strings(&["bin/rails", "console"]),
            dbconsole_command: to_strings(&["sqlite3", "{database_path}"]),
        }
    }
}

impl DemoSettings {
    /// Base URL of the running demo server
    #[must_use]
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Resolve the database file behind `database_url`
    ///
    /// Returns `None` for in-memory databases.
    #[must_use]
    pub fn database_path(&self, root: &Path) -> Option<PathBuf> {
        let raw = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))
            .unwrap_or(&self.database_url);
        let raw = raw.split('?').next().unwrap_or_default();

        if raw.is_empty() || raw == ":memory:" {
            return None;
        }

        let path = PathBuf::from(raw);
        if path.is_absolute() {
            Some(path)
        } else {
            Some(root.join(path))
        }
    }
}

/// Test suite settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpecSettings {
    /// Test runner command; spec paths are appended
    pub runner: Vec<String>,

    /// Integration spec directory, relative to the package root
    pub integration_dir: PathBuf,

    /// Controller spec directory, relative to the package root
    pub controller_dir: PathBuf,
}

impl Default for SpecSettings {
    fn default() -> Self {
        Self {
            runner: to_strings(&["bundle", "exec", "rspec"]),
            integration_dir: PathBuf::from("spec/integration"),
            controller_dir: PathBuf::from("spec/controllers"),
        }
    }
}

/// Complete elaine-crud configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ElaineConfig {
    /// Stylesheet build settings
    #[serde(default)]
    pub css: CssSettings,

    /// Demo application settings
    #[serde(default)]
    pub demo: DemoSettings,

    /// Test suite settings
    #[serde(default)]
    pub specs: SpecSettings,
}

impl ElaineConfig {
    /// Load configuration for a package root
    ///
    /// An explicit `file` replaces the `<root>/elaine.toml` lookup and must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Default configuration cannot be serialized to TOML
    /// - The explicit configuration file does not exist
    /// - A source contains invalid TOML or values of the wrong type
    pub fn load(root: impl AsRef<Path>, file: Option<&Path>) -> Result<Self> {
        let defaults =
            toml::to_string(&Self::default()).map_err(|e| ElaineError::Config(e.to_string()))?;
        let mut figment = Figment::new().merge(Toml::string(&defaults));

        match file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ElaineError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let local = root.as_ref().join(CONFIG_FILE_NAME);
                if local.is_file() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        figment = figment.merge(Env::prefixed("ELAINE_").split("__").lowercase(true));

        let config: Self = figment
            .extract()
            .map_err(|e| ElaineError::Config(e.to_string()))?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

/// Make a package root absolute against the current directory
///
/// Commands run from other directories (the demo app, the root itself), so
/// every path handed to them must not depend on the caller's cwd.
///
/// # Errors
///
/// Returns [`ElaineError::Io`] when `root` is empty or the current directory
/// cannot be read.
pub fn resolve_root(root: impl AsRef<Path>) -> Result<PathBuf> {
    let root = root.as_ref();
    std::path::absolute(root).map_err(|e| ElaineError::io(root, e))
}

/// [`resolve_root`] for constructors, keeping `root` unchanged if it fails
pub(crate) fn absolute_root(root: &Path) -> PathBuf {
    resolve_root(root).unwrap_or_else(|e| {
        tracing::warn!(root = %root.display(), error = %e, "could not make package root absolute");
        root.to_path_buf()
    })
}

fn to_strings(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ElaineConfig::default();
        assert_eq!(config.demo.port, 3000);
        assert_eq!(config.demo.server_url(), "http://localhost:3000");
        assert_eq!(config.css.output, PathBuf::from("assets/builds/elaine_crud.css"));
        assert_eq!(config.specs.runner, vec!["bundle", "exec", "rspec"]);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let root = TempDir::new().unwrap();
        let config = ElaineConfig::load(root.path(), None).unwrap();
        assert_eq!(config.css, CssSettings::default());
        assert_eq!(config.specs, SpecSettings::default());
    }

    #[test]
    fn test_local_file_overrides_defaults() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[css]\noutput = \"public/app.css\"\n\n[specs]\nrunner = [\"rspec\"]\n",
        )
        .unwrap();

        let config = ElaineConfig::load(root.path(), None).unwrap();
        assert_eq!(config.css.output, PathBuf::from("public/app.css"));
        assert_eq!(config.css.input, CssSettings::default().input);
        assert_eq!(config.specs.runner, vec!["rspec"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope.toml");
        let err = ElaineConfig::load(root.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ElaineError::Config(_)));
    }

    #[test]
    fn test_resolve_root_is_absolute() {
        let resolved = resolve_root("engine").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("engine"));
        assert_eq!(resolve_root("/work/engine").unwrap(), PathBuf::from("/work/engine"));
        assert!(resolve_root("").is_err());
    }

    #[test]
    fn test_database_path_resolution() {
        let root = Path::new("/work/engine");
        let mut demo = DemoSettings::default();
        assert_eq!(
            demo.database_path(root),
            Some(PathBuf::from("/work/engine/spec/dummy/db/development.sqlite3"))
        );

        demo.database_url = "sqlite:///tmp/demo.db?mode=rwc".to_string();
        assert_eq!(demo.database_path(root), Some(PathBuf::from("/tmp/demo.db")));

        demo.database_url = "sqlite::memory:".to_string();
        assert_eq!(demo.database_path(root), None);
    }
}
