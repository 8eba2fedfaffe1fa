//! Engine test suite tasks

use std::fs;
use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};

use crate::config::{absolute_root, SpecSettings};
use crate::error::{ElaineError, Result};
use crate::runner::{CommandTemplate, ShellCommand};

const CONTROLLER_SPEC_SUFFIX: &str = "_controller_spec.rb";

/// Runs spec files through the configured runner
#[derive(Debug, Clone)]
pub struct SpecRunner {
    root: PathBuf,
    settings: SpecSettings,
}

impl SpecRunner {
    /// Create a runner for a package root
    pub fn new(root: impl AsRef<Path>, settings: &SpecSettings) -> Self {
        Self {
            root: absolute_root(root.as_ref()),
            settings: settings.clone(),
        }
    }

    fn runner_for(&self, target: &Path) -> Result<ShellCommand> {
        let template = CommandTemplate::new("spec runner", &self.settings.runner)?;
        Ok(template
            .render(&[])
            .arg(target.to_string_lossy())
            .current_dir(&self.root))
    }

    /// Command running the integration suite
    pub fn integration_command(&self) -> Result<ShellCommand> {
        self.runner_for(&self.settings.integration_dir)
    }

    /// Command running one controller spec, or all of them when `name` is `None`
    ///
    /// # Errors
    ///
    /// Returns [`ElaineError::SpecNotFound`] when the named spec file does not exist.
    pub fn controller_command(&self, name: Option<&str>) -> Result<ShellCommand> {
        let Some(name) = name else {
            return self.runner_for(&self.settings.controller_dir);
        };

        let relative = self
            .settings
            .controller_dir
            .join(format!("{}{CONTROLLER_SPEC_SUFFIX}", normalize_controller_name(name)));

        if !self.root.join(&relative).is_file() {
            return Err(ElaineError::SpecNotFound {
                path: relative,
                available: self.available_controllers(),
            });
        }

        self.runner_for(&relative)
    }

    /// Run the integration suite
    pub fn run_integration(&self) -> Result<()> {
        self.integration_command()?.run()
    }

    /// Run controller specs
    pub fn run_controller(&self, name: Option<&str>) -> Result<()> {
        self.controller_command(name)?.run()
    }

    /// Controller names with a spec file, sorted
    #[must_use]
    pub fn available_controllers(&self) -> Vec<String> {
        let dir = self.root.join(&self.settings.controller_dir);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|file| file.strip_suffix(CONTROLLER_SPEC_SUFFIX))
                    .map(ToString::to_string)
            })
            .collect();
        names.sort();
        names
    }
}

/// `BookCopies`, `book_copies_controller` and `book-copies` all map to `book_copies`
#[must_use]
pub fn normalize_controller_name(name: &str) -> String {
    let snake = name.trim().to_case(Case::Snake);
    snake
        .strip_suffix("_controller")
        .map_or(snake.clone(), ToString::to_string)
}
