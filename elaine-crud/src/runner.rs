//! External command execution
//!
//! Tasks delegate to external programs (Tailwind, Rails, rspec, sqlite3).
//! Commands run synchronously; a non-zero exit is an error.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{ElaineError, Result};

/// A configured command line with `{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    parts: Vec<String>,
}

impl CommandTemplate {
    /// Create a template from configured parts
    ///
    /// # Errors
    ///
    /// Returns [`ElaineError::Config`] when `parts` is empty or the program is blank.
    pub fn new(name: &str, parts: &[String]) -> Result<Self> {
        match parts.first() {
            Some(program) if !program.trim().is_empty() => Ok(Self {
                parts: parts.to_vec(),
            }),
            _ => Err(ElaineError::Config(format!("{name} command is empty"))),
        }
    }

    /// Substitute placeholders and build the command
    #[must_use]
    pub fn render(&self, vars: &[(&str, String)]) -> ShellCommand {
        let mut rendered = self.parts.iter().map(|part| {
            vars.iter().fold(part.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{key}}}"), value)
            })
        });

        // `new` guarantees at least one part
        let program = rendered.next().unwrap_or_default();
        ShellCommand::new(program).args(rendered)
    }
}

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl ShellCommand {
    /// Create a command for `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir` instead of the current directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Command line as shown to the user
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Run with inherited stdio and wait for completion
    ///
    /// # Errors
    ///
    /// Returns [`ElaineError::Spawn`] if the program cannot be started and
    /// [`ElaineError::CommandFailed`] if it exits non-zero.
    pub fn run(&self) -> Result<()> {
        tracing::info!(command = %self.display(), dir = ?self.current_dir, "running command");

        let status = self
            .command()
            .status()
            .map_err(|source| ElaineError::Spawn {
                command: self.display(),
                source,
            })?;

        if !status.success() {
            return Err(ElaineError::CommandFailed {
                command: self.display(),
                status,
            });
        }

        Ok(())
    }

    /// Run and capture stdout, stderr and status
    ///
    /// A non-zero exit is not an error here; callers inspect the status.
    ///
    /// # Errors
    ///
    /// Returns [`ElaineError::Spawn`] if the program cannot be started.
    pub fn output(&self) -> Result<Output> {
        tracing::debug!(command = %self.display(), "capturing command output");

        self.command()
            .output()
            .map_err(|source| ElaineError::Spawn {
                command: self.display(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_empty_template_is_rejected() {
        assert!(CommandTemplate::new("server", &[]).is_err());
        assert!(CommandTemplate::new("server", &parts(&["  "])).is_err());
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let template = CommandTemplate::new(
            "server",
            &parts(&["bin/rails", "server", "-b", "{host}", "-p", "{port}"]),
        )
        .unwrap();
        let command = template.render(&[
            ("host", "0.0.0.0".to_string()),
            ("port", "4000".to_string()),
        ]);

        assert_eq!(command.program(), "bin/rails");
        assert_eq!(command.display(), "bin/rails server -b 0.0.0.0 -p 4000");
    }

    #[test]
    fn test_unknown_placeholders_are_left_alone() {
        let template = CommandTemplate::new("db", &parts(&["sqlite3", "{nope}"])).unwrap();
        let command = template.render(&[("port", "1".to_string())]);
        assert_eq!(command.arguments(), ["{nope}".to_string()]);
    }

    #[test]
    fn test_missing_program_reports_spawn_error() {
        let err = ShellCommand::new("definitely-not-a-real-program-elaine")
            .run()
            .unwrap_err();
        assert!(matches!(err, ElaineError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_reports_command_failed() {
        let err = ShellCommand::new("sh").args(["-c", "exit 3"]).run().unwrap_err();
        match err {
            ElaineError::CommandFailed { command, status } => {
                assert_eq!(command, "sh -c exit 3");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
