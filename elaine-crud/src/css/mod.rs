//! Engine stylesheet build
//!
//! Builds the engine stylesheet with the standalone Tailwind CSS compiler:
//!
//! 1. Locate a compiler ([`CompilerLocator`])
//! 2. Run it with the configured input, output and config paths
//! 3. Stamp the output with a generated header carrying a timestamp and the
//!    compiler version
//!
//! A missing compiler or a failed build is terminal; the output file is only
//! rewritten after a successful run.

pub mod header;
pub mod locator;
pub mod platform;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{absolute_root, CssSettings};
use crate::error::{ElaineError, Result};
use crate::runner::ShellCommand;

pub use header::{extract_version, render_header, UNKNOWN_VERSION};
pub use locator::{CompilerLocator, LocatedCompiler};
pub use platform::{InstallInstructions, Platform};

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Compiler that produced the stylesheet
    pub compiler: PathBuf,
    /// Stylesheet that was written
    pub output: PathBuf,
    /// Version recorded in the header
    pub version: String,
    /// Compiler standard output
    pub stdout: String,
    /// Compiler standard error (Tailwind reports timings here)
    pub stderr: String,
}

/// Stylesheet builder bound to a package root
#[derive(Debug, Clone)]
pub struct CssBuilder {
    root: PathBuf,
    settings: CssSettings,
    locator: CompilerLocator,
    platform: Platform,
}

impl CssBuilder {
    /// Create a builder searching the default candidates plus configured extras
    ///
    /// A relative `root` is made absolute against the current directory.
    pub fn new(root: impl AsRef<Path>, settings: &CssSettings) -> Self {
        let root = absolute_root(root.as_ref());
        let extra: Vec<PathBuf> = settings
            .extra_candidates
            .iter()
            .map(|path| root.join(path))
            .collect();
        let locator = CompilerLocator::for_root(&root).prepend(extra);

        Self {
            root,
            settings: settings.clone(),
            locator,
            platform: Platform::detect(),
        }
    }

    /// Replace the compiler search list
    #[must_use]
    pub fn with_locator(mut self, locator: CompilerLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Report install instructions for `platform` instead of the detected one
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Compiler paths searched, in order
    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        self.locator.candidates()
    }

    /// Absolute path of the generated stylesheet
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.settings.output)
    }

    /// Find the compiler
    ///
    /// # Errors
    ///
    /// Returns [`ElaineError::CompilerNotFound`] with install instructions when
    /// no candidate qualifies.
    pub fn locate(&self) -> Result<LocatedCompiler> {
        self.locator.locate().ok_or_else(|| {
            tracing::warn!(
                candidates = self.locator.candidates().len(),
                "no Tailwind CSS compiler found"
            );
            ElaineError::CompilerNotFound {
                instructions: self.platform.install_instructions(),
            }
        })
    }

    /// Compile the stylesheet and stamp it with the generated header
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No compiler is found (the compiler is never invoked)
    /// - The compiler cannot be started or exits non-zero (no header is written)
    /// - The output file cannot be read back or rewritten
    pub fn build(&self, minify: bool) -> Result<BuildReport> {
        let compiler = self.locate()?;
        let output = self.output_path();

        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir).map_err(|e| ElaineError::io(dir, e))?;
        }

        let mut command = ShellCommand::new(compiler.path.to_string_lossy())
            .arg("-i")
            .arg(self.root.join(&self.settings.input).to_string_lossy())
            .arg("-o")
            .arg(output.to_string_lossy())
            .arg("-c")
            .arg(self.root.join(&self.settings.config).to_string_lossy())
            .current_dir(&self.root);
        if minify {
            command = command.arg("--minify");
        }

        tracing::info!(command = %command.display(), "compiling stylesheet");
        let result = command.output()?;
        let stdout = String::from_utf8_lossy(&result.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&result.stderr).into_owned();

        if !result.status.success() {
            return Err(ElaineError::BuildFailed {
                status: result.status,
                stdout,
                stderr,
            });
        }

        let css = fs::read_to_string(&output).map_err(|e| ElaineError::io(&output, e))?;
        let version = extract_version(&compiler.help);
        fs::write(&output, header::stamp(&css, Utc::now(), &version))
            .map_err(|e| ElaineError::io(&output, e))?;

        tracing::info!(output = %output.display(), %version, "stylesheet written");

        Ok(BuildReport {
            compiler: compiler.path,
            output,
            version,
            stdout,
            stderr,
        })
    }
}
