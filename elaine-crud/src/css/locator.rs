//! Tailwind CSS compiler discovery
//!
//! Candidates are probed in order; the first executable whose `--help` output
//! identifies it as Tailwind wins.

use std::path::{Path, PathBuf};

use crate::runner::ShellCommand;

/// Text a genuine compiler prints in its help output
pub const EXPECTED_MARKER: &str = "tailwindcss";

/// Text that disqualifies a candidate (e.g. a broken npm shim)
pub const ERROR_MARKER: &str = "Error";

/// A compiler that passed the probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedCompiler {
    /// Path of the executable
    pub path: PathBuf,
    /// Combined `--help` output
    pub help: String,
}

/// Ordered search over candidate compiler paths
#[derive(Debug, Clone)]
pub struct CompilerLocator {
    candidates: Vec<PathBuf>,
}

impl CompilerLocator {
    /// Built-in search list for a package root
    ///
    /// `$HOME/.local/bin/tailwindcss` is included only when a home directory resolves.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        let mut candidates = vec![
            root.join("bin").join("tailwindcss"),
            root.join("node_modules").join(".bin").join("tailwindcss"),
            PathBuf::from("/usr/local/bin/tailwindcss"),
            PathBuf::from("/opt/homebrew/bin/tailwindcss"),
        ];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".local").join("bin").join("tailwindcss"));
        }
        Self { candidates }
    }

    /// Search exactly `candidates`, in order
    #[must_use]
    pub const fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Search `extra` before the current list
    #[must_use]
    pub fn prepend(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut candidates: Vec<PathBuf> = extra.into_iter().collect();
        candidates.append(&mut self.candidates);
        self.candidates = candidates;
        self
    }

    /// Candidate paths in search order
    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First qualifying compiler, if any
    #[must_use]
    pub fn locate(&self) -> Option<LocatedCompiler> {
        self.candidates.iter().find_map(|path| probe(path))
    }
}

/// Check one candidate
fn probe(path: &Path) -> Option<LocatedCompiler> {
    if !is_executable(path) {
        tracing::trace!(path = %path.display(), "candidate missing or not executable");
        return None;
    }

    let output = match ShellCommand::new(path.to_string_lossy()).arg("--help").output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "candidate could not be started");
            return None;
        }
    };

    let mut help = String::from_utf8_lossy(&output.stdout).into_owned();
    help.push_str(&String::from_utf8_lossy(&output.stderr));

    if qualifies(&help) {
        tracing::debug!(path = %path.display(), "found Tailwind CSS compiler");
        Some(LocatedCompiler {
            path: path.to_path_buf(),
            help,
        })
    } else {
        tracing::debug!(path = %path.display(), "candidate rejected by help probe");
        None
    }
}

/// Help output identifies a working compiler
#[must_use]
pub fn qualifies(help: &str) -> bool {
    help.contains(EXPECTED_MARKER) && !help.contains(ERROR_MARKER)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
