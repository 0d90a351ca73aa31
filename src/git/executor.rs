//! Async git command executor with semaphore-controlled concurrency
//!
//! Provides non-blocking git command execution with:
//! - An explicit repository path (never ambient process CWD)
//! - Semaphore to limit concurrent commands (default: 16)
//! - Captured stderr on failure
//!
//! There is deliberately no per-command timeout: a git failure is treated as
//! immediately fatal to the calling operation, and a hung git process stalls
//! only the task that is waiting on it.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use crate::error::{GitError, Result};

/// Default maximum concurrent git commands
pub const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Async git command executor bound to one repository
///
/// Uses a semaphore to limit concurrent git processes, preventing
/// resource exhaustion when classifying many branches at once.
#[derive(Clone)]
pub struct GitExecutor {
    /// Working directory every command runs in
    repo_path: PathBuf,
    /// Semaphore for concurrency control
    semaphore: Arc<Semaphore>,
}

impl GitExecutor {
    /// Create a new executor for the repository at `repo_path`
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self::with_max_concurrent(repo_path, DEFAULT_MAX_CONCURRENT)
    }

    /// Create an executor with a custom concurrency limit
    pub fn with_max_concurrent(repo_path: impl Into<PathBuf>, max_concurrent: usize) -> Self {
        Self {
            repo_path: repo_path.into(),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// The repository path commands run against
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Check if git is installed and accessible
    pub async fn check_installed(&self) -> Result<()> {
        let output = Command::new("git")
            .arg("--version")
            .output()
            .await
            .map_err(|_| GitError::NotInstalled)?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("git version: {}", version.trim());
            Ok(())
        } else {
            Err(GitError::NotInstalled.into())
        }
    }

    /// Execute a git subcommand and return its stdout
    ///
    /// On success the output has a single trailing newline stripped, so
    /// one-line answers (object ids, ref names) come back bare. On non-zero
    /// exit the captured stderr is surfaced in the error.
    #[instrument(skip(self), fields(args = ?args))]
    pub async fn run(&self, args: &[&str]) -> Result<String> {
        // Acquire semaphore permit
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| GitError::SemaphoreError)?;

        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: e.to_string(),
            })?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            Ok(strip_trailing_newline(stdout))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr,
            }
            .into())
        }
    }
}

/// Remove exactly one trailing newline, if present
///
/// Git terminates output with a single newline; everything before it is
/// payload, including any interior newlines.
fn strip_trailing_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_executor_creation() {
        let executor = GitExecutor::new("/tmp/repo");
        assert_eq!(executor.repo_path(), Path::new("/tmp/repo"));
    }

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline("abc123\n".to_string()), "abc123");
        assert_eq!(strip_trailing_newline("abc123".to_string()), "abc123");
        assert_eq!(strip_trailing_newline("a\nb\n".to_string()), "a\nb");
        assert_eq!(strip_trailing_newline(String::new()), "");
        assert_eq!(strip_trailing_newline("\n".to_string()), "");
    }

    // Tests that actually spawn git live in tests/integration_test.rs
}
