//! Error types for branch-sweep
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for branch-sweep
#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Sweep error: {0}")]
    Sweep(#[from] SweepError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from running git subcommands or opening the repository
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git is not installed or not in PATH")]
    NotInstalled,

    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Git command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Semaphore acquire failed")]
    SemaphoreError,

    #[error("Gitoxide error: {0}")]
    Gix(String),
}

/// Errors from classifying and pruning branches
#[derive(Error, Debug)]
pub enum SweepError {
    /// The base branch is missing from the local refs. Fatal: aborts the
    /// whole run before any branch is classified.
    #[error("no branch named '{0}' found in this repo")]
    NoSuchBranch(String),

    /// One candidate's classification pipeline failed. Scoped to that
    /// branch; other candidates are unaffected.
    #[error("failed to classify branch '{branch}': {source}")]
    Classification {
        branch: String,
        #[source]
        source: Box<Error>,
    },

    /// `git cherry` printed a line that is neither `- <id>` nor `+ <id>`.
    #[error("unexpected output from git cherry: {0:?}")]
    UnexpectedCherryLine(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<gix::open::Error> for GitError {
    fn from(e: gix::open::Error) -> Self {
        GitError::Gix(e.to_string())
    }
}

impl From<gix::discover::Error> for GitError {
    fn from(e: gix::discover::Error) -> Self {
        GitError::Gix(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SweepError::NoSuchBranch("develop".to_string());
        assert!(err.to_string().contains("no branch named 'develop'"));

        let err = GitError::CommandFailed {
            command: "git merge-base main feature".to_string(),
            stderr: "fatal: Not a valid object name feature".to_string(),
        };
        assert!(err.to_string().contains("merge-base"));
        assert!(err.to_string().contains("Not a valid object name"));

        let err = GitError::NotARepository(PathBuf::from("/tmp/foo"));
        assert!(err.to_string().contains("/tmp/foo"));
    }

    #[test]
    fn test_classification_error_names_branch() {
        let source = Box::new(Error::Git(GitError::CommandFailed {
            command: "git cherry main abc".to_string(),
            stderr: "fatal: bad revision".to_string(),
        }));
        let err = SweepError::Classification {
            branch: "feature/login".to_string(),
            source,
        };
        assert!(err.to_string().contains("feature/login"));
    }

    #[test]
    fn test_error_conversion() {
        let git_err = GitError::NotInstalled;
        let _top_err: Error = git_err.into();

        let sweep_err = SweepError::NoSuchBranch("main".to_string());
        let _top_err: Error = sweep_err.into();
    }
}
