//! Branch deletion
//!
//! Deletion is the only mutating step of a sweep. The base branch is checked
//! out first - git refuses to delete the branch the working tree is on - and
//! only then are the flagged branches removed one at a time.

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::git::GitExecutor;

/// Outcome of one branch deletion
#[derive(Debug)]
pub struct DeletionOutcome {
    /// Branch name
    pub branch: String,
    /// Git's confirmation line (e.g. `Deleted branch x (was abc123).`),
    /// or the failure for this branch
    pub result: Result<String>,
}

impl DeletionOutcome {
    /// Whether this branch was removed
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Branch deletion executor
pub struct BranchDeleter {
    git: GitExecutor,
}

impl BranchDeleter {
    /// Create a deleter running against the executor's repository
    pub fn new(git: GitExecutor) -> Self {
        Self { git }
    }

    /// Delete every branch in `deletable`, tolerating per-branch failure
    ///
    /// Checks out `base` before touching anything; a checkout failure is
    /// fatal and nothing gets deleted. Each branch is then force-deleted
    /// (`branch -D`) - the "not fully merged" safety check is bypassed
    /// because squash-merge status was already established by content
    /// comparison, which ancestry-based safety cannot see. One branch
    /// failing never aborts the rest of the batch.
    #[instrument(skip(self, deletable), fields(count = deletable.len()))]
    pub async fn delete_all(&self, base: &str, deletable: &[String]) -> Result<Vec<DeletionOutcome>> {
        self.git.run(&["checkout", base]).await?;

        let mut outcomes = Vec::with_capacity(deletable.len());
        for branch in deletable {
            let result = self.git.run(&["branch", "-D", branch]).await;
            match &result {
                Ok(_) => info!("Deleted branch '{}'", branch),
                Err(e) => warn!("Failed to delete branch '{}': {}", branch, e),
            }
            outcomes.push(DeletionOutcome {
                branch: branch.clone(),
                result,
            });
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, GitError};

    #[test]
    fn test_outcome_success() {
        let outcome = DeletionOutcome {
            branch: "feature".to_string(),
            result: Ok("Deleted branch feature (was abc123).".to_string()),
        };
        assert!(outcome.is_success());
    }

    #[test]
    fn test_outcome_failure() {
        let outcome = DeletionOutcome {
            branch: "feature".to_string(),
            result: Err(Error::Git(GitError::CommandFailed {
                command: "git branch -D feature".to_string(),
                stderr: "error: branch 'feature' not found.".to_string(),
            })),
        };
        assert!(!outcome.is_success());
    }

    // Deletion against real repositories is covered in tests/integration_test.rs
}
