//! Squash-merge sweep module
//!
//! - `SquashDetector` - classifies candidate branches against a base branch
//! - `BranchDeleter` - removes branches flagged as deletable
//! - `Sweeper` - wires enumeration, detection and deletion into one run

mod deleter;
mod detector;

pub use deleter::*;
pub use detector::*;

use tracing::{info, instrument};

use crate::error::{Result, SweepError};
use crate::git::{GitExecutor, branches};

/// What to do with the branches a sweep flags as deletable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Report only
    List,
    /// Actually delete them
    Delete,
}

/// Result of one sweep run
#[derive(Debug)]
pub struct SweepReport {
    /// The base branch candidates were judged against
    pub base: String,
    /// Branches whose content is fully present in the base
    pub deletable: Vec<String>,
    /// Branches still carrying unmerged work
    pub retained: Vec<String>,
    /// Branches whose classification failed, with the scoped error
    pub failures: Vec<(String, crate::error::Error)>,
    /// Per-branch deletion outcomes (empty in list mode)
    pub deletions: Vec<DeletionOutcome>,
}

/// Sweep orchestrator
///
/// Owns no algorithmic logic: enumerates branches, validates the base,
/// hands candidates to the detector and, in delete mode, the flagged set to
/// the deleter. Mutation starts only after every classification resolved,
/// so analysis never observes a moving repository.
pub struct Sweeper {
    git: GitExecutor,
    detector: SquashDetector,
    deleter: BranchDeleter,
}

impl Sweeper {
    /// Create a sweeper running against the executor's repository
    pub fn new(git: GitExecutor) -> Self {
        let detector = SquashDetector::new(git.clone());
        let deleter = BranchDeleter::new(git.clone());
        Self {
            git,
            detector,
            deleter,
        }
    }

    /// Check that git is available
    pub async fn check_git(&self) -> Result<()> {
        self.git.check_installed().await
    }

    /// List local branches in ref-store order
    pub async fn branches(&self) -> Result<Vec<String>> {
        branches::list_local(&self.git).await
    }

    /// Run a full sweep against `base`
    #[instrument(skip(self))]
    pub async fn run(&self, base: &str, mode: RunMode) -> Result<SweepReport> {
        let branches = self.branches().await?;
        if !branches.iter().any(|b| b == base) {
            return Err(SweepError::NoSuchBranch(base.to_string()).into());
        }

        let candidates: Vec<String> = branches.into_iter().filter(|b| b != base).collect();

        info!(
            "Classifying {} candidate branches against '{}'",
            candidates.len(),
            base
        );

        let classifications = self.detector.classify_all(base, &candidates).await;

        let mut report = SweepReport {
            base: base.to_string(),
            deletable: Vec::new(),
            retained: Vec::new(),
            failures: Vec::new(),
            deletions: Vec::new(),
        };

        for classification in classifications {
            match classification.verdict {
                Ok(Verdict::Deletable) => report.deletable.push(classification.branch),
                Ok(Verdict::Retained) => report.retained.push(classification.branch),
                Err(e) => report.failures.push((classification.branch, e)),
            }
        }

        if mode == RunMode::Delete && !report.deletable.is_empty() {
            report.deletions = self.deleter.delete_all(base, &report.deletable).await?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_equality() {
        assert_eq!(RunMode::List, RunMode::List);
        assert_ne!(RunMode::List, RunMode::Delete);
    }

    // Sweeps against real repositories are covered in tests/integration_test.rs
}
