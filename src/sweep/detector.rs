//! Squash-merge detection
//!
//! Ancestry tests cannot recognize a squash merge: the squash commit on the
//! base branch has a different identity and no ancestry edge back to the
//! branch it came from. Instead, the whole divergence of a candidate branch
//! is collapsed into one throwaway commit parented on the merge base - the
//! exact shape a squash merge would have produced - and `git cherry` decides
//! whether an equivalent patch already exists in the base branch's history.
//!
//! The throwaway commit is never attached to a ref; it becomes ordinary
//! garbage for git's unreferenced-object collection once the run ends.

use futures::future::join_all;
use tracing::{debug, instrument};

use crate::error::{Error, GitError, Result, SweepError};
use crate::git::GitExecutor;

/// Classification of one candidate branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every change the branch introduced is already present in the base
    Deletable,
    /// The branch still carries content missing from the base
    Retained,
}

impl Verdict {
    /// Whether the branch can be pruned without losing work
    pub fn is_deletable(self) -> bool {
        matches!(self, Verdict::Deletable)
    }
}

/// Per-candidate classification result
///
/// Failures stay scoped to the branch they belong to, so one broken
/// candidate never invalidates the rest of a batch.
#[derive(Debug)]
pub struct Classification {
    /// Candidate branch name
    pub branch: String,
    /// Verdict, or the failure that aborted this candidate's pipeline
    pub verdict: Result<Verdict>,
}

/// Squash-merge detector
pub struct SquashDetector {
    git: GitExecutor,
}

impl SquashDetector {
    /// Create a detector running against the executor's repository
    pub fn new(git: GitExecutor) -> Self {
        Self { git }
    }

    /// Classify one candidate branch against the base branch
    ///
    /// Any command failure is wrapped with the candidate's name attached.
    #[instrument(skip(self))]
    pub async fn classify(&self, base: &str, candidate: &str) -> Result<Verdict> {
        self.classify_pipeline(base, candidate).await.map_err(|e| {
            SweepError::Classification {
                branch: candidate.to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }

    /// Classify every candidate concurrently
    ///
    /// Candidates are independent reads of the same repository state, so
    /// they fan out as one task each, bounded by the executor's semaphore.
    /// Results come back in input order.
    pub async fn classify_all(&self, base: &str, candidates: &[String]) -> Vec<Classification> {
        let tasks = candidates.iter().map(|candidate| async move {
            Classification {
                branch: candidate.clone(),
                verdict: self.classify(base, candidate).await,
            }
        });

        join_all(tasks).await
    }

    async fn classify_pipeline(&self, base: &str, candidate: &str) -> Result<Verdict> {
        let tip_tree_rev = format!("{candidate}^{{tree}}");
        let merge_base_args = ["merge-base", base, candidate];
        let rev_parse_args = ["rev-parse", &tip_tree_rev];
        let (merge_base, tip_tree) = tokio::join!(
            self.git.run(&merge_base_args),
            self.git.run(&rev_parse_args),
        );

        let merge_base = match merge_base {
            Ok(id) => id,
            // merge-base exits non-zero with nothing on stderr when the two
            // branches share no history at all. A branch that never shared
            // history was never squash-merged, so it is not safe to delete.
            Err(Error::Git(GitError::CommandFailed { ref stderr, .. }))
                if stderr.trim().is_empty() =>
            {
                debug!("'{}' shares no history with '{}'", candidate, base);
                return Ok(Verdict::Retained);
            }
            Err(e) => return Err(e),
        };
        let tip_tree = tip_tree?;

        // A candidate with no net change since the merge base would collapse
        // into an empty commit, which cherry reports as unapplied. The edge
        // is decided on tree identity instead: same tree, nothing to lose.
        let merge_base_tree_rev = format!("{merge_base}^{{tree}}");
        let merge_base_tree = self.git.run(&["rev-parse", &merge_base_tree_rev]).await?;
        if tip_tree == merge_base_tree {
            debug!("'{}' introduces no change since the merge base", candidate);
            return Ok(Verdict::Deletable);
        }

        // Collapse the candidate's divergence into a single dangling commit
        // parented on the merge base.
        let message = format!("Temp commit for {candidate}");
        let synthetic = self
            .git
            .run(&["commit-tree", &tip_tree, "-p", &merge_base, "-m", &message])
            .await?;

        let cherry = self.git.run(&["cherry", base, &synthetic]).await?;
        verdict_from_cherry(&cherry)
    }
}

/// Decode `git cherry` output
///
/// Each line is `- <id>` (patch already applied upstream) or `+ <id>` (not
/// applied). Any line outside that wire format fails loudly rather than
/// defaulting. No `+` line means nothing is missing from the base.
fn verdict_from_cherry(output: &str) -> Result<Verdict> {
    let mut verdict = Verdict::Deletable;

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        match cherry_line_sign(line) {
            Some('-') => {}
            Some('+') => verdict = Verdict::Retained,
            _ => return Err(SweepError::UnexpectedCherryLine(line.to_string()).into()),
        }
    }

    Ok(verdict)
}

/// Extract the leading sign of a well-formed cherry line, if any
fn cherry_line_sign(line: &str) -> Option<char> {
    let mut chars = line.chars();
    let sign = chars.next()?;
    if sign != '-' && sign != '+' {
        return None;
    }
    if chars.next() != Some(' ') {
        return None;
    }
    let id = chars.as_str();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(sign)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_applied_commit_is_deletable() {
        let verdict =
            verdict_from_cherry("- fb02bbcc764175cd630c7241863444732dd464da").unwrap();
        assert_eq!(verdict, Verdict::Deletable);
    }

    #[test]
    fn test_unapplied_commit_is_retained() {
        let verdict =
            verdict_from_cherry("+ 0e58211280ff14e86909c9713dd256215da7d3f3").unwrap();
        assert_eq!(verdict, Verdict::Retained);
    }

    #[test]
    fn test_any_unapplied_line_retains() {
        let verdict = verdict_from_cherry("- aaaa\n+ bbbb\n- cccc").unwrap();
        assert_eq!(verdict, Verdict::Retained);
    }

    #[test]
    fn test_empty_output_is_deletable() {
        assert_eq!(verdict_from_cherry("").unwrap(), Verdict::Deletable);
    }

    #[test]
    fn test_malformed_line_fails_loudly() {
        for output in ["applied", "* aaaa", "-aaaa", "- ", "- xyz!", "+  aaaa"] {
            let err = verdict_from_cherry(output).unwrap_err();
            assert!(
                err.to_string().contains("unexpected output"),
                "expected parse failure for {output:?}, got {err}"
            );
        }
    }

    #[test]
    fn test_cherry_line_sign() {
        assert_eq!(cherry_line_sign("- abc123"), Some('-'));
        assert_eq!(cherry_line_sign("+ abc123"), Some('+'));
        assert_eq!(cherry_line_sign("~ abc123"), None);
        assert_eq!(cherry_line_sign("- "), None);
        assert_eq!(cherry_line_sign("-"), None);
    }

    proptest! {
        #[test]
        fn verdict_parse_never_panics(output in ".*") {
            let _ = verdict_from_cherry(&output);
        }

        #[test]
        fn applied_only_output_is_deletable(ids in proptest::collection::vec("[0-9a-f]{40}", 1..5)) {
            let output = ids
                .iter()
                .map(|id| format!("- {id}"))
                .collect::<Vec<_>>()
                .join("\n");
            prop_assert_eq!(verdict_from_cherry(&output).unwrap(), Verdict::Deletable);
        }
    }
}
