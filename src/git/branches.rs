//! Local branch enumeration

use tracing::debug;

use super::GitExecutor;
use crate::error::Result;

/// List local branch names in the order the ref store reports them
///
/// The order is stable for one repository state but not otherwise
/// meaningful. An empty repository yields an empty list. Whether a
/// required base branch is present is the caller's check, not ours.
pub async fn list_local(git: &GitExecutor) -> Result<Vec<String>> {
    let output = git
        .run(&["for-each-ref", "refs/heads/", "--format=%(refname:short)"])
        .await?;

    let branches: Vec<String> = output
        .lines()
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    debug!("Enumerated {} local branches", branches.len());

    Ok(branches)
}
