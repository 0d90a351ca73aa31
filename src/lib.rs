//! Branch Sweep - find and delete local branches already squash-merged into a base branch
//!
//! Squash merges collapse a feature branch into a single commit on the base
//! branch, severing ancestry, so `git branch -d` considers the branch
//! unmerged forever. This crate re-establishes mergedness by content: each
//! candidate's divergence is collapsed into a throwaway commit against the
//! merge base and compared patch-wise against the base branch's history.
//!
//! # Modules
//!
//! - [`git`] - async git command execution and repository discovery
//! - [`sweep`] - squash-merge detection, deletion, and orchestration
//! - [`prompt`] - interactive base-branch and mode selection
//! - [`config`] - configuration loading and persistence
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod git;
pub mod prompt;
pub mod sweep;

pub use config::Config;
pub use error::{Error, Result};
pub use sweep::{Classification, DeletionOutcome, RunMode, SweepReport, Sweeper, Verdict};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
