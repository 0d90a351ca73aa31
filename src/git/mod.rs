//! Git integration module
//!
//! - `GitExecutor` - async git subcommand execution bound to one repository
//! - `GitBackend` - gitoxide handle for discovery and read-only ref queries
//! - `branches` - local branch enumeration via the executor

mod backend;
pub mod branches;
mod executor;

pub use backend::*;
pub use executor::*;
