//! Tooling & Integration Layer
//!
//! Command-line front end over the sketch index and watch daemon.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
