//! Filesystem watch that keeps the shared sketch index current.

mod events;
mod runtime;

pub use events::{ChangeEvent, WatchConfig};
pub use runtime::{RebuildCallback, RebuildReport, WatchDaemon};
