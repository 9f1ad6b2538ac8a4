//! Milka: sketch resolution for a live-reloading creative-coding dev server
//!
//! Walks a sketches directory into an in-memory tree, decides which entries
//! are addressable sketches, and answers which sketch owns an incoming
//! request path. Also plans the compile entries a bundler needs for a sketch.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod sketch;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod watch;

pub use concurrency::{RebuildOutcome, SharedIndex};
pub use error::{ApiError, PlanError, ResolveError, SketchConfigError};
pub use index::{IndexOptions, SketchIndex};
