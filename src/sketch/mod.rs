//! Sketch classification, request resolution and entry planning

pub mod config;
pub mod entries;
pub mod request;
pub mod resolver;

pub use config::{PartialSketchConfig, SidecarLoader, SketchConfig, SketchConfigLoader};
pub use entries::{plan_entries, CompilationEntry, CompileEntry, EntryPlan, EntryPlanner};
pub use request::{resolve_request, RequestKind, RequestTarget, ResolvedRequest};
pub use resolver::{ResolutionTables, ResolvedSketch, SketchKind, SketchResolver};
