//! Sketch tree: in-memory model of the sketches directory

pub mod builder;
pub mod node;
pub mod path;
pub mod walker;

pub use builder::{BuiltTree, FileTable, TreeBuilder};
pub use node::{NodeKind, SketchNode, SketchTree};
pub use walker::WalkerConfig;
