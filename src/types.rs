//! Core types shared across the sketch resolution engine.

/// NodeId: stable index of a node inside a `SketchTree` arena
pub type NodeId = usize;
