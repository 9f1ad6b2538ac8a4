//! Integration tests for sketch resolution

mod cli_contracts;
mod entry_planning;
mod shared_index;
mod sketch_resolution;
mod support;
mod tree_structure;
