//! Config sources, lowest precedence first

pub mod environment;
pub mod workspace_file;
