//! CLI command implementations.

pub mod header;
pub mod replay;
pub mod stats;
