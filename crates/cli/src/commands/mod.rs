//! Command handlers for the lexchunk CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ingest;
pub mod inspect;
pub mod stats;

// Re-export command types for convenience
pub use ingest::IngestCommand;
pub use inspect::InspectCommand;
pub use stats::StatsCommand;
