//! Explorer CLI - a command-line stand-in for the explorer UI.
//!
//! Reads offline network snapshots, feeds them through the explorer core
//! and prints the derived views as JSON.

pub mod config;
pub mod explorer;
pub mod snapshot;

pub use config::{ConfigError, ExplorerConfig};
pub use explorer::{Explorer, NodesPage, TopologyReport};
pub use snapshot::{Snapshot, SnapshotSearch};
