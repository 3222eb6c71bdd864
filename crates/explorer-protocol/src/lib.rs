//! Explorer Protocol - Core types and inbound payload shapes
//!
//! Defines the entities the network explorer tracks (operator nodes,
//! their locations, search results), the raw JSON shapes delivered by the
//! API layer, and the deterministic mnemonic titles derived from node ids.

pub mod constants;
pub mod error;
pub mod raw;
pub mod title;
pub mod types;

pub use constants::*;
pub use error::*;
pub use raw::{RawLatency, RawLocation, RawNode, RawTopology, Topology};
pub use title::node_title;
pub use types::*;
