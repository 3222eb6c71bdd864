//! Explorer State - the single source of truth behind the explorer UI.
//!
//! Nodes, locations and search results live once in an [`EntityTable`];
//! everything else refers to them by id. All mutations go through
//! [`reduce`], and [`Store`] memoizes the derived views against revision
//! counters bumped on every write.

pub mod entities;
pub mod normalize;
pub mod pagination;
pub mod reducer;
pub mod store;
pub mod topology;
pub mod views;

pub use entities::{EntityTable, NodeEntity};
pub use normalize::{denormalize, denormalize_one, normalize, normalize_one, Normalized, Schema};
pub use pagination::{Keyed, Paginator};
pub use reducer::{reduce, Action, State};
pub use store::{Revisions, Store};
pub use topology::merge_topologies;
pub use views::Connection;
