//! Explorer Network - the asynchronous edge of the explorer core.
//!
//! Remote data arrives through the source traits in [`source`]; the
//! aggregator and loaders here await them concurrently and feed results
//! into the shared [`Store`] in completion order, discarding anything that
//! belongs to a superseded request.

use std::sync::Arc;

use tokio::sync::RwLock;

use explorer_state::Store;

pub mod error;
pub mod geocode;
pub mod loader;
pub mod search;
pub mod source;

pub use error::SourceError;
pub use geocode::LocationResolver;
pub use loader::NetworkLoader;
pub use search::{SearchAggregator, SearchConfig};
pub use source::{BoxFuture, Geocoder, NodeSource, SearchSource, TopologySource};

/// The store instance shared between the UI layer and async tasks.
pub type SharedStore = Arc<RwLock<Store>>;

pub fn shared(store: Store) -> SharedStore {
    Arc::new(RwLock::new(store))
}
