//! Data source traits, abstracting the excluded API client layer.
//!
//! Implementations wrap GraphQL/REST clients, geocoding services, or (in
//! tests and the CLI) in-memory fixtures. Each call is an independent
//! future; callers make no assumption about completion order.

use std::future::Future;
use std::pin::Pin;

use explorer_protocol::{RawNode, RawTopology, ResultKind, SearchResult};

use crate::SourceError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A remote search backend (stream search, place search).
pub trait SearchSource: Send + Sync {
    /// The tag every result from this source carries.
    fn kind(&self) -> ResultKind;

    fn search<'a>(&'a self, phrase: &'a str)
        -> BoxFuture<'a, Result<Vec<SearchResult>, SourceError>>;
}

/// Supplies the operator nodes of the network.
pub trait NodeSource: Send + Sync {
    fn fetch_nodes(&self) -> BoxFuture<'_, Result<Vec<RawNode>, SourceError>>;
}

/// Supplies topology measurements, one report per tracker.
pub trait TopologySource: Send + Sync {
    fn fetch_trackers(&self) -> BoxFuture<'_, Result<Vec<String>, SourceError>>;

    /// Topology seen by `tracker`, restricted to `stream_id` if given.
    fn fetch_topology<'a>(
        &'a self,
        tracker: &'a str,
        stream_id: Option<&'a str>,
    ) -> BoxFuture<'a, Result<RawTopology, SourceError>>;
}

/// Reverse geocoding: coordinates to a place name.
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the service knows no name for the coordinates.
    fn reverse<'a>(
        &'a self,
        longitude: f64,
        latitude: f64,
    ) -> BoxFuture<'a, Result<Option<String>, SourceError>>;
}
