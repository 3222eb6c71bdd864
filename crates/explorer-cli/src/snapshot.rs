//! Offline network snapshots served through the explorer's source traits.
//!
//! A snapshot is one JSON document holding everything the remote APIs
//! would otherwise deliver:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "0xab..", "location": { "latitude": 60.1, "longitude": 24.9 } }],
//!   "trackers": { "tracker-1": { "0xab..": { "0xcd..": { "rtt": 12.5 } } } },
//!   "streams": [{ "id": "s1", "type": "streams", "name": "Weather" }],
//!   "places": [],
//!   "geocode": { "24.9|60.1": "Helsinki, Finland" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use explorer_network::{BoxFuture, Geocoder, NodeSource, SearchSource, SourceError, TopologySource};
use explorer_protocol::{Location, RawNode, RawTopology, ResultKind, SearchResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub nodes: Vec<RawNode>,
    /// Tracker id to that tracker's topology report. Reports are not
    /// stream-specific.
    pub trackers: IndexMap<String, RawTopology>,
    pub streams: Vec<SearchResult>,
    pub places: Vec<SearchResult>,
    /// Location id (`"lng|lat"`) to place name.
    pub geocode: HashMap<String, String>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid snapshot {}", path.display()))
    }

    /// Search over the snapshot's streams.
    pub fn stream_search(&self) -> SnapshotSearch {
        SnapshotSearch::new(ResultKind::Streams, self.streams.clone())
    }

    /// Search over the snapshot's places.
    pub fn place_search(&self) -> SnapshotSearch {
        SnapshotSearch::new(ResultKind::Locations, self.places.clone())
    }
}

impl NodeSource for Snapshot {
    fn fetch_nodes(&self) -> BoxFuture<'_, Result<Vec<RawNode>, SourceError>> {
        Box::pin(async move { Ok(self.nodes.clone()) })
    }
}

impl TopologySource for Snapshot {
    fn fetch_trackers(&self) -> BoxFuture<'_, Result<Vec<String>, SourceError>> {
        Box::pin(async move { Ok(self.trackers.keys().cloned().collect()) })
    }

    fn fetch_topology<'a>(
        &'a self,
        tracker: &'a str,
        _stream_id: Option<&'a str>,
    ) -> BoxFuture<'a, Result<RawTopology, SourceError>> {
        Box::pin(async move {
            self.trackers
                .get(tracker)
                .cloned()
                .ok_or_else(|| SourceError::Unavailable(format!("unknown tracker {tracker}")))
        })
    }
}

impl Geocoder for Snapshot {
    fn reverse<'a>(
        &'a self,
        longitude: f64,
        latitude: f64,
    ) -> BoxFuture<'a, Result<Option<String>, SourceError>> {
        Box::pin(async move {
            let id = Location::new(longitude, latitude).id();
            Ok(self.geocode.get(&id).cloned())
        })
    }
}

/// Case-insensitive substring search over a fixed result list, matching
/// the name or description.
pub struct SnapshotSearch {
    kind: ResultKind,
    entries: Vec<SearchResult>,
}

impl SnapshotSearch {
    pub fn new(kind: ResultKind, entries: Vec<SearchResult>) -> Self {
        Self { kind, entries }
    }
}

impl SearchSource for SnapshotSearch {
    fn kind(&self) -> ResultKind {
        self.kind
    }

    fn search<'a>(
        &'a self,
        phrase: &'a str,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, SourceError>> {
        Box::pin(async move {
            let phrase = phrase.to_lowercase();
            let hits = self
                .entries
                .iter()
                .filter(|entry| {
                    entry.name.to_lowercase().contains(&phrase)
                        || entry
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&phrase))
                })
                .cloned()
                .collect();
            Ok(hits)
        })
    }
}
