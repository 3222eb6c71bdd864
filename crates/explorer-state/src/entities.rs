use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use explorer_protocol::{Location, SearchResult};

/// A node with its location replaced by the location's entity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntity {
    pub id: String,
    pub title: String,
    pub location: String,
}

/// Flat, id-keyed storage for every entity type.
///
/// Merging follows one rule per type: nodes and search results are
/// replaced by id, locations merge monotonically (a reverse-geocoded
/// location is never downgraded and a known title is never erased).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTable {
    #[serde(default)]
    pub nodes: HashMap<String, NodeEntity>,
    #[serde(default)]
    pub locations: HashMap<String, Location>,
    #[serde(default)]
    pub search_results: HashMap<String, SearchResult>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.locations.is_empty() && self.search_results.is_empty()
    }

    pub fn upsert_node(&mut self, node: NodeEntity) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn upsert_search_result(&mut self, key: String, result: SearchResult) {
        self.search_results.insert(key, result);
    }

    /// Insert or merge a location. Returns false if the incoming value was
    /// dropped because the stored one is already better resolved.
    pub fn upsert_location(&mut self, id: String, incoming: Location) -> bool {
        match self.locations.get_mut(&id) {
            Some(existing) if existing.is_reverse_geocoded && !incoming.is_reverse_geocoded => {
                tracing::trace!(location = %id, "Keeping reverse-geocoded location");
                false
            }
            Some(existing) => {
                let title = incoming.title.or_else(|| existing.title.take());
                *existing = Location { title, ..incoming };
                true
            }
            None => {
                self.locations.insert(id, incoming);
                true
            }
        }
    }

    /// Deep-merge another table into this one, type by type and id by id.
    pub fn merge(&mut self, incoming: EntityTable) {
        for (_, node) in incoming.nodes {
            self.upsert_node(node);
        }
        for (id, location) in incoming.locations {
            self.upsert_location(id, location);
        }
        for (key, result) in incoming.search_results {
            self.upsert_search_result(key, result);
        }
    }
}
