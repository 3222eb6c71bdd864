//! Normalization: nested entities in, flat entity table plus id references out.
//!
//! Each entity type describes its nested relations through [`Schema`]. A
//! [`Node`] owns a [`Location`], which is stored separately under its
//! composite id so co-located nodes share one location entity.
//!
//! Denormalization tolerates dangling references: ids without a matching
//! entity (or whose nested relations are missing) are skipped.

use explorer_protocol::{Node, SearchResult};

use crate::entities::{EntityTable, NodeEntity};

/// Describes how one entity type is flattened into and rebuilt from an
/// [`EntityTable`].
pub trait Schema: Sized {
    /// Write this entity and its nested relations into `entities`,
    /// returning the reference to store in place of it.
    fn flatten(self, entities: &mut EntityTable) -> String;

    /// Reconstruct the nested entity, or `None` if anything is missing.
    fn rebuild(key: &str, entities: &EntityTable) -> Option<Self>;
}

impl Schema for Node {
    fn flatten(self, entities: &mut EntityTable) -> String {
        let location_id = self.location.id();
        entities.upsert_location(location_id.clone(), self.location);
        entities.upsert_node(NodeEntity {
            id: self.id.clone(),
            title: self.title,
            location: location_id,
        });
        self.id
    }

    fn rebuild(key: &str, entities: &EntityTable) -> Option<Self> {
        let node = entities.nodes.get(key)?;
        let location = entities.locations.get(&node.location)?;
        Some(Node::new(node.id.clone(), node.title.clone(), location.clone()))
    }
}

impl Schema for SearchResult {
    fn flatten(self, entities: &mut EntityTable) -> String {
        let key = self.entity_key();
        entities.upsert_search_result(key.clone(), self);
        key
    }

    fn rebuild(key: &str, entities: &EntityTable) -> Option<Self> {
        entities.search_results.get(key).cloned()
    }
}

/// Result of normalizing an item or a list of items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized<R> {
    pub result: R,
    pub entities: EntityTable,
}

/// Normalize an ordered list. `result` keeps the input order.
pub fn normalize<S: Schema>(items: impl IntoIterator<Item = S>) -> Normalized<Vec<String>> {
    let mut entities = EntityTable::new();
    let result = items
        .into_iter()
        .map(|item| item.flatten(&mut entities))
        .collect();
    Normalized { result, entities }
}

/// Normalize a single item.
pub fn normalize_one<S: Schema>(item: S) -> Normalized<String> {
    let mut entities = EntityTable::new();
    let result = item.flatten(&mut entities);
    Normalized { result, entities }
}

/// Rebuild a list from references, omitting any that do not resolve.
pub fn denormalize<S, K>(keys: impl IntoIterator<Item = K>, entities: &EntityTable) -> Vec<S>
where
    S: Schema,
    K: AsRef<str>,
{
    keys.into_iter()
        .filter_map(|key| S::rebuild(key.as_ref(), entities))
        .collect()
}

/// Rebuild a single entity.
pub fn denormalize_one<S: Schema>(key: &str, entities: &EntityTable) -> Option<S> {
    S::rebuild(key, entities)
}
