//! Derived views over the normalized state.
//!
//! The functions here are pure; [`Memo`] caches their output against an
//! explicit key so [`crate::Store`] only recomputes after a relevant write.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use explorer_protocol::{Node, SearchResult, Topology};

use crate::entities::EntityTable;
use crate::normalize::{denormalize, denormalize_one};

/// One cached value and the key it was computed for.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Return the cached value for `key`, computing it on a miss.
    pub fn get_or_update(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if !matches!(&self.slot, Some((cached, _)) if *cached == key) {
            tracing::trace!("Recomputing derived view");
            self.slot = None;
        }
        &self.slot.get_or_insert_with(|| (key, compute())).1
    }
}

/// An undirected connection between two visible nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Lexicographically smaller endpoint.
    pub source: String,
    pub target: String,
    /// Worst RTT reported in either direction.
    pub rtt: Option<f64>,
}

/// Nodes that are keys of the latency graph, in graph order. Ids that do
/// not resolve to a node entity are skipped.
pub fn visible_nodes(latencies: &Topology, entities: &EntityTable) -> Vec<Node> {
    denormalize(latencies.keys(), entities)
}

/// Adjacency lists of the visible topology. Neighbors without a node
/// entity are dropped; neighbors without their own entry are kept.
pub fn topology(latencies: &Topology, entities: &EntityTable) -> IndexMap<String, Vec<String>> {
    latencies
        .iter()
        .filter(|(node_id, _)| entities.nodes.contains_key(node_id.as_str()))
        .map(|(node_id, neighbors)| {
            let ids = neighbors
                .keys()
                .filter(|id| entities.nodes.contains_key(id.as_str()))
                .cloned()
                .collect();
            (node_id.clone(), ids)
        })
        .collect()
}

/// Symmetric, de-duplicated edges for drawing. Self-loops are ignored.
pub fn connections(latencies: &Topology) -> Vec<Connection> {
    let mut edges: IndexMap<(String, String), Option<f64>> = IndexMap::new();
    for (node_id, neighbors) in latencies {
        for (neighbor_id, rtt) in neighbors {
            let key = match node_id.cmp(neighbor_id) {
                Ordering::Less => (node_id.clone(), neighbor_id.clone()),
                Ordering::Greater => (neighbor_id.clone(), node_id.clone()),
                Ordering::Equal => continue,
            };
            let slot = edges.entry(key).or_insert(None);
            *slot = match (*slot, *rtt) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }
    }
    edges
        .into_iter()
        .map(|((source, target), rtt)| Connection { source, target, rtt })
        .collect()
}

/// The selected node, if selected and known.
pub fn active_node(active_node_id: Option<&str>, entities: &EntityTable) -> Option<Node> {
    active_node_id.and_then(|id| denormalize_one(id, entities))
}

pub fn search_results(keys: &[String], entities: &EntityTable) -> Vec<SearchResult> {
    denormalize(keys, entities)
}

/// Nodes hosted at exactly the target's coordinates, the target included,
/// ordered by title.
pub fn co_located_nodes(all_nodes: &[Node], target: &Node) -> Vec<Node> {
    let mut roommates: Vec<Node> = all_nodes
        .iter()
        .filter(|node| node.location.same_place(&target.location))
        .cloned()
        .collect();
    if !roommates.iter().any(|node| node.id == target.id) {
        roommates.push(target.clone());
    }
    roommates.sort_by(|a, b| compare_titles(&a.title, &b.title));
    roommates
}

/// Case-insensitive collation with a stable tiebreak on the raw strings.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_recomputes_only_on_key_change() {
        let mut memo: Memo<u64, usize> = Memo::default();
        let mut calls = 0;
        memo.get_or_update(1, || {
            calls += 1;
            10
        });
        memo.get_or_update(1, || {
            calls += 1;
            20
        });
        assert_eq!(calls, 1);
        assert_eq!(*memo.get_or_update(2, || 30), 30);
        assert_eq!(*memo.get_or_update(2, || 40), 30);
        assert_eq!(*memo.get_or_update(1, || 50), 50);
    }

    #[test]
    fn test_connections_are_symmetric_and_unique() {
        let mut latencies = Topology::new();
        latencies.insert("b".into(), [("a".to_string(), Some(4.0))].into_iter().collect());
        latencies.insert(
            "a".into(),
            [("b".to_string(), Some(9.0)), ("c".to_string(), None)]
                .into_iter()
                .collect(),
        );
        let edges = connections(&latencies);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, "a");
        assert_eq!(edges[0].target, "b");
        assert_eq!(edges[0].rtt, Some(9.0));
        assert_eq!(edges[1].rtt, None);
    }

    #[test]
    fn test_compare_titles_ignores_case() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("Zebra", "apple"), Ordering::Greater);
    }
}
