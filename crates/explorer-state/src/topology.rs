//! Merge latency graphs reported by independent trackers.
//!
//! Like a grow-only max register per directed edge: the merged RTT of
//! `(node, neighbor)` is the maximum numeric RTT any input reported for it.
//! Unknown RTTs never beat known ones, and an edge that was only ever
//! reported without an RTT stays unknown. Direction is kept as observed.
//! Properties: commutative (up to key order), associative, idempotent.

use indexmap::IndexMap;

use explorer_protocol::Topology;

/// Combine several topologies into one. Key order is first-seen order
/// across the inputs.
pub fn merge_topologies(topologies: &[Topology]) -> Topology {
    let mut merged = Topology::new();
    for topology in topologies {
        merge_into(&mut merged, topology);
    }
    merged
}

/// Fold `incoming` into `target` with the same rule as [`merge_topologies`].
pub fn merge_into(target: &mut Topology, incoming: &Topology) {
    for (node_id, neighbors) in incoming {
        let entry = target
            .entry(node_id.clone())
            .or_insert_with(IndexMap::new);
        for (neighbor_id, rtt) in neighbors {
            let slot = entry.entry(neighbor_id.clone()).or_insert(None);
            *slot = max_rtt(*slot, *rtt);
        }
    }
}

fn max_rtt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
