//! Loading nodes and the merged multi-tracker topology into the store.

use std::sync::Arc;

use futures::future::join_all;

use explorer_protocol::raw::to_topology;
use explorer_protocol::{Node, RawNode, Topology};
use explorer_state::merge_topologies;

use crate::source::{NodeSource, TopologySource};
use crate::SharedStore;

pub struct NetworkLoader {
    store: SharedStore,
    nodes: Arc<dyn NodeSource>,
    topology: Arc<dyn TopologySource>,
}

impl NetworkLoader {
    pub fn new(
        store: SharedStore,
        nodes: Arc<dyn NodeSource>,
        topology: Arc<dyn TopologySource>,
    ) -> Self {
        Self {
            store,
            nodes,
            topology,
        }
    }

    /// Fetch all operator nodes and ingest them. A failed fetch counts as
    /// zero nodes.
    pub async fn load_nodes(&self) -> usize {
        let raw = match self.nodes.fetch_nodes().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch nodes");
                return 0;
            }
        };
        let nodes: Vec<Node> = raw.into_iter().map(RawNode::into_node).collect();
        let count = nodes.len();
        self.store.write().await.add_nodes(nodes);
        tracing::info!(count, "Nodes loaded");
        count
    }

    /// Fetch every tracker's view of the topology for the active stream,
    /// merge them and apply the result.
    ///
    /// Returns false if the load was superseded (newer load, stream change
    /// or reset) before it finished; its result is then discarded.
    pub async fn load_topology(&self) -> bool {
        let (token, stream_id, known_trackers) = {
            let mut store = self.store.write().await;
            let token = store.begin_topology_request();
            (
                token,
                store.stream().map(str::to_string),
                store.state().trackers.clone(),
            )
        };

        let trackers = if known_trackers.is_empty() {
            match self.topology.fetch_trackers().await {
                Ok(trackers) => {
                    let mut store = self.store.write().await;
                    if store.is_current_topology_request(token) {
                        store.set_trackers(trackers.clone());
                    }
                    trackers
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch trackers");
                    Vec::new()
                }
            }
        } else {
            known_trackers
        };

        let stream = stream_id.as_deref();
        let source = self.topology.as_ref();
        let reports = join_all(trackers.iter().map(|tracker| async move {
            (tracker, source.fetch_topology(tracker, stream).await)
        }))
        .await;

        let topologies: Vec<Topology> = reports
            .into_iter()
            .filter_map(|(tracker, outcome)| match outcome {
                Ok(raw) => Some(to_topology(raw)),
                Err(e) => {
                    tracing::warn!(tracker = %tracker, error = %e, "Failed to fetch topology");
                    None
                }
            })
            .collect();

        let merged = merge_topologies(&topologies);
        let node_count = merged.len();
        let applied = self.store.write().await.set_topology_for(token, merged);
        if applied {
            tracing::info!(
                trackers = trackers.len(),
                reports = topologies.len(),
                nodes = node_count,
                stream = ?stream_id,
                "Topology loaded"
            );
        }
        applied
    }
}
