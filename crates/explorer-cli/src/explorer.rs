//! The explorer session behind each command: one store fed from a
//! snapshot through the loader, resolver and search aggregator.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use explorer_network::{shared, LocationResolver, NetworkLoader, SearchAggregator, SharedStore};
use explorer_protocol::{Node, SearchResult};
use explorer_state::views::compare_titles;
use explorer_state::{Connection, Paginator, Store};

use crate::config::ExplorerConfig;
use crate::snapshot::Snapshot;

/// One page of the node list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodesPage {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub selected: Option<String>,
    pub nodes: Vec<Node>,
}

/// Visible part of the network for the active stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyReport {
    pub stream: Option<String>,
    pub nodes: Vec<Node>,
    pub adjacency: IndexMap<String, Vec<String>>,
    pub connections: Vec<Connection>,
}

pub struct Explorer {
    store: SharedStore,
    loader: NetworkLoader,
    resolver: LocationResolver,
    search: SearchAggregator,
    page_size: usize,
}

impl Explorer {
    pub fn new(snapshot: Snapshot, config: &ExplorerConfig) -> Self {
        let store = shared(Store::new(config.environment));
        let streams = Arc::new(snapshot.stream_search());
        let places = Arc::new(snapshot.place_search());
        let snapshot = Arc::new(snapshot);

        Self {
            loader: NetworkLoader::new(store.clone(), snapshot.clone(), snapshot.clone()),
            resolver: LocationResolver::new(store.clone(), snapshot),
            search: SearchAggregator::new(store.clone(), streams, places, config.search_config()),
            page_size: config.view.page_size,
            store,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Load nodes and the topology of `stream` (all streams if `None`),
    /// then geocode whatever ended up visible.
    pub async fn load(&self, stream: Option<String>) {
        if stream.is_some() {
            self.store.write().await.set_stream(stream);
        }
        self.loader.load_nodes().await;
        self.loader.load_topology().await;
        self.resolver.resolve_visible().await;
    }

    /// All nodes sorted by title, paged. Selecting a node makes it the
    /// active node and moves to its page; an explicit page wins over that.
    pub async fn nodes_page(&self, page: Option<i64>, select: Option<&str>) -> NodesPage {
        let mut store = self.store.write().await;
        if let Some(id) = select {
            store.set_active_node_id(Some(id.to_string()), true);
        }
        let mut nodes = store.nodes().to_vec();
        nodes.sort_by(|a, b| compare_titles(&a.title, &b.title));

        let mut paginator = Paginator::new(nodes, self.page_size, select);
        if let Some(page) = page {
            paginator.set_page(page);
        }
        NodesPage {
            page: paginator.page(),
            total_pages: paginator.total_pages(),
            page_size: paginator.page_size(),
            selected: store.active_node().map(|node| node.id.clone()),
            nodes: paginator.page_items().to_vec(),
        }
    }

    pub async fn topology(&self) -> TopologyReport {
        let mut store = self.store.write().await;
        TopologyReport {
            stream: store.stream().map(str::to_string),
            nodes: store.visible_nodes().to_vec(),
            adjacency: store.topology().clone(),
            connections: store.connections().to_vec(),
        }
    }

    pub async fn search(&self, phrase: &str) -> Vec<SearchResult> {
        self.search.search(phrase).await
    }

    /// Nodes sharing the location of `node_id`, including itself.
    pub async fn roommates(&self, node_id: &str) -> Vec<Node> {
        self.store.write().await.co_located_nodes(node_id)
    }
}
