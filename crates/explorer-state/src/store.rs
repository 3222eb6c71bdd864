//! The explorer store: current [`State`], the reducer that advances it, and
//! memoized read views.
//!
//! Every dispatched action bumps the revision counters it touches; each
//! view is cached under the revisions it reads, so reads between writes
//! are free and a write only invalidates the views that depend on it.
//!
//! Two more counters live outside `State` so they survive `reset`:
//! - the search generation, bumped on every phrase update, which tags an
//!   aggregate search so late results from an older phrase are dropped;
//! - the topology request token, which does the same for topology loads.

use std::collections::HashSet;

use indexmap::IndexMap;

use explorer_protocol::{
    ActiveRoute, ActiveView, Environment, Node, SearchResult, Topology,
};

use crate::entities::EntityTable;
use crate::normalize::normalize;
use crate::reducer::{reduce, Action, State};
use crate::views::{self, Connection, Memo};

/// Write counters for the parts of the state views depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revisions {
    pub entities: u64,
    pub nodes: u64,
    pub topology: u64,
    pub results: u64,
}

#[derive(Debug, Default)]
struct ViewCache {
    nodes: Memo<(u64, u64), Vec<Node>>,
    visible_nodes: Memo<(u64, u64), Vec<Node>>,
    topology: Memo<(u64, u64), IndexMap<String, Vec<String>>>,
    connections: Memo<u64, Vec<Connection>>,
    active_node: Memo<(u64, Option<String>), Option<Node>>,
    search_results: Memo<(u64, u64), Vec<SearchResult>>,
}

#[derive(Debug)]
pub struct Store {
    state: State,
    revisions: Revisions,
    search_generation: u64,
    topology_request: u64,
    views: ViewCache,
}

impl Store {
    pub fn new(env: Environment) -> Self {
        Self {
            state: State::new(env),
            revisions: Revisions::default(),
            search_generation: 0,
            topology_request: 0,
            views: ViewCache::default(),
        }
    }

    /// Read-only snapshot of the raw state.
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn revisions(&self) -> Revisions {
        self.revisions
    }

    /// Run `action` through the reducer and bump the affected revisions.
    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(action = action.kind(), "Dispatching action");
        match &action {
            Action::SetNodes(_) => self.revisions.nodes += 1,
            Action::UpdateEntities(_) => self.revisions.entities += 1,
            Action::SetTopology(_) => self.revisions.topology += 1,
            Action::AddSearchResults(_) => {
                self.revisions.entities += 1;
                self.revisions.results += 1;
            }
            Action::ResetSearchResults => self.revisions.results += 1,
            Action::UpdateSearch { .. } => self.search_generation += 1,
            Action::SetStream(_) => self.topology_request += 1,
            Action::Reset(_) => {
                self.revisions.entities += 1;
                self.revisions.nodes += 1;
                self.revisions.topology += 1;
                self.revisions.results += 1;
                self.search_generation += 1;
                self.topology_request += 1;
                self.views = ViewCache::default();
            }
            Action::Unknown => {
                tracing::debug!("Ignoring unknown action");
            }
            _ => {}
        }
        self.state = reduce(&self.state, action);
    }

    // ── Read accessors ──────────────────────────────────────────────────

    /// All known nodes in ingestion order.
    pub fn nodes(&mut self) -> &[Node] {
        let key = (self.revisions.entities, self.revisions.nodes);
        let state = &self.state;
        self.views
            .nodes
            .get_or_update(key, || crate::normalize::denormalize(&state.nodes, &state.entities))
    }

    /// Nodes present in the current topology, in topology order.
    pub fn visible_nodes(&mut self) -> &[Node] {
        let key = (self.revisions.entities, self.revisions.topology);
        let state = &self.state;
        self.views
            .visible_nodes
            .get_or_update(key, || views::visible_nodes(&state.latencies, &state.entities))
    }

    /// Adjacency lists of visible nodes.
    pub fn topology(&mut self) -> &IndexMap<String, Vec<String>> {
        let key = (self.revisions.entities, self.revisions.topology);
        let state = &self.state;
        self.views
            .topology
            .get_or_update(key, || views::topology(&state.latencies, &state.entities))
    }

    pub fn connections(&mut self) -> &[Connection] {
        let key = self.revisions.topology;
        let state = &self.state;
        self.views
            .connections
            .get_or_update(key, || views::connections(&state.latencies))
    }

    /// The selected node. Recomputed when the selection or any entity
    /// changes, since the id may arrive before the node does.
    pub fn active_node(&mut self) -> Option<&Node> {
        let key = (self.revisions.entities, self.state.active_node_id.clone());
        let state = &self.state;
        self.views
            .active_node
            .get_or_update(key, || {
                views::active_node(state.active_node_id.as_deref(), &state.entities)
            })
            .as_ref()
    }

    pub fn search_results(&mut self) -> &[SearchResult] {
        let key = (self.revisions.entities, self.revisions.results);
        let state = &self.state;
        self.views
            .search_results
            .get_or_update(key, || views::search_results(&state.search_results, &state.entities))
    }

    /// Known nodes sharing the coordinates of `node_id`, sorted by title.
    pub fn co_located_nodes(&mut self, node_id: &str) -> Vec<Node> {
        let Some(target) = crate::normalize::denormalize_one::<Node>(node_id, &self.state.entities)
        else {
            return Vec::new();
        };
        views::co_located_nodes(self.nodes(), &target)
    }

    pub fn stream(&self) -> Option<&str> {
        self.state.active_stream_id.as_deref()
    }

    pub fn search_generation(&self) -> u64 {
        self.search_generation
    }

    pub fn is_current_search(&self, generation: u64) -> bool {
        self.search_generation == generation
    }

    // ── Mutation callbacks ──────────────────────────────────────────────

    /// Ingest nodes: merge their entities and append unseen ids.
    pub fn add_nodes(&mut self, nodes: Vec<Node>) {
        let normalized = normalize(nodes);
        let mut ids = self.state.nodes.clone();
        let mut seen: HashSet<String> = ids.iter().cloned().collect();
        for id in normalized.result {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        self.dispatch(Action::UpdateEntities(normalized.entities));
        self.dispatch(Action::SetNodes(ids));
    }

    pub fn update_entities(&mut self, entities: EntityTable) {
        self.dispatch(Action::UpdateEntities(entities));
    }

    pub fn set_trackers(&mut self, trackers: Vec<String>) {
        self.dispatch(Action::SetTrackers(trackers));
    }

    pub fn add_fetched_locations(&mut self, ids: Vec<String>) {
        self.dispatch(Action::AddFetchedLocations(ids));
    }

    pub fn set_topology(&mut self, latencies: Topology) {
        self.dispatch(Action::SetTopology(latencies));
    }

    pub fn set_active_node_id(&mut self, id: Option<String>, update_map: bool) {
        self.dispatch(Action::SetActiveNode { id, update_map });
    }

    /// Switch stream. Any topology load in flight becomes stale.
    pub fn set_stream(&mut self, stream_id: Option<String>) {
        self.dispatch(Action::SetStream(stream_id));
    }

    pub fn set_active_route(&mut self, route: ActiveRoute) {
        self.dispatch(Action::SetActiveRoute(route));
    }

    pub fn set_active_view(&mut self, view: ActiveView) {
        self.dispatch(Action::SetActiveView(view));
    }

    pub fn toggle_show_connections(&mut self) {
        self.dispatch(Action::ToggleShowConnections);
    }

    /// Start a new search: record the phrase, clear previous results and
    /// return the generation the new results must carry.
    pub fn update_search(&mut self, search: &str) -> u64 {
        self.dispatch(Action::UpdateSearch {
            search: search.to_string(),
        });
        self.dispatch(Action::ResetSearchResults);
        self.search_generation
    }

    pub fn add_search_results(&mut self, results: Vec<SearchResult>) {
        self.dispatch(Action::AddSearchResults(results));
    }

    /// Append results if `generation` is still the current search.
    /// Returns whether they were applied.
    pub fn add_search_results_for(&mut self, generation: u64, results: Vec<SearchResult>) -> bool {
        if !self.is_current_search(generation) {
            tracing::debug!(
                generation,
                current = self.search_generation,
                dropped = results.len(),
                "Dropping stale search results"
            );
            return false;
        }
        if !results.is_empty() {
            self.add_search_results(results);
        }
        true
    }

    pub fn reset_search_results(&mut self) {
        self.dispatch(Action::ResetSearchResults);
    }

    /// Throw away everything and start over for `env`.
    pub fn reset_store(&mut self, env: Environment) {
        self.dispatch(Action::Reset(env));
    }

    /// Claim a token for a topology load. Only the latest token may apply
    /// its result.
    pub fn begin_topology_request(&mut self) -> u64 {
        self.topology_request += 1;
        self.topology_request
    }

    pub fn is_current_topology_request(&self, token: u64) -> bool {
        self.topology_request == token
    }

    /// Apply a loaded topology if `token` is still current.
    pub fn set_topology_for(&mut self, token: u64, latencies: Topology) -> bool {
        if !self.is_current_topology_request(token) {
            tracing::debug!(token, current = self.topology_request, "Dropping stale topology");
            return false;
        }
        self.set_topology(latencies);
        true
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}
