//! Pure state transitions for the explorer store.
//!
//! [`reduce`] never mutates its input; every action yields a fresh
//! [`State`]. No I/O, no side effects.

use std::collections::BTreeSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use explorer_protocol::{
    ActiveRoute, ActiveView, ConnectionsMode, Environment, ProtocolError, SearchResult, Topology,
};

use crate::entities::EntityTable;
use crate::normalize::normalize;

/// Root state of one explorer session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub env: Environment,
    pub active_route: ActiveRoute,
    pub active_view: ActiveView,
    /// Search phrase as typed.
    pub search: String,
    /// Trimmed, lowercased phrase used for matching.
    pub search_phrase: String,
    /// Node ids in ingestion order.
    pub nodes: Vec<String>,
    pub trackers: Vec<String>,
    /// Search result entity keys in arrival order.
    pub search_results: Vec<String>,
    /// Location ids already sent to reverse geocoding.
    pub fetched_locations: BTreeSet<String>,
    /// Latest merged latency graph; its keys are the visible nodes.
    pub latencies: Topology,
    pub active_stream_id: Option<String>,
    pub active_node_id: Option<String>,
    pub entities: EntityTable,
    pub show_connections: ConnectionsMode,
    /// Set when the map viewport should follow the latest selection.
    pub update_map: bool,
}

impl State {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            ..Self::default()
        }
    }
}

/// Every mutation the store accepts.
///
/// On the wire an action is `{"type": "...", "payload": ...}`; an
/// unrecognized `type` decodes to [`Action::Unknown`] whatever its payload,
/// and is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    SetTrackers(Vec<String>),
    SetNodes(Vec<String>),
    AddFetchedLocations(Vec<String>),
    UpdateEntities(EntityTable),
    SetTopology(Topology),
    #[serde(rename_all = "camelCase")]
    SetActiveNode {
        id: Option<String>,
        #[serde(default)]
        update_map: bool,
    },
    SetStream(Option<String>),
    ToggleShowConnections,
    SetActiveRoute(ActiveRoute),
    SetActiveView(ActiveView),
    UpdateSearch { search: String },
    AddSearchResults(Vec<SearchResult>),
    ResetSearchResults,
    Reset(Environment),
    #[serde(other)]
    Unknown,
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Action::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match Action::deserialize(&value) {
            Ok(action) => Ok(action),
            Err(e) => {
                // a type we don't know, with whatever payload
                let tag = value.get("type").cloned().unwrap_or(Value::Null);
                match Action::deserialize(serde_json::json!({ "type": tag })) {
                    Ok(Action::Unknown) => Ok(Action::Unknown),
                    _ => Err(D::Error::custom(e)),
                }
            }
        }
    }
}

impl Action {
    /// Decode an action dispatched from outside the crate.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetTrackers(_) => "setTrackers",
            Self::SetNodes(_) => "setNodes",
            Self::AddFetchedLocations(_) => "addFetchedLocations",
            Self::UpdateEntities(_) => "updateEntities",
            Self::SetTopology(_) => "setTopology",
            Self::SetActiveNode { .. } => "setActiveNode",
            Self::SetStream(_) => "setStream",
            Self::ToggleShowConnections => "toggleShowConnections",
            Self::SetActiveRoute(_) => "setActiveRoute",
            Self::SetActiveView(_) => "setActiveView",
            Self::UpdateSearch { .. } => "updateSearch",
            Self::AddSearchResults(_) => "addSearchResults",
            Self::ResetSearchResults => "resetSearchResults",
            Self::Reset(_) => "reset",
            Self::Unknown => "unknown",
        }
    }
}

/// Normalized form of a search phrase.
pub fn normalize_phrase(search: &str) -> String {
    search.trim().to_lowercase()
}

/// Apply `action` to `state`, producing the next state.
pub fn reduce(state: &State, action: Action) -> State {
    if let Action::Reset(env) = action {
        return State::new(env);
    }
    if action == Action::Unknown {
        return state.clone();
    }

    let mut next = state.clone();
    match action {
        Action::SetTrackers(trackers) => {
            next.trackers = trackers;
        }
        Action::SetNodes(ids) => {
            next.nodes = ids;
        }
        Action::AddFetchedLocations(ids) => {
            next.fetched_locations.extend(ids);
        }
        Action::UpdateEntities(entities) => {
            next.entities.merge(entities);
        }
        Action::SetTopology(latencies) => {
            next.latencies = latencies;
        }
        Action::SetActiveNode { id, update_map } => {
            next.active_node_id = id;
            next.update_map = update_map;
        }
        Action::SetStream(stream_id) => {
            next.active_stream_id = stream_id;
            next.update_map = true;
        }
        Action::ToggleShowConnections => {
            next.show_connections = state
                .show_connections
                .toggled(state.active_stream_id.is_some());
        }
        Action::SetActiveRoute(route) => {
            next.active_route = route;
        }
        Action::SetActiveView(view) => {
            next.active_view = view;
        }
        Action::UpdateSearch { search } => {
            next.search_phrase = normalize_phrase(&search);
            next.search = search;
        }
        Action::AddSearchResults(results) => {
            let normalized = normalize(results);
            next.entities.merge(normalized.entities);
            for key in normalized.result {
                if !next.search_results.contains(&key) {
                    next.search_results.push(key);
                }
            }
        }
        Action::ResetSearchResults => {
            next.search_results.clear();
        }
        Action::Reset(_) | Action::Unknown => {}
    }
    next
}
