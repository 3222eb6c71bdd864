use explorer_protocol::{
    ActiveRoute, ActiveView, ConnectionsMode, Environment, Location, Node, ResultKind,
    SearchResult, Topology,
};
use explorer_state::{normalize, reduce, Action, State};

fn sample_nodes() -> Vec<Node> {
    vec![
        Node::new("a", "Alpha", Location::new(24.9, 60.2)),
        Node::new("b", "Bravo", Location::new(13.4, 52.5)),
    ]
}

fn apply(state: State, actions: Vec<Action>) -> State {
    actions.into_iter().fold(state, |s, a| reduce(&s, a))
}

#[test]
fn test_unknown_action_is_noop() {
    let state = apply(
        State::new(Environment::Testnet),
        vec![Action::SetTrackers(vec!["t1".into()])],
    );
    assert_eq!(reduce(&state, Action::Unknown), state);
}

#[test]
fn test_unknown_action_decodes_from_json() {
    let action = Action::from_json(r#"{"type":"somethingFromTheFuture"}"#).unwrap();
    assert_eq!(action, Action::Unknown);
}

#[test]
fn test_unknown_action_with_payload_decodes_from_json() {
    let action = Action::from_json(r#"{"type":"setMetrics","payload":{"cpu":1}}"#).unwrap();
    assert_eq!(action, Action::Unknown);

    let action = Action::from_json(r#"{"type":"setMetrics","payload":"fast"}"#).unwrap();
    assert_eq!(action, Action::Unknown);
}

#[test]
fn test_known_action_with_bad_payload_is_rejected() {
    assert!(Action::from_json(r#"{"type":"setTrackers","payload":{"cpu":1}}"#).is_err());
    assert!(Action::from_json(r#"{"payload":[]}"#).is_err());
}

#[test]
fn test_action_serializes_to_tagged_json() {
    let json = serde_json::to_string(&Action::SetStream(Some("s1".into()))).unwrap();
    assert_eq!(json, r#"{"type":"setStream","payload":"s1"}"#);
    assert_eq!(Action::from_json(&json).unwrap(), Action::SetStream(Some("s1".into())));
}

#[test]
fn test_known_action_decodes_from_json() {
    let action = Action::from_json(r#"{"type":"setStream","payload":"stream-1"}"#).unwrap();
    assert_eq!(action, Action::SetStream(Some("stream-1".into())));

    let action =
        Action::from_json(r#"{"type":"setActiveNode","payload":{"id":"a","updateMap":true}}"#)
            .unwrap();
    assert_eq!(
        action,
        Action::SetActiveNode {
            id: Some("a".into()),
            update_map: true
        }
    );
}

#[test]
fn test_reset_restores_initial_state() {
    let normalized = normalize(sample_nodes());
    let mut latencies = Topology::new();
    latencies.insert("a".into(), [("b".to_string(), Some(3.0))].into_iter().collect());

    let dirty = apply(
        State::new(Environment::Mainnet),
        vec![
            Action::UpdateEntities(normalized.entities),
            Action::SetNodes(normalized.result),
            Action::SetTrackers(vec!["t1".into()]),
            Action::AddFetchedLocations(vec!["24.9|60.2".into()]),
            Action::SetTopology(latencies),
            Action::SetStream(Some("s".into())),
            Action::SetActiveNode {
                id: Some("a".into()),
                update_map: true,
            },
            Action::ToggleShowConnections,
            Action::SetActiveRoute(ActiveRoute::Node("a".into())),
            Action::SetActiveView(ActiveView::List),
            Action::UpdateSearch {
                search: "berlin".into(),
            },
            Action::AddSearchResults(vec![SearchResult::new(
                ResultKind::Streams,
                "s",
                "Stream",
                None,
            )]),
        ],
    );
    assert_ne!(dirty, State::new(Environment::Local));

    let reset = reduce(&dirty, Action::Reset(Environment::Local));
    assert_eq!(reset, State::new(Environment::Local));
}

#[test]
fn test_toggle_connections_without_stream() {
    let state = State::default();
    let state = reduce(&state, Action::ToggleShowConnections);
    assert_eq!(state.show_connections, ConnectionsMode::Always);
    let state = reduce(&state, Action::ToggleShowConnections);
    assert_eq!(state.show_connections, ConnectionsMode::Off);
    let state = reduce(&state, Action::ToggleShowConnections);
    assert_eq!(state.show_connections, ConnectionsMode::Always);
}

#[test]
fn test_toggle_connections_with_stream() {
    let state = reduce(&State::default(), Action::SetStream(Some("s".into())));
    let state = reduce(&state, Action::ToggleShowConnections);
    assert_eq!(state.show_connections, ConnectionsMode::Off);
    let state = reduce(&state, Action::ToggleShowConnections);
    assert_eq!(state.show_connections, ConnectionsMode::Always);
}

#[test]
fn test_set_stream_requests_map_update() {
    let state = reduce(&State::default(), Action::SetStream(Some("s".into())));
    assert!(state.update_map);
    let state = reduce(
        &state,
        Action::SetActiveNode {
            id: Some("a".into()),
            update_map: false,
        },
    );
    assert!(!state.update_map);
    assert_eq!(state.active_node_id.as_deref(), Some("a"));
}

#[test]
fn test_search_results_append_in_arrival_order() {
    let first = SearchResult::new(ResultKind::Nodes, "1", "Berlin", Some("1".into()));
    let second = SearchResult::new(ResultKind::Locations, "p", "Berlin, DE", None);
    let third = SearchResult::new(ResultKind::Streams, "2", "Stream", None);
    let state = apply(
        State::default(),
        vec![
            Action::AddSearchResults(vec![first]),
            Action::AddSearchResults(vec![second]),
            Action::AddSearchResults(vec![third]),
        ],
    );
    assert_eq!(
        state.search_results,
        vec!["nodes:1", "locations:p", "streams:2"]
    );

    let state = reduce(&state, Action::ResetSearchResults);
    assert!(state.search_results.is_empty());
}

#[test]
fn test_fetched_locations_accumulate() {
    let state = apply(
        State::default(),
        vec![
            Action::AddFetchedLocations(vec!["1|2".into()]),
            Action::AddFetchedLocations(vec!["1|2".into(), "3|4".into()]),
        ],
    );
    assert_eq!(state.fetched_locations.len(), 2);
}
