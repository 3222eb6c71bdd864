use explorer_cli::{Explorer, ExplorerConfig, Snapshot};
use explorer_protocol::ResultKind;

const SNAPSHOT: &str = r#"{
    "nodes": [
        { "id": "node-a", "location": { "latitude": 52.5, "longitude": 13.4 } },
        { "id": "node-b", "location": { "latitude": 52.5, "longitude": 13.4 } },
        { "id": "node-c", "location": { "latitude": 60.2, "longitude": 24.9 } },
        { "id": "node-d", "location": { "latitude": 48.1, "longitude": 11.6 } }
    ],
    "trackers": {
        "tracker-1": {
            "node-a": { "node-b": { "rtt": 4 }, "node-c": { "rtt": 20 } },
            "node-c": { "node-a": null }
        },
        "tracker-2": {
            "node-a": { "node-c": { "rtt": 31 } },
            "node-b": { "ghost": { "rtt": 1 } }
        }
    },
    "streams": [{ "id": "s1", "type": "streams", "name": "Node weather", "description": "Helsinki" }],
    "places": [{ "id": "p1", "type": "locations", "name": "Helsinki, Finland" }],
    "geocode": { "13.4|52.5": "Berlin, Germany" }
}"#;

async fn explorer(config: ExplorerConfig) -> Explorer {
    let explorer = Explorer::new(Snapshot::from_json(SNAPSHOT).unwrap(), &config);
    explorer.load(None).await;
    explorer
}

#[tokio::test]
async fn test_topology_merges_tracker_reports() {
    let explorer = explorer(ExplorerConfig::default()).await;
    let report = explorer.topology().await;

    let visible: Vec<&str> = report.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(visible, vec!["node-a", "node-c", "node-b"]);
    // unknown neighbor ids are dropped from adjacency
    assert_eq!(report.adjacency["node-b"], Vec::<String>::new());

    let a_c = report
        .connections
        .iter()
        .find(|c| c.source == "node-a" && c.target == "node-c")
        .unwrap();
    assert_eq!(a_c.rtt, Some(31.0));
}

#[tokio::test]
async fn test_visible_locations_are_geocoded() {
    let explorer = explorer(ExplorerConfig::default()).await;
    let report = explorer.topology().await;

    let node_a = &report.nodes[0];
    assert_eq!(node_a.location.title.as_deref(), Some("Berlin, Germany"));
    assert!(node_a.location.is_reverse_geocoded);
    assert!(!report.nodes[1].location.is_reverse_geocoded);
}

#[tokio::test]
async fn test_nodes_page_follows_selection() {
    let mut config = ExplorerConfig::default();
    config.view.page_size = 1;
    let explorer = explorer(config).await;

    let all = explorer.nodes_page(Some(0), None).await;
    assert_eq!(all.total_pages, 4);
    assert_eq!(all.selected, None);

    let selected = explorer.nodes_page(None, Some("node-c")).await;
    assert_eq!(selected.selected.as_deref(), Some("node-c"));
    assert_eq!(selected.nodes[0].id, "node-c");

    let clamped = explorer.nodes_page(Some(99), None).await;
    assert_eq!(clamped.page, 3);
}

#[tokio::test]
async fn test_search_lists_nodes_then_sources() {
    let explorer = explorer(ExplorerConfig::default()).await;

    let results = explorer.search("Helsinki").await;
    let kinds: Vec<ResultKind> = results.iter().map(|r| r.kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&ResultKind::Streams));
    assert!(kinds.contains(&ResultKind::Locations));

    let node_hits = explorer.search("node-").await;
    assert_eq!(node_hits.len(), 4);
    assert!(node_hits.iter().all(|r| r.kind == ResultKind::Nodes));

    assert!(explorer.search("he").await.is_empty());
}

#[tokio::test]
async fn test_roommates_share_location() {
    let explorer = explorer(ExplorerConfig::default()).await;

    let ids: Vec<String> = explorer
        .roommates("node-b")
        .await
        .into_iter()
        .map(|n| n.id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"node-a".to_string()));
    assert!(ids.contains(&"node-b".to_string()));

    assert!(explorer.roommates("missing").await.is_empty());
}
