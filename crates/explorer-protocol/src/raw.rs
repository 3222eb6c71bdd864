//! Inbound payload shapes as delivered by the API layer.
//!
//! These mirror the JSON exactly; conversion into domain entities happens
//! here so downstream crates never see the raw forms.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::title::node_title;
use crate::types::{Location, Node};
use crate::ProtocolError;

/// Latency graph: node id → neighbor id → round-trip time in milliseconds.
///
/// Iteration order is the order the entries were observed.
pub type Topology = IndexMap<String, IndexMap<String, Option<f64>>>;

/// Topology as reported by a single tracker.
pub type RawTopology = IndexMap<String, IndexMap<String, Option<RawLatency>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub location: RawLocation,
}

impl RawNode {
    /// Build the domain node, deriving its title from the id.
    pub fn into_node(self) -> Node {
        let location = Location {
            title: self.location.title,
            ..Location::new(self.location.longitude, self.location.latitude)
        };
        let title = node_title(&self.id);
        Node::new(self.id, title, location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawLatency {
    #[serde(default)]
    pub rtt: Option<f64>,
}

/// Flatten a tracker response into a [`Topology`].
///
/// Both `null` entries and `{ "rtt": null }` become an unknown RTT, as do
/// non-finite numbers.
pub fn to_topology(raw: RawTopology) -> Topology {
    raw.into_iter()
        .map(|(node_id, neighbors)| {
            let neighbors = neighbors
                .into_iter()
                .map(|(neighbor_id, latency)| {
                    let rtt = latency.and_then(|l| l.rtt).filter(|rtt| rtt.is_finite());
                    (neighbor_id, rtt)
                })
                .collect();
            (node_id, neighbors)
        })
        .collect()
}

/// Decode a JSON array of raw nodes into domain nodes.
pub fn parse_nodes(json: &str) -> Result<Vec<Node>, ProtocolError> {
    let raw: Vec<RawNode> = serde_json::from_str(json)?;
    Ok(raw.into_iter().map(RawNode::into_node).collect())
}

/// Decode a single tracker's JSON topology response.
pub fn parse_topology(json: &str) -> Result<Topology, ProtocolError> {
    let raw: RawTopology = serde_json::from_str(json)?;
    Ok(to_topology(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodes_derives_titles() {
        let json = r#"[{"id":"abc","location":{"latitude":52.5,"longitude":13.4}}]"#;
        let nodes = parse_nodes(json).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].title, node_title("abc"));
        assert_eq!(nodes[0].location.longitude, 13.4);
        assert!(!nodes[0].location.is_reverse_geocoded);
    }

    #[test]
    fn test_parse_topology_null_forms() {
        let json = r#"{"a":{"b":{"rtt":12.5},"c":{"rtt":null},"d":null},"e":{}}"#;
        let topology = parse_topology(json).unwrap();
        assert_eq!(topology["a"]["b"], Some(12.5));
        assert_eq!(topology["a"]["c"], None);
        assert_eq!(topology["a"]["d"], None);
        assert!(topology["e"].is_empty());
    }

    #[test]
    fn test_parse_topology_keeps_order() {
        let json = r#"{"z":{},"a":{},"m":{}}"#;
        let topology = parse_topology(json).unwrap();
        let keys: Vec<&str> = topology.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_nodes_malformed() {
        assert!(parse_nodes(r#"[{"id":1}]"#).is_err());
    }
}
