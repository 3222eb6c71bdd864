use serde::{Deserialize, Serialize};

use crate::constants::LOCATION_ID_SEPARATOR;
use crate::ProtocolError;

/// Geographic placement of an operator node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    /// Human-readable region name, filled in by reverse geocoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "isReverseGeoCoded")]
    pub is_reverse_geocoded: bool,
}

impl Location {
    /// An unresolved location straight from the API.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            title: None,
            is_reverse_geocoded: false,
        }
    }

    /// Composite entity id. Nodes at identical coordinates share it.
    pub fn id(&self) -> String {
        // `+ 0.0` folds -0.0 into 0.0
        format!(
            "{}{}{}",
            self.longitude + 0.0,
            LOCATION_ID_SEPARATOR,
            self.latitude + 0.0
        )
    }

    /// The reverse-geocoded form of this location.
    pub fn resolved(&self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            is_reverse_geocoded: true,
            ..self.clone()
        }
    }

    /// True if both locations sit on exactly the same coordinates.
    pub fn same_place(&self, other: &Location) -> bool {
        self.longitude == other.longitude && self.latitude == other.latitude
    }
}

/// An operator node participating in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Display name; derived from `id` when ingested from the API.
    pub title: String,
    pub location: Location,
}

impl Node {
    pub fn new(id: impl Into<String>, title: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location,
        }
    }
}

/// Source type of a search result. Closed set; UI dispatch is by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Streams,
    Nodes,
    Locations,
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Streams => "streams",
            Self::Nodes => "nodes",
            Self::Locations => "locations",
        };
        write!(f, "{s}")
    }
}

/// A single hit produced by one of the search sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SearchResult {
    pub fn new(
        kind: ResultKind,
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description,
        }
    }

    /// Key in the search result entity table. Ids are only unique per kind.
    pub fn entity_key(&self) -> String {
        format!("{}:{}", self.kind, self.id)
    }
}

/// Backend deployment the explorer is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Mainnet,
    Testnet,
    Local,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Local => "local",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Environment {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "local" => Ok(Self::Local),
            other => Err(ProtocolError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Which page of the explorer is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "route", content = "id", rename_all = "lowercase")]
pub enum ActiveRoute {
    #[default]
    Network,
    Stream(String),
    Node(String),
}

/// Map or list presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveView {
    #[default]
    Map,
    List,
}

/// Whether topology connections are drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionsMode {
    /// Decided by context until the user toggles for the first time.
    #[default]
    Auto,
    Always,
    Off,
}

impl ConnectionsMode {
    /// Next mode after a user toggle.
    ///
    /// Connections are shown automatically while a stream is open, so the
    /// first toggle from `Auto` hides them in that case and shows them
    /// otherwise.
    pub fn toggled(self, stream_active: bool) -> Self {
        match self {
            Self::Auto if stream_active => Self::Off,
            Self::Auto => Self::Always,
            Self::Always => Self::Off,
            Self::Off => Self::Always,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_id_is_composite() {
        let loc = Location::new(13.4, 52.5);
        assert_eq!(loc.id(), "13.4|52.5");
    }

    #[test]
    fn test_location_id_ignores_sign_of_zero() {
        let west = Location::new(-0.0, 10.0);
        let east = Location::new(0.0, 10.0);
        assert!(west.same_place(&east));
        assert_eq!(west.id(), east.id());
        assert_eq!(west.id(), "0|10");
        assert_eq!(Location::new(5.0, -0.0).id(), "5|0");
    }

    #[test]
    fn test_resolved_location_keeps_coordinates() {
        let loc = Location::new(13.4, 52.5).resolved("Berlin");
        assert!(loc.is_reverse_geocoded);
        assert_eq!(loc.title.as_deref(), Some("Berlin"));
        assert_eq!(loc.id(), "13.4|52.5");
    }

    #[test]
    fn test_search_result_wire_tag() {
        let json = r#"{"id":"2","type":"streams","name":"Stream","description":"My Stream"}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.kind, ResultKind::Streams);
        assert_eq!(result.entity_key(), "streams:2");
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("Testnet".parse::<Environment>().unwrap(), Environment::Testnet);
        assert!("moon".parse::<Environment>().is_err());
    }

    #[test]
    fn test_connections_toggle_depends_on_stream() {
        assert_eq!(ConnectionsMode::Auto.toggled(true), ConnectionsMode::Off);
        assert_eq!(ConnectionsMode::Auto.toggled(false), ConnectionsMode::Always);
        assert_eq!(ConnectionsMode::Always.toggled(true), ConnectionsMode::Off);
        assert_eq!(ConnectionsMode::Off.toggled(false), ConnectionsMode::Always);
    }
}
