use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod asset;
pub mod error;
pub mod params;

pub use asset::{AssetRecord, Ownership, OwnershipKind};
pub use error::CoreError;
pub use params::{Depth, Spacing};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Role of a node in an ownership graph.
///
/// Kinds differ only in how they are drawn and in which metadata fields apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    ASSET,
    PERSON,
    COMPANY,
    LEGAL,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::ASSET,
        NodeKind::PERSON,
        NodeKind::COMPANY,
        NodeKind::LEGAL,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::ASSET => "asset",
            NodeKind::PERSON => "person",
            NodeKind::COMPANY => "company",
            NodeKind::LEGAL => "legal",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asset" => Ok(NodeKind::ASSET),
            "person" => Ok(NodeKind::PERSON),
            "company" => Ok(NodeKind::COMPANY),
            "legal" => Ok(NodeKind::LEGAL),
            _ => Err(CoreError::InvalidNodeKind(value.to_string())),
        }
    }
}

/// Relationship carried by a directed edge (controller/owner -> controlled/owned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    OWNS,
    CONTROLS,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::OWNS => "owns",
            EdgeKind::CONTROLS => "controls",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "owns" => Ok(EdgeKind::OWNS),
            "controls" => Ok(EdgeKind::CONTROLS),
            _ => Err(CoreError::InvalidEdgeKind(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
        assert!(matches!(
            "trust".parse::<NodeKind>(),
            Err(CoreError::InvalidNodeKind(name)) if name == "trust"
        ));
    }

    #[test]
    fn test_kinds_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&NodeKind::LEGAL).unwrap(), "\"legal\"");
        assert_eq!(
            serde_json::from_str::<EdgeKind>("\"controls\"").unwrap(),
            EdgeKind::CONTROLS
        );
    }

    #[test]
    fn test_node_id_display() {
        let id = NodeId::from("RSSMRA80A01H501U");
        assert_eq!(id.to_string(), "RSSMRA80A01H501U");
        assert_eq!(id.as_str(), "RSSMRA80A01H501U");
    }
}
