use estatevision_core::{AssetRecord, EdgeKind, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Angle of the vector in radians, measured from the positive x axis.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn lerp(self, other: Vec2, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Node positions in graph space, kept apart from the node arena so that layout,
/// drag and rendering each touch only what they own.
pub type Positions = HashMap<NodeId, Vec2>;

/// Display fields copied from the inspected record. Never used for identity.
///
/// The English field names win over the cadastral ones here, unlike the node label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub municipality: Option<String>,
    pub parcel: Option<String>,
}

impl AssetSummary {
    pub fn from_record(record: &AssetRecord) -> Self {
        Self {
            municipality: record.municipality.clone().or_else(|| record.comune.clone()),
            parcel: record.parcel.clone().or_else(|| record.particella.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    /// Free text such as "100%", "Parent" or "UBO".
    pub ownership_share: Option<String>,
    pub ssn: Option<String>,
    pub vat_number: Option<String>,
    pub asset: Option<AssetSummary>,
}

impl GraphNode {
    pub fn new(id: NodeId, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            ownership_share: None,
            ssn: None,
            vat_number: None,
            asset: None,
        }
    }

    pub fn with_share(mut self, share: &str) -> Self {
        self.ownership_share = Some(share.to_string());
        self
    }

    pub fn with_ssn(mut self, ssn: Option<String>) -> Self {
        self.ssn = ssn;
        self
    }

    pub fn with_vat_number(mut self, vat_number: Option<String>) -> Self {
        self.vat_number = vat_number;
        self
    }

    pub fn with_asset(mut self, asset: AssetSummary) -> Self {
        self.asset = Some(asset);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(from: NodeId, to: NodeId, label: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            label: label.into(),
            kind,
        }
    }
}

/// Node arena plus edge list.
///
/// Edges are stored even when an endpoint is unknown; consumers resolve them through
/// [`Graph::resolve_edge`] and skip the ones that do not resolve.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    node_map: HashMap<NodeId, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&existing) = self.node_map.get(&node.id) {
            tracing::warn!(
                "Ignoring duplicate node {} ({}); keeping the first one",
                node.id,
                node.label
            );
            return existing;
        }
        let idx = NodeIndex(self.nodes.len());
        self.node_map.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    pub fn add_edge(&mut self, edge: GraphEdge) -> EdgeIndex {
        let idx = EdgeIndex(self.edges.len());
        self.edges.push(edge);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.index_of(id).map(|idx| &self.nodes[idx.0])
    }

    /// The first asset node, which is the inspected record.
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.kind == NodeKind::ASSET)
    }

    pub fn resolve_edge(&self, edge: &GraphEdge) -> Option<(NodeIndex, NodeIndex)> {
        Some((self.index_of(&edge.from)?, self.index_of(&edge.to)?))
    }

    /// Edges with at least one endpoint that no node carries.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .iter()
            .filter(|edge| self.resolve_edge(edge).is_none())
    }
}

impl Index<NodeIndex> for Graph {
    type Output = GraphNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}
