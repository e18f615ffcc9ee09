use crate::graph::{Graph, Positions, Vec2};
use estatevision_core::{NodeId, NodeKind};

pub const ASSET_RADIUS: f32 = 35.0;
pub const ENTITY_RADIUS: f32 = 30.0;

/// Drawn radius of a node, also used for hit-testing and arrowhead offsets.
pub fn node_radius(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::ASSET => ASSET_RADIUS,
        NodeKind::PERSON | NodeKind::COMPANY | NodeKind::LEGAL => ENTITY_RADIUS,
    }
}

/// Result of a hit test at a given graph-space position.
#[derive(Debug, Clone, PartialEq)]
pub enum HitResult {
    None,
    Node(NodeId),
}

impl HitResult {
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            HitResult::Node(id) => Some(id),
            HitResult::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeCircle {
    pub id: NodeId,
    pub center: Vec2,
    pub radius: f32,
}

impl NodeCircle {
    pub fn contains(&self, pos: Vec2) -> bool {
        self.center.distance(pos) < self.radius
    }
}

/// Circle hit regions for every placed node, in graph insertion order.
///
/// Overlapping circles resolve to the earliest inserted node, so the asset wins over
/// anything dragged on top of it.
#[derive(Debug, Clone, Default)]
pub struct HitTester {
    circles: Vec<NodeCircle>,
}

impl HitTester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tester that is immediately ready for queries.
    pub fn from_graph(graph: &Graph, positions: &Positions) -> Self {
        let mut tester = Self::new();
        tester.update(graph, positions);
        tester
    }

    /// Refresh hit regions. Call after layout or drag; nodes without a position are
    /// left out and can never be hit.
    pub fn update(&mut self, graph: &Graph, positions: &Positions) {
        self.circles.clear();
        self.circles.extend(graph.nodes().iter().filter_map(|node| {
            positions.get(&node.id).map(|&center| NodeCircle {
                id: node.id.clone(),
                center,
                radius: node_radius(node.kind),
            })
        }));
    }

    pub fn hit_test(&self, pos: Vec2) -> HitResult {
        match self.hit_test_node(pos) {
            Some(id) => HitResult::Node(id),
            None => HitResult::None,
        }
    }

    pub fn hit_test_node(&self, pos: Vec2) -> Option<NodeId> {
        self.circles
            .iter()
            .find(|circle| circle.contains(pos))
            .map(|circle| circle.id.clone())
    }

    pub fn circles(&self) -> &[NodeCircle] {
        &self.circles
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::graph::GraphNode;
    use proptest::prelude::*;

    fn kind_strategy() -> impl Strategy<Value = NodeKind> {
        prop::sample::select(NodeKind::ALL.to_vec())
    }

    proptest! {
        /// A point at the node center is a hit; a point one unit beyond the radius is not.
        #[test]
        fn prop_hit_test_node_correctness(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            kind in kind_strategy(),
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let mut graph = Graph::new();
            graph.add_node(GraphNode::new(NodeId::from("n"), "n", kind));
            let center = Vec2::new(x, y);
            let mut positions = Positions::new();
            positions.insert(NodeId::from("n"), center);

            let tester = HitTester::from_graph(&graph, &positions);
            prop_assert_eq!(tester.hit_test(center), HitResult::Node(NodeId::from("n")));

            let outside = center + Vec2::from_angle(angle) * (node_radius(kind) + 1.0);
            prop_assert_eq!(tester.hit_test(outside), HitResult::None);
        }
    }
}
