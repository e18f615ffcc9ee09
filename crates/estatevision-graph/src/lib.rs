pub mod builder;
pub mod graph;
pub mod hit_tester;
pub mod layout;
pub mod style;
pub mod viewport;

pub use builder::{BuildOptions, GraphBuilder, Role, RoleIds, UboTarget};
pub use graph::{
    AssetSummary, EdgeIndex, Graph, GraphEdge, GraphNode, NodeIndex, Positions, Vec2,
};
pub use hit_tester::{HitResult, HitTester, NodeCircle, node_radius};
pub use layout::{ForceLayout, ForceSimulation, Layouter};
pub use style::{
    Color, EdgeStyle, NodeColors, NodeStyle, get_edge_style,
    get_kind_label, get_node_colors, get_node_style,
};
pub use viewport::{Viewport, zoom_factor_for_wheel};
