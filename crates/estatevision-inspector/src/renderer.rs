use crate::surface::DrawSurface;
use estatevision_core::NodeId;
use estatevision_graph::style::{ARROW_HALF_ANGLE, EDGE_LABEL_OFFSET, NODE_LABEL_OFFSET};
use estatevision_graph::{
    Color, Graph, GraphEdge, Positions, Vec2, Viewport, get_edge_style, get_node_style,
    node_radius,
};

/// What a single frame actually put on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub edges_drawn: usize,
    pub edges_skipped: usize,
    pub nodes_drawn: usize,
}

/// Paints a graph with the ownership style: edges first, nodes over them.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub background: Color,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            background: Color::TRANSPARENT,
        }
    }
}

impl Renderer {
    pub fn new(background: Color) -> Self {
        Self { background }
    }

    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        graph: &Graph,
        positions: &Positions,
        viewport: &Viewport,
        selected: Option<&NodeId>,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        surface.clear(self.background);
        surface.set_transform(viewport);

        for edge in graph.edges() {
            if self.draw_edge(surface, graph, positions, edge) {
                stats.edges_drawn += 1;
            } else {
                stats.edges_skipped += 1;
            }
        }

        for node in graph.nodes() {
            let Some(&center) = positions.get(&node.id) else {
                tracing::trace!("Skipping node {} without a position", node.id);
                continue;
            };
            let style = get_node_style(node.kind, selected == Some(&node.id));
            surface.fill_circle(center, style.radius, style.colors.fill);
            surface.stroke_circle(center, style.radius, style.colors.stroke, style.stroke_width);
            surface.fill_text(
                &node.label,
                Vec2::new(center.x, center.y + style.radius + NODE_LABEL_OFFSET),
                style.label_size,
                style.label_color,
            );
            stats.nodes_drawn += 1;
        }

        stats
    }

    fn draw_edge<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        graph: &Graph,
        positions: &Positions,
        edge: &GraphEdge,
    ) -> bool {
        let Some((_, target_idx)) = graph.resolve_edge(edge) else {
            tracing::trace!("Skipping dangling edge {} -> {}", edge.from, edge.to);
            return false;
        };
        let (Some(&source), Some(&target)) = (positions.get(&edge.from), positions.get(&edge.to))
        else {
            tracing::trace!("Skipping unplaced edge {} -> {}", edge.from, edge.to);
            return false;
        };

        let style = get_edge_style(edge.kind);
        surface.stroke_line(source, target, style.color, style.width);

        let angle = (target - source).angle();
        let tip = target - Vec2::from_angle(angle) * node_radius(graph[target_idx].kind);
        let wing_a = tip - Vec2::from_angle(angle - ARROW_HALF_ANGLE) * style.arrow_size;
        let wing_b = tip - Vec2::from_angle(angle + ARROW_HALF_ANGLE) * style.arrow_size;
        surface.fill_triangle([tip, wing_a, wing_b], style.color);

        let mid = source.lerp(target, 0.5);
        surface.fill_text(
            &edge.label,
            Vec2::new(mid.x, mid.y - EDGE_LABEL_OFFSET),
            style.label_size,
            style.label_color,
        );
        true
    }
}
