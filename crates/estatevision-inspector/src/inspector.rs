//! The ownership inspector component.
//!
//! Owns the graph, the position map, the viewport and the drawing surface for one
//! inspected asset. Hosts drive it through the methods below and listen on its
//! [`EventBus`]. Everything runs synchronously on the caller's thread.
//!
//! The bus is unbounded and the inspector holds both ends, so hosts must drain it
//! (`drain` or `dispatch_to`) once per frame. Events are published per discrete action:
//! a drag reports one `NodeMoved` when it ends, and its intermediate repaints are not
//! announced.
//!
//! Calls made before [`OwnershipInspector::mount`] update state only; layout and
//! rendering catch up once a surface exists.

use crate::details::{AssetHeader, NodeDetails};
use crate::error::InspectorError;
use crate::interaction::{InteractionController, Redraw};
use crate::raster::{RasterSurface, load_font};
use crate::renderer::Renderer;
use crate::settings::InspectorSettings;
use crate::surface::DrawSurface;
use estatevision_core::{AssetRecord, Depth, NodeId, Spacing};
use estatevision_events::{Event, EventBus};
use estatevision_graph::{
    ForceLayout, Graph, GraphBuilder, Layouter, Positions, Vec2, Viewport,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectorView {
    #[default]
    Ownership,
    Relationships,
    Timeline,
}

impl InspectorView {
    pub fn title(self) -> &'static str {
        match self {
            InspectorView::Ownership => "Ownership Structure",
            InspectorView::Relationships => "Related Entities",
            InspectorView::Timeline => "Ownership Timeline",
        }
    }
}

pub struct OwnershipInspector {
    settings: InspectorSettings,
    builder: GraphBuilder,
    layout: ForceLayout,
    renderer: Renderer,
    events: EventBus,

    record: Option<AssetRecord>,
    graph: Graph,
    positions: Positions,
    viewport: Viewport,
    controller: InteractionController,
    depth: Depth,
    spacing: Spacing,
    view: InspectorView,

    surface: Option<RasterSurface>,
    font: Option<fontdue::Font>,
    font_loaded: bool,
    needs_layout: bool,
    drag_moved: bool,
}

impl Default for OwnershipInspector {
    fn default() -> Self {
        Self::new(InspectorSettings::default())
    }
}

impl OwnershipInspector {
    pub fn new(settings: InspectorSettings) -> Self {
        Self {
            builder: GraphBuilder::new(settings.build_options()),
            layout: ForceLayout::default(),
            renderer: Renderer::new(settings.background),
            events: EventBus::new(),
            record: None,
            graph: Graph::new(),
            positions: Positions::new(),
            viewport: Viewport::new(),
            controller: InteractionController::new(),
            depth: settings.default_depth,
            spacing: settings.default_spacing,
            view: InspectorView::default(),
            surface: None,
            font: None,
            font_loaded: false,
            needs_layout: false,
            drag_moved: false,
            settings,
        }
    }

    /// Use an already loaded label font instead of searching the font directories.
    pub fn with_font(mut self, font: Option<fontdue::Font>) -> Self {
        self.font = font;
        self.font_loaded = true;
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn mount(&mut self, width: u32, height: u32) {
        if !self.font_loaded {
            self.font = load_font(self.settings.font_dir.as_deref());
            self.font_loaded = true;
        }
        self.surface = Some(RasterSurface::new(width, height).with_font(self.font.clone()));
        tracing::debug!("Inspector mounted at {}x{}", width, height);
        if self.needs_layout {
            self.run_layout();
        }
        self.render();
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Swap in a surface of the new size and repaint. Positions are not re-laid out.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.is_mounted() {
            tracing::debug!("Ignoring resize to {}x{} before mount", width, height);
            return;
        }
        self.surface = Some(RasterSurface::new(width, height).with_font(self.font.clone()));
        self.render();
    }

    /// Release everything tied to the current asset and ask the host to unmount.
    pub fn close(&mut self) {
        self.surface = None;
        self.record = None;
        self.graph = Graph::new();
        self.positions.clear();
        self.controller.clear_selection();
        self.needs_layout = false;
        self.drag_moved = false;
        self.events.publish(Event::CloseRequested);
    }

    // ------------------------------------------------------------------
    // Inbound API
    // ------------------------------------------------------------------

    pub fn inspect(&mut self, record: AssetRecord) {
        self.events.publish(Event::AssetInspected {
            asset_id: record.graph_id().to_string(),
        });
        self.record = Some(record);
        self.rebuild();
    }

    /// Out-of-range values are clamped into `1..=3`.
    pub fn set_depth(&mut self, depth: i64) {
        self.depth = Depth::new(depth).unwrap_or_else(|e| {
            tracing::warn!("{}; clamping", e);
            Depth::clamped(depth)
        });
        if self.record.is_some() {
            self.rebuild();
        }
    }

    /// Re-run the layout from the current positions. Out-of-range values are clamped
    /// into `50..=200`.
    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing = Spacing::new(spacing).unwrap_or_else(|e| {
            tracing::warn!("{}; clamping", e);
            Spacing::clamped(spacing)
        });
        if self.graph.is_empty() {
            return;
        }
        self.run_layout();
        self.render();
    }

    /// Reset the viewport and lay the graph out again from a fresh radial seed.
    pub fn reset(&mut self) {
        self.viewport.reset();
        self.positions.clear();
        self.events.publish(Event::ViewReset);
        self.run_layout();
        self.render();
    }

    pub fn export_image(&self) -> Result<Vec<u8>, InspectorError> {
        let surface = self.surface.as_ref().ok_or(InspectorError::NotMounted)?;
        let bytes = surface.encode_png()?;
        self.events.publish(Event::ImageExported {
            byte_len: bytes.len(),
        });
        Ok(bytes)
    }

    pub fn export_file_name(&self) -> String {
        format!(
            "ownership-graph-{}.png",
            chrono::Utc::now().timestamp_millis()
        )
    }

    pub fn set_view(&mut self, view: InspectorView) {
        self.view = view;
        self.events.publish(Event::ViewChanged {
            title: view.title().to_string(),
        });
    }

    /// Select a node by id. Unknown ids are ignored.
    pub fn select(&mut self, id: &NodeId) -> bool {
        if !self.graph.contains(id) {
            tracing::debug!("Cannot select unknown node {}", id);
            return false;
        }
        self.controller.select(id.clone());
        self.events.publish(Event::NodeSelected { id: id.clone() });
        self.render();
        true
    }

    // ------------------------------------------------------------------
    // Pointer input, in surface pixels
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let redraw =
            self.controller
                .pointer_down(Vec2::new(x, y), &self.graph, &self.positions, &self.viewport);
        self.apply(redraw);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let redraw = self
            .controller
            .pointer_move(Vec2::new(x, y), &mut self.positions, &self.viewport);
        if redraw.is_needed() {
            self.drag_moved = true;
            self.repaint();
        }
    }

    /// Ends a drag; publishes the node's final position if it moved.
    pub fn pointer_up(&mut self) {
        let dragged = self.controller.dragged().cloned();
        let redraw = self.controller.pointer_up();
        if std::mem::take(&mut self.drag_moved) {
            let position = dragged.and_then(|id| self.positions.get(&id).map(|pos| (id, *pos)));
            if let Some((id, pos)) = position {
                self.events.publish(Event::NodeMoved {
                    id,
                    x: pos.x,
                    y: pos.y,
                });
            }
        }
        self.apply(redraw);
    }

    pub fn click(&mut self, x: f32, y: f32) {
        let redraw =
            self.controller
                .click(Vec2::new(x, y), &self.graph, &self.positions, &self.viewport);
        if redraw.is_needed() {
            if let Some(id) = self.controller.selected() {
                self.events.publish(Event::NodeSelected { id: id.clone() });
            }
        }
        self.apply(redraw);
    }

    /// Returns whether the host should suppress its native scroll, which is always.
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        let before = self.viewport.scale();
        let outcome = self.controller.wheel(delta_y, &mut self.viewport);
        if self.viewport.scale() != before {
            self.events.publish(Event::ZoomChanged {
                scale: self.viewport.scale(),
            });
        }
        self.apply(outcome.redraw);
        outcome.prevent_default
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn settings(&self) -> &InspectorSettings {
        &self.settings
    }

    pub fn record(&self) -> Option<&AssetRecord> {
        self.record.as_ref()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn view(&self) -> InspectorView {
        self.view
    }

    pub fn title(&self) -> &'static str {
        self.view.title()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.controller.selected()
    }

    pub fn surface(&self) -> Option<&RasterSurface> {
        self.surface.as_ref()
    }

    pub fn selected_details(&self) -> Option<NodeDetails> {
        let id = self.controller.selected()?;
        self.graph.node(id).map(NodeDetails::for_node)
    }

    pub fn asset_header(&self) -> Option<AssetHeader> {
        self.record.as_ref().map(AssetHeader::from_record)
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    fn rebuild(&mut self) {
        let Some(record) = &self.record else {
            return;
        };
        self.graph = self.builder.build(record, self.depth);
        self.positions.clear();
        self.controller.clear_selection();
        self.events.publish(Event::GraphRebuilt {
            depth: self.depth.get(),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            dangling_edges: self.graph.dangling_edges().count(),
        });
        self.run_layout();
        self.render();
    }

    fn canvas_center(&self) -> Vec2 {
        let (width, height) = match &self.surface {
            Some(surface) => surface.size(),
            None => (self.settings.canvas_width, self.settings.canvas_height),
        };
        Vec2::new(width as f32 / 2.0, height as f32 / 2.0)
    }

    fn run_layout(&mut self) {
        if !self.is_mounted() {
            tracing::debug!("Deferring layout until the inspector is mounted");
            self.needs_layout = true;
            return;
        }
        self.needs_layout = false;
        let center = self.canvas_center();
        self.layout.seed(&self.graph, center, &mut self.positions);
        self.layout
            .execute(&self.graph, self.spacing, &mut self.positions);
        self.events.publish(Event::LayoutCompleted {
            spacing: self.spacing.get(),
            iterations: self.layout.iterations,
        });
    }

    fn apply(&mut self, redraw: Redraw) {
        if redraw.is_needed() {
            self.render();
        }
    }

    fn render(&mut self) {
        if self.repaint() {
            self.events.publish(Event::Rendered);
        }
    }

    /// Redraw the surface without announcing it. Returns whether anything was drawn.
    fn repaint(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            tracing::debug!("Skipping render before mount");
            return false;
        };
        let stats = self.renderer.render(
            surface,
            &self.graph,
            &self.positions,
            &self.viewport,
            self.controller.selected(),
        );
        tracing::trace!("Rendered {:?}", stats);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_names(inspector: &OwnershipInspector) -> Vec<String> {
        inspector
            .events()
            .drain()
            .iter()
            .map(|event| {
                format!("{event:?}")
                    .split([' ', '{', '('])
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_view_titles() {
        let mut inspector = OwnershipInspector::default();
        assert_eq!(inspector.title(), "Ownership Structure");
        inspector.set_view(InspectorView::Relationships);
        assert_eq!(inspector.title(), "Related Entities");
        inspector.set_view(InspectorView::Timeline);
        assert_eq!(inspector.title(), "Ownership Timeline");
    }

    #[test]
    fn test_inspect_before_mount_defers_layout() {
        let mut inspector = OwnershipInspector::default().with_font(None);
        inspector.inspect(AssetRecord::with_id("U1"));
        assert_eq!(inspector.graph().node_count(), 3);
        assert!(inspector.positions().is_empty());
        assert!(matches!(
            inspector.export_image(),
            Err(InspectorError::NotMounted)
        ));

        inspector.mount(800, 600);
        assert_eq!(inspector.positions().len(), 3);
        let names = drain_names(&inspector);
        assert_eq!(
            names,
            vec!["AssetInspected", "GraphRebuilt", "LayoutCompleted", "Rendered"]
        );
    }

    #[test]
    fn test_resize_redraws_without_layout() {
        let mut inspector = OwnershipInspector::default().with_font(None);
        inspector.mount(800, 600);
        inspector.inspect(AssetRecord::with_id("P1"));
        let before = inspector.positions().clone();
        inspector.events().drain();

        inspector.resize(400, 300);
        assert_eq!(inspector.positions(), &before);
        assert_eq!(inspector.surface().map(|s| s.image().dimensions()), Some((400, 300)));
        assert_eq!(drain_names(&inspector), vec!["Rendered"]);
    }

    #[test]
    fn test_depth_and_spacing_are_clamped() {
        let mut inspector = OwnershipInspector::default().with_font(None);
        inspector.set_depth(9);
        assert_eq!(inspector.depth().get(), 3);
        inspector.set_depth(0);
        assert_eq!(inspector.depth().get(), 1);
        inspector.set_spacing(10.0);
        assert_eq!(inspector.spacing().get(), 50.0);
        inspector.set_spacing(f32::NAN);
        assert_eq!(inspector.spacing().get(), 100.0);
    }

    #[test]
    fn test_close_releases_state() {
        let mut inspector = OwnershipInspector::default().with_font(None);
        inspector.mount(200, 200);
        inspector.inspect(AssetRecord::with_id("P1"));
        inspector.events().drain();

        inspector.close();
        assert!(!inspector.is_mounted());
        assert!(inspector.graph().is_empty());
        assert!(inspector.record().is_none());
        assert!(inspector.asset_header().is_none());
        assert_eq!(drain_names(&inspector), vec!["CloseRequested"]);
    }

    #[test]
    fn test_export_file_name() {
        let name = OwnershipInspector::default().export_file_name();
        assert!(name.starts_with("ownership-graph-"));
        assert!(name.ends_with(".png"));
        let millis = &name["ownership-graph-".len()..name.len() - ".png".len()];
        assert!(millis.parse::<i64>().unwrap() > 0);
    }
}
