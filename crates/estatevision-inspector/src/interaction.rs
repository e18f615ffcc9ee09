//! Pointer and wheel handling.
//!
//! Handlers take screen-space input, map it through the viewport and report whether the
//! caller should repaint. Dragging writes straight into the position map; the layout is
//! never re-run from here.

use estatevision_core::NodeId;
use estatevision_graph::{Graph, HitTester, Positions, Vec2, Viewport, zoom_factor_for_wheel};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Redraw {
    Needed,
    None,
}

impl Redraw {
    pub fn is_needed(self) -> bool {
        self == Redraw::Needed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelOutcome {
    pub redraw: Redraw,
    /// The host must swallow the native scroll.
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
    selected: Option<NodeId>,
    hit_tester: HitTester,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn dragged(&self) -> Option<&NodeId> {
        match &self.state {
            InteractionState::Dragging(id) => Some(id),
            InteractionState::Idle => None,
        }
    }

    /// Start dragging the node under the pointer, if any.
    pub fn pointer_down(
        &mut self,
        screen: Vec2,
        graph: &Graph,
        positions: &Positions,
        viewport: &Viewport,
    ) -> Redraw {
        if let Some(id) = self.hit(screen, graph, positions, viewport) {
            tracing::trace!("Drag started on {}", id);
            self.state = InteractionState::Dragging(id);
        }
        Redraw::None
    }

    pub fn pointer_move(
        &mut self,
        screen: Vec2,
        positions: &mut Positions,
        viewport: &Viewport,
    ) -> Redraw {
        let InteractionState::Dragging(id) = &self.state else {
            return Redraw::None;
        };
        match positions.get_mut(id) {
            Some(position) => {
                *position = viewport.screen_to_graph(screen);
                Redraw::Needed
            }
            None => {
                tracing::debug!("Dragged node {} no longer has a position; dropping drag", id);
                self.state = InteractionState::Idle;
                Redraw::None
            }
        }
    }

    pub fn pointer_up(&mut self) -> Redraw {
        self.state = InteractionState::Idle;
        Redraw::None
    }

    /// Select the node under the pointer. A click on empty space keeps the current
    /// selection.
    pub fn click(
        &mut self,
        screen: Vec2,
        graph: &Graph,
        positions: &Positions,
        viewport: &Viewport,
    ) -> Redraw {
        match self.hit(screen, graph, positions, viewport) {
            Some(id) => {
                self.selected = Some(id);
                Redraw::Needed
            }
            None => Redraw::None,
        }
    }

    pub fn wheel(&mut self, delta_y: f32, viewport: &mut Viewport) -> WheelOutcome {
        viewport.zoom_by(zoom_factor_for_wheel(delta_y));
        WheelOutcome {
            redraw: Redraw::Needed,
            prevent_default: true,
        }
    }

    /// Select a node programmatically. Existence is the caller's concern.
    pub fn select(&mut self, id: NodeId) {
        self.selected = Some(id);
    }

    /// Forget the selection and any drag in progress, e.g. after a rebuild.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.state = InteractionState::Idle;
    }

    fn hit(
        &mut self,
        screen: Vec2,
        graph: &Graph,
        positions: &Positions,
        viewport: &Viewport,
    ) -> Option<NodeId> {
        self.hit_tester.update(graph, positions);
        self.hit_tester.hit_test_node(viewport.screen_to_graph(screen))
    }
}
