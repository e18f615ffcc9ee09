use crate::graph::Vec2;
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 3.0;
/// Scale factor of one wheel tick towards the user.
pub const ZOOM_IN_FACTOR: f32 = 1.1;
pub const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Wheel deltas scrolling down (positive) zoom out, everything else zooms in.
pub fn zoom_factor_for_wheel(delta_y: f32) -> f32 {
    if delta_y > 0.0 {
        ZOOM_OUT_FACTOR
    } else {
        ZOOM_IN_FACTOR
    }
}

/// Translate + uniform scale between graph space and screen space.
///
/// `screen = graph * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub translate: Vec2,
    scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }

    pub fn with_transform(translate: Vec2, scale: f32) -> Self {
        let mut viewport = Self { translate, scale: 1.0 };
        viewport.set_scale(scale);
        viewport
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    pub fn screen_to_graph(&self, screen: Vec2) -> Vec2 {
        (screen - self.translate) / self.scale
    }

    pub fn graph_to_screen(&self, graph: Vec2) -> Vec2 {
        graph * self.scale + self.translate
    }

    /// Multiply the scale by `factor` and clamp it. The translation is left alone, so
    /// zooming is anchored at the screen origin rather than at the pointer.
    ///
    /// Returns whether the scale changed.
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let previous = self.scale;
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        (self.scale - previous).abs() > f32::EPSILON
    }

    pub fn reset(&mut self) {
        self.translate = Vec2::ZERO;
        self.scale = 1.0;
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any sequence of wheel ticks keeps the scale inside its bounds.
        #[test]
        fn prop_zoom_stays_clamped(ticks in prop::collection::vec(any::<bool>(), 0..200)) {
            let mut viewport = Viewport::new();
            for zoom_in in ticks {
                viewport.zoom_by(if zoom_in { ZOOM_IN_FACTOR } else { ZOOM_OUT_FACTOR });
                prop_assert!(viewport.scale() >= MIN_SCALE);
                prop_assert!(viewport.scale() <= MAX_SCALE);
            }
        }
    }
}
