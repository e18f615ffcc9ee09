//! Ownership graph style system
//!
//! Colors, stroke widths and label metrics for nodes and edges, keyed by kind.

use estatevision_core::{EdgeKind, NodeKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color. Serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeColors {
    pub fill: Color,
    pub stroke: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
    pub arrow_size: f32,
    pub label_color: Color,
    pub label_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub colors: NodeColors,
    pub radius: f32,
    pub stroke_width: f32,
    pub label_color: Color,
    pub label_size: f32,
}

// ============================================================================
// Color Constants
// ============================================================================

pub const COLOR_ASSET_FILL: Color = Color::hex(0x475569);
pub const COLOR_ASSET_STROKE: Color = Color::hex(0x00f3ff);

pub const COLOR_PERSON_FILL: Color = Color::hex(0x4a5568);
pub const COLOR_PERSON_STROKE: Color = Color::hex(0xcbd5e1);

pub const COLOR_COMPANY_FILL: Color = Color::hex(0x2d3748);
pub const COLOR_COMPANY_STROKE: Color = Color::hex(0xa0aec0);

pub const COLOR_LEGAL_FILL: Color = Color::hex(0x1a202c);
pub const COLOR_LEGAL_STROKE: Color = Color::hex(0x718096);

pub const COLOR_EDGE_OWNS: Color = Color::hex(0x64748b);
pub const COLOR_EDGE_CONTROLS: Color = Color::hex(0x94a3b8);

pub const COLOR_NODE_LABEL: Color = Color::WHITE;
pub const COLOR_EDGE_LABEL: Color = Color::hex(0x94a3b8);

// ============================================================================
// Metrics
// ============================================================================

pub const NODE_LABEL_SIZE: f32 = 12.0;
pub const EDGE_LABEL_SIZE: f32 = 11.0;
pub const EDGE_WIDTH: f32 = 2.0;
pub const ARROW_SIZE: f32 = 10.0;
/// Half-angle of the arrowhead wings.
pub const ARROW_HALF_ANGLE: f32 = std::f32::consts::PI / 6.0;
/// Distance from the bottom of a node circle to its label baseline.
pub const NODE_LABEL_OFFSET: f32 = 15.0;
/// Distance from an edge midpoint up to its label baseline.
pub const EDGE_LABEL_OFFSET: f32 = 5.0;
pub const NODE_STROKE_WIDTH: f32 = 2.0;
pub const SELECTED_STROKE_WIDTH: f32 = 3.0;

// ============================================================================
// Style Functions
// ============================================================================

pub fn get_node_colors(kind: NodeKind) -> NodeColors {
    match kind {
        NodeKind::ASSET => NodeColors {
            fill: COLOR_ASSET_FILL,
            stroke: COLOR_ASSET_STROKE,
        },
        NodeKind::PERSON => NodeColors {
            fill: COLOR_PERSON_FILL,
            stroke: COLOR_PERSON_STROKE,
        },
        NodeKind::COMPANY => NodeColors {
            fill: COLOR_COMPANY_FILL,
            stroke: COLOR_COMPANY_STROKE,
        },
        NodeKind::LEGAL => NodeColors {
            fill: COLOR_LEGAL_FILL,
            stroke: COLOR_LEGAL_STROKE,
        },
    }
}

/// Selection changes the stroke width only; colors stay per kind.
pub fn get_node_style(kind: NodeKind, is_selected: bool) -> NodeStyle {
    NodeStyle {
        colors: get_node_colors(kind),
        radius: crate::hit_tester::node_radius(kind),
        stroke_width: if is_selected {
            SELECTED_STROKE_WIDTH
        } else {
            NODE_STROKE_WIDTH
        },
        label_color: COLOR_NODE_LABEL,
        label_size: NODE_LABEL_SIZE,
    }
}

pub fn get_edge_color(kind: EdgeKind) -> Color {
    match kind {
        EdgeKind::OWNS => COLOR_EDGE_OWNS,
        EdgeKind::CONTROLS => COLOR_EDGE_CONTROLS,
    }
}

pub fn get_edge_style(kind: EdgeKind) -> EdgeStyle {
    EdgeStyle {
        color: get_edge_color(kind),
        width: EDGE_WIDTH,
        arrow_size: ARROW_SIZE,
        label_color: COLOR_EDGE_LABEL,
        label_size: EDGE_LABEL_SIZE,
    }
}

/// Human-readable kind name shown in the node-details panel.
pub fn get_kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::ASSET => "Real Estate Asset",
        NodeKind::PERSON => "Individual Owner",
        NodeKind::COMPANY => "Corporate Entity",
        NodeKind::LEGAL => "Legal Entity",
    }
}
