pub mod details;
pub mod error;
pub mod inspector;
pub mod interaction;
pub mod raster;
pub mod renderer;
pub mod settings;
pub mod surface;

pub use details::{AssetHeader, DetailRow, NodeDetails};
pub use error::InspectorError;
pub use inspector::{InspectorView, OwnershipInspector};
pub use interaction::{InteractionController, InteractionState, Redraw, WheelOutcome};
pub use raster::{RasterSurface, load_font};
pub use renderer::{RenderStats, Renderer};
pub use settings::InspectorSettings;
pub use surface::{DisplayList, DrawCommand, DrawSurface};
