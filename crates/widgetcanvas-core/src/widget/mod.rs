//! Widget data owned by the editor state.
//!
//! Widgets are plain data: props describing what the widget is and where it
//! sits on the layout grid, plus the pixel positions the canvas measured for
//! them. UI state (selection, focus, drag) lives in [`crate::store`].

mod position;
mod props;

pub use position::{WidgetPosition, WidgetPositions};
pub use props::{CanvasWidgets, WidgetGeometry, WidgetProps, generate_widget_id};

/// Stable widget identifier.
pub type WidgetId = String;

/// Identifier of the root canvas every top-level widget belongs to.
pub const MAIN_CONTAINER_WIDGET_ID: &str = "0";

/// Padding, in pixels, the canvas reserves around every widget.
pub const WIDGET_PADDING: f64 = 2.0;
