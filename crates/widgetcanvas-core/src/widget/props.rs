//! Widget props and grid geometry.

use super::WidgetId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// All widgets on the canvas, keyed by id.
pub type CanvasWidgets = HashMap<WidgetId, WidgetProps>;

/// Generate a fresh widget id.
pub fn generate_widget_id() -> WidgetId {
    Uuid::new_v4().simple().to_string()
}

/// Placement of a widget on its parent's layout grid.
///
/// Rows and columns are grid units; `parent_row_space` and
/// `parent_column_space` give the pixel size of one unit in the parent.
/// Fields missing from a fixture take their [`Default`] values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetGeometry {
    pub top_row: f64,
    pub bottom_row: f64,
    pub left_column: f64,
    pub right_column: f64,
    pub parent_row_space: f64,
    pub parent_column_space: f64,
}

impl WidgetGeometry {
    /// Height in grid rows.
    pub fn height(&self) -> f64 {
        self.bottom_row - self.top_row
    }

    /// Width in grid columns.
    pub fn width(&self) -> f64 {
        self.right_column - self.left_column
    }

    /// Check that the rows and columns span a non-empty area.
    pub fn is_valid(&self) -> bool {
        self.bottom_row > self.top_row && self.right_column > self.left_column
    }
}

impl Default for WidgetGeometry {
    fn default() -> Self {
        Self {
            top_row: 0.0,
            bottom_row: 1.0,
            left_column: 0.0,
            right_column: 1.0,
            parent_row_space: 10.0,
            parent_column_space: 10.0,
        }
    }
}

/// A widget as stored in the canvas widget map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetProps {
    /// Generated when absent from a fixture.
    #[serde(default = "generate_widget_id")]
    pub widget_id: WidgetId,
    /// Display name, also the key of the widget's entity in the data tree.
    pub widget_name: String,
    /// Widget type, e.g. `TABLE_WIDGET`.
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub parent_id: Option<WidgetId>,
    #[serde(default)]
    pub drag_disabled: bool,
    #[serde(default)]
    pub resize_disabled: bool,
    /// Set for widgets laid out by a flex container rather than the grid.
    #[serde(default)]
    pub is_flex_child: bool,
    #[serde(flatten)]
    pub geometry: WidgetGeometry,
}

impl WidgetProps {
    /// Create a widget with a generated id and default geometry.
    pub fn new(widget_name: impl Into<String>, widget_type: impl Into<String>) -> Self {
        Self {
            widget_id: generate_widget_id(),
            widget_name: widget_name.into(),
            widget_type: widget_type.into(),
            parent_id: None,
            drag_disabled: false,
            resize_disabled: false,
            is_flex_child: false,
            geometry: WidgetGeometry::default(),
        }
    }

    /// Set the widget id.
    pub fn with_id(mut self, widget_id: impl Into<WidgetId>) -> Self {
        self.widget_id = widget_id.into();
        self
    }

    /// Set the parent widget.
    pub fn with_parent(mut self, parent_id: impl Into<WidgetId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the grid geometry.
    pub fn with_geometry(mut self, geometry: WidgetGeometry) -> Self {
        self.geometry = geometry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_dimensions() {
        let geometry = WidgetGeometry {
            top_row: 2.0,
            bottom_row: 5.0,
            left_column: 1.0,
            right_column: 4.0,
            ..Default::default()
        };
        assert_eq!(geometry.height(), 3.0);
        assert_eq!(geometry.width(), 3.0);
        assert!(geometry.is_valid());
    }

    #[test]
    fn test_degenerate_geometry_is_invalid() {
        let geometry = WidgetGeometry {
            top_row: 4.0,
            bottom_row: 4.0,
            ..Default::default()
        };
        assert!(!geometry.is_valid());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = WidgetProps::new("Button1", "BUTTON_WIDGET");
        let b = WidgetProps::new("Button2", "BUTTON_WIDGET");
        assert_ne!(a.widget_id, b.widget_id);
    }

    #[test]
    fn test_deserialize_flattened_geometry() {
        let json = r#"{
            "widgetId": "w1",
            "widgetName": "Table1",
            "type": "TABLE_WIDGET",
            "parentId": "0",
            "topRow": 1, "bottomRow": 9,
            "leftColumn": 0, "rightColumn": 12,
            "parentRowSpace": 10, "parentColumnSpace": 15.5
        }"#;
        let widget: WidgetProps = serde_json::from_str(json).unwrap();
        assert_eq!(widget.widget_type, "TABLE_WIDGET");
        assert_eq!(widget.parent_id.as_deref(), Some("0"));
        assert!(!widget.drag_disabled);
        assert_eq!(widget.geometry.width(), 12.0);
        assert_eq!(widget.geometry.parent_column_space, 15.5);
    }

    #[test]
    fn test_deserialize_without_geometry() {
        let json = r#"{ "widgetName": "Text1", "type": "TEXT_WIDGET", "bottomRow": 4 }"#;
        let widget: WidgetProps = serde_json::from_str(json).unwrap();
        assert_eq!(widget.widget_name, "Text1");
        assert!(!widget.widget_id.is_empty());
        assert_eq!(widget.geometry.top_row, 0.0);
        assert_eq!(widget.geometry.height(), 4.0);
        assert_eq!(widget.geometry.parent_row_space, 10.0);
    }
}
