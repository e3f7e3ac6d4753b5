//! Drag and resize state.

use crate::widget::WidgetId;
use serde::{Deserialize, Serialize};

/// A cell inside a widget, in fractional grid units from its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub top: f64,
    pub left: f64,
}

impl GridPoint {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// The widget a drag group is centred on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggingGroupCenter {
    #[serde(default)]
    pub widget_id: Option<WidgetId>,
}

/// Details of the drag in progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDetails {
    /// Parent the dragged widgets belonged to when the drag started.
    pub drag_group_actual_parent: String,
    pub dragging_group_center: DraggingGroupCenter,
    /// Grab point inside the dragged widget.
    pub drag_offset: GridPoint,
    /// Canvas the drag is currently over.
    pub dragged_on: Option<WidgetId>,
}

/// Intent committed to the drag state to start or stop a drag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragIntent {
    pub is_dragging: bool,
    #[serde(default)]
    pub drag_group_actual_parent: String,
    #[serde(default)]
    pub dragging_group_center: DraggingGroupCenter,
    #[serde(default)]
    pub start_points: GridPoint,
    #[serde(default)]
    pub dragged_on: Option<WidgetId>,
}

impl DragIntent {
    /// Intent that ends any drag in progress.
    pub fn stop() -> Self {
        Self::default()
    }
}

/// Global drag/resize flags and the details of the current drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragResizeState {
    pub is_dragging: bool,
    pub is_resizing: bool,
    /// Dragging turned off editor-wide.
    pub is_dragging_disabled: bool,
    pub drag_details: DragDetails,
}

impl DragResizeState {
    /// True while any widget is being dragged or resized.
    pub fn is_resizing_or_dragging(&self) -> bool {
        self.is_resizing || self.is_dragging
    }

    /// Check if the drag in progress is over the given parent canvas.
    ///
    /// An absent parent matches an absent drop target.
    pub fn is_dragged_on(&self, parent_id: Option<&str>) -> bool {
        self.drag_details.dragged_on.as_deref() == parent_id
    }

    /// Apply a drag intent, replacing the drag details atomically.
    pub fn apply(&mut self, intent: DragIntent) {
        self.is_dragging = intent.is_dragging;
        self.drag_details = DragDetails {
            drag_group_actual_parent: intent.drag_group_actual_parent,
            dragging_group_center: intent.dragging_group_center,
            drag_offset: intent.start_points,
            dragged_on: intent.dragged_on,
        };
    }
}
