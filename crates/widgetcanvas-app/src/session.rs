//! Session scripts: the user interactions a replay feeds to the canvas.
//!
//! A session file is a JSON array of events:
//! ```json
//! [
//!   { "type": "hover_enter", "widget_id": "t1" },
//!   { "type": "drag_start", "widget_id": "t1", "x": 105, "y": 245 },
//!   { "type": "drag_end" }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use widgetcanvas_core::{Modifiers, SelectionRequestType, WidgetId};

/// Session loading errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid session: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Pointer entered a widget.
    HoverEnter { widget_id: WidgetId },
    /// A drag gesture started on a widget at a client position.
    DragStart {
        widget_id: WidgetId,
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// The drag layer dropped the widgets.
    DragEnd,
    /// The drag layer moved over another canvas.
    DragOver { parent_id: Option<WidgetId> },
    SetResizing { value: bool },
    Select {
        mode: SelectionRequestType,
        #[serde(default)]
        widget_ids: Vec<WidgetId>,
    },
    Focus { widget_id: Option<WidgetId> },
    /// The evaluator produced a new entity for a widget.
    SetEntity { widget_name: String, entity: Value },
    SetPreviewMode { value: bool },
    SetShowWidgetName { value: bool },
    ShowTableFilterPane { widget_id: Option<WidgetId> },
    RemoveWidget { widget_id: WidgetId },
}

impl SessionEvent {
    /// Short name used in replay output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HoverEnter { .. } => "hover_enter",
            Self::DragStart { .. } => "drag_start",
            Self::DragEnd => "drag_end",
            Self::DragOver { .. } => "drag_over",
            Self::SetResizing { .. } => "set_resizing",
            Self::Select { .. } => "select",
            Self::Focus { .. } => "focus",
            Self::SetEntity { .. } => "set_entity",
            Self::SetPreviewMode { .. } => "set_preview_mode",
            Self::SetShowWidgetName { .. } => "set_show_widget_name",
            Self::ShowTableFilterPane { .. } => "show_table_filter_pane",
            Self::RemoveWidget { .. } => "remove_widget",
        }
    }
}

/// Parse a session script from JSON.
pub fn parse_session(json: &str) -> Result<Vec<SessionEvent>, SessionError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a session script file.
pub fn load_session(path: impl AsRef<Path>) -> Result<Vec<SessionEvent>, SessionError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let events = parse_session(&json)?;
    log::info!("Loaded {} session events from {}", events.len(), path.display());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        let events = parse_session(
            r#"[
                { "type": "hover_enter", "widget_id": "t1" },
                { "type": "drag_start", "widget_id": "t1", "x": 105, "y": 245,
                  "modifiers": { "meta": true } },
                { "type": "select", "mode": "Multiple", "widget_ids": ["a", "b"] },
                { "type": "drag_over", "parent_id": null },
                { "type": "drag_end" }
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], SessionEvent::HoverEnter {
            widget_id: "t1".to_string(),
        });
        match &events[1] {
            SessionEvent::DragStart { x, y, modifiers, .. } => {
                assert_eq!((*x, *y), (105.0, 245.0));
                assert!(modifiers.meta);
                assert!(!modifiers.ctrl);
            }
            other => panic!("Unexpected event {:?}", other),
        }
        assert_eq!(events[2].kind(), "select");
        assert_eq!(events[3], SessionEvent::DragOver { parent_id: None });
        assert_eq!(events[4], SessionEvent::DragEnd);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result = parse_session(r#"[{ "type": "teleport" }]"#);
        assert!(matches!(result, Err(SessionError::Parse(_))));
    }
}
