//! Scene fixtures: widgets, positions and a data tree loaded from JSON.
//!
//! A scene is the canvas content the editor state is seeded with. It is only
//! read, never written back.

use crate::data_tree::DataTree;
use crate::store::{EditorState, Store};
use crate::widget::{CanvasWidgets, MAIN_CONTAINER_WIDGET_ID, WidgetPositions, WidgetProps};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Scene loading errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to read scene {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid scene: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate widget id: {0}")]
    DuplicateWidget(String),
    #[error("Widget {0} has an empty grid area")]
    InvalidGeometry(String),
    #[error("Widget {widget_id} references unknown parent {parent_id}")]
    UnknownParent {
        widget_id: String,
        parent_id: String,
    },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Canvas content as stored in a fixture file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub widgets: Vec<WidgetProps>,
    pub positions: WidgetPositions,
    pub data_tree: DataTree,
}

impl Scene {
    /// Parse and validate a scene from JSON.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: Self = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load a scene file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let scene = Self::from_json_str(&json)?;
        log::info!(
            "Loaded scene from {} ({} widgets)",
            path.display(),
            scene.widgets.len()
        );
        Ok(scene)
    }

    /// Check widget ids are unique, grid areas non-empty and parents known.
    ///
    /// A parent may be another widget in the scene or the main container.
    pub fn validate(&self) -> SceneResult<()> {
        let mut ids = HashSet::new();
        for widget in &self.widgets {
            if !ids.insert(widget.widget_id.as_str()) {
                return Err(SceneError::DuplicateWidget(widget.widget_id.clone()));
            }
            if !widget.geometry.is_valid() {
                return Err(SceneError::InvalidGeometry(widget.widget_id.clone()));
            }
        }
        for widget in &self.widgets {
            if let Some(parent_id) = &widget.parent_id {
                if parent_id != MAIN_CONTAINER_WIDGET_ID && !ids.contains(parent_id.as_str()) {
                    return Err(SceneError::UnknownParent {
                        widget_id: widget.widget_id.clone(),
                        parent_id: parent_id.clone(),
                    });
                }
            }
        }
        for id in self.positions.keys() {
            if !ids.contains(id.as_str()) {
                log::warn!("Scene has a position for unknown widget {}", id);
            }
        }
        Ok(())
    }

    /// Look up a widget by id.
    pub fn widget(&self, widget_id: &str) -> Option<&WidgetProps> {
        self.widgets.iter().find(|widget| widget.widget_id == widget_id)
    }

    fn widget_map(&self) -> CanvasWidgets {
        self.widgets
            .iter()
            .map(|widget| (widget.widget_id.clone(), widget.clone()))
            .collect()
    }

    /// Build fresh editor state holding this scene.
    pub fn to_state(&self) -> EditorState {
        EditorState {
            widgets: Rc::new(self.widget_map()),
            positions: Rc::new(self.positions.clone()),
            data_tree: Rc::new(self.data_tree.clone()),
            ..Default::default()
        }
    }

    /// Load this scene into an existing store, notifying observers once.
    pub fn apply_to(&self, store: &Store) {
        store.batch(|store| {
            for widget in &self.widgets {
                store.upsert_widget(widget.clone());
            }
            store.set_positions(self.positions.clone());
            store.set_data_tree(self.data_tree.clone());
        });
    }
}
