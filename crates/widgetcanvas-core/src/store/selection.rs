//! Selection and focus state.

use crate::widget::WidgetId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;

/// How a selection request combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRequestType {
    /// Clear the selection.
    Empty,
    /// Select exactly the given widget, replacing the selection.
    One,
    /// Replace the selection with the given widgets.
    Multiple,
    /// Toggle each given widget in or out of the selection.
    PushPop,
    /// Remove the given widgets from the selection.
    Unselect,
}

/// Selected and focused widgets.
///
/// Selection is an explicit, user-chosen set; focus is the single widget
/// the pointer is hovering as a candidate for interaction.
///
/// The selected set is shared behind an `Rc` that is only replaced when its
/// contents change, so readers can compare it by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Rc<HashSet<WidgetId>>,
    last_selected: Option<WidgetId>,
    focused: Option<WidgetId>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a widget is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Check if a widget is the focused one.
    pub fn is_focused(&self, id: &str) -> bool {
        self.focused.as_deref() == Some(id)
    }

    /// All selected widget ids.
    pub fn selected(&self) -> &HashSet<WidgetId> {
        &self.selected
    }

    /// Shared handle to the selected set.
    pub fn selected_handle(&self) -> &Rc<HashSet<WidgetId>> {
        &self.selected
    }

    /// The selected widget, when exactly one is selected.
    pub fn single_selected(&self) -> Option<&WidgetId> {
        if self.selected.len() == 1 {
            self.selected.iter().next()
        } else {
            None
        }
    }

    /// The focused widget id.
    pub fn focused(&self) -> Option<&WidgetId> {
        self.focused.as_ref()
    }

    /// The most recently selected widget id.
    pub fn last_selected(&self) -> Option<&WidgetId> {
        self.last_selected.as_ref()
    }

    /// Set or clear the focused widget.
    ///
    /// Returns true if the focus changed.
    pub fn set_focused(&mut self, id: Option<&str>) -> bool {
        if self.focused.as_deref() == id {
            return false;
        }
        self.focused = id.map(str::to_string);
        true
    }

    /// Apply a selection request.
    ///
    /// Returns true if the selected set or the last selected widget changed.
    pub fn apply(&mut self, request: SelectionRequestType, ids: &[WidgetId]) -> bool {
        let mut selected = (*self.selected).clone();
        let mut last_selected = self.last_selected.clone();

        match request {
            SelectionRequestType::Empty => {
                selected.clear();
                last_selected = None;
            }
            SelectionRequestType::One => {
                selected.clear();
                if let Some(id) = ids.first() {
                    selected.insert(id.clone());
                    last_selected = Some(id.clone());
                }
            }
            SelectionRequestType::Multiple => {
                selected = ids.iter().cloned().collect();
                last_selected = ids.last().cloned();
            }
            SelectionRequestType::PushPop => {
                for id in ids {
                    if !selected.remove(id) {
                        selected.insert(id.clone());
                        last_selected = Some(id.clone());
                    }
                }
            }
            SelectionRequestType::Unselect => {
                for id in ids {
                    selected.remove(id);
                }
            }
        }

        if last_selected.as_ref().is_some_and(|last| !selected.contains(last)) {
            last_selected = None;
        }

        let mut changed = false;
        if selected != *self.selected {
            self.selected = Rc::new(selected);
            changed = true;
        }
        if last_selected != self.last_selected {
            self.last_selected = last_selected;
            changed = true;
        }
        changed
    }

    /// Forget a widget that no longer exists.
    pub fn remove(&mut self, id: &str) -> bool {
        let mut changed = false;
        if self.selected.contains(id) {
            let mut selected = (*self.selected).clone();
            selected.remove(id);
            self.selected = Rc::new(selected);
            changed = true;
        }
        if self.last_selected.as_deref() == Some(id) {
            self.last_selected = None;
            changed = true;
        }
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
            changed = true;
        }
        changed
    }
}
