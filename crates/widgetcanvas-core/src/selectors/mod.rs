//! Derived reads over the editor state.

mod memo;

pub use memo::{Selector, SelectorInput};

use crate::data_tree::DataTree;
use crate::store::EditorState;
use crate::widget::{CanvasWidgets, WidgetId, WidgetPositions};
use std::collections::HashSet;
use std::rc::Rc;

pub fn is_widget_selected(state: &EditorState, widget_id: &str) -> bool {
    state.selection.is_selected(widget_id)
}

pub fn is_current_widget_focused(state: &EditorState, widget_id: &str) -> bool {
    state.selection.is_focused(widget_id)
}

/// True while a drag is in progress over the given parent canvas.
pub fn is_dragging_sibling(state: &EditorState, parent_id: Option<&str>) -> bool {
    state.drag_resize.is_dragged_on(parent_id)
}

/// Whether widgets may start a drag right now.
pub fn should_allow_drag(state: &EditorState) -> bool {
    let drag_resize = &state.drag_resize;
    !drag_resize.is_resizing
        && !drag_resize.is_dragging
        && !drag_resize.is_dragging_disabled
        && !state.flags.preview_mode
}

pub fn get_widget_positions(state: &EditorState) -> Rc<WidgetPositions> {
    Rc::clone(&state.positions)
}

pub fn get_widgets(state: &EditorState) -> Rc<CanvasWidgets> {
    Rc::clone(&state.widgets)
}

pub fn get_data_tree(state: &EditorState) -> Rc<DataTree> {
    Rc::clone(&state.data_tree)
}

pub fn get_selected_widgets(state: &EditorState) -> Rc<HashSet<WidgetId>> {
    Rc::clone(state.selection.selected_handle())
}

pub fn get_focused_widget(state: &EditorState) -> Option<WidgetId> {
    state.selection.focused().cloned()
}

pub fn get_should_show_widget_name(state: &EditorState) -> bool {
    state.flags.show_widget_name
}
