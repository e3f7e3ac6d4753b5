//! Widget name badges drawn on the canvas.
//!
//! At most two badges are drawn: one for the selected widget and one for the
//! focused (hovered) widget. Both are derived through memoized selectors so
//! the canvas only redraws them when their inputs change.

use crate::data_tree::{DataTree, entity_error_count};
use crate::selectors::{
    Selector, get_data_tree, get_focused_widget, get_selected_widgets, get_should_show_widget_name,
    get_widget_positions, get_widgets,
};
use crate::store::{EditorState, SliceSet, StateSlice, StoreHandle, SubscriptionId};
use crate::widget::{
    CanvasWidgets, MAIN_CONTAINER_WIDGET_ID, WidgetId, WidgetPosition, WidgetPositions, WidgetProps,
};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Display state of a name badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WidgetNameState {
    Focused,
    Selected,
    /// The widget has evaluation errors; overrides focus and selection.
    Error,
}

/// Everything the canvas needs to draw a widget's name badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetNameData {
    pub id: WidgetId,
    pub position: Option<WidgetPosition>,
    pub widget_name: String,
    pub parent_id: WidgetId,
    pub drag_disabled: bool,
    pub name_state: WidgetNameState,
}

/// Compute the badge data for a widget.
pub fn widget_name_data(
    widget: &WidgetProps,
    data_tree: &DataTree,
    positions: &WidgetPositions,
    is_focused: bool,
) -> WidgetNameData {
    let mut name_state = if is_focused {
        WidgetNameState::Focused
    } else {
        WidgetNameState::Selected
    };

    if let Some(entity) = data_tree.get(&widget.widget_name) {
        if entity_error_count(entity) > 0 {
            name_state = WidgetNameState::Error;
        }
    }

    WidgetNameData {
        id: widget.widget_id.clone(),
        position: positions.get(&widget.widget_id).copied(),
        widget_name: widget.widget_name.clone(),
        parent_id: widget
            .parent_id
            .clone()
            .unwrap_or_else(|| MAIN_CONTAINER_WIDGET_ID.to_string()),
        drag_disabled: widget.drag_disabled,
        name_state,
    }
}

pub type SelectedNameInputs = (
    Rc<WidgetPositions>,
    Rc<HashSet<WidgetId>>,
    Rc<CanvasWidgets>,
    Rc<DataTree>,
    bool,
);

pub type FocusedNameInputs = (
    Rc<WidgetPositions>,
    Option<WidgetId>,
    Rc<HashSet<WidgetId>>,
    Rc<CanvasWidgets>,
    Rc<DataTree>,
    bool,
);

pub type NameDataSelector<I> = Selector<I, Option<WidgetNameData>>;

fn selected_name_inputs(state: &EditorState) -> SelectedNameInputs {
    (
        get_widget_positions(state),
        get_selected_widgets(state),
        get_widgets(state),
        get_data_tree(state),
        get_should_show_widget_name(state),
    )
}

fn focused_name_inputs(state: &EditorState) -> FocusedNameInputs {
    (
        get_widget_positions(state),
        get_focused_widget(state),
        get_selected_widgets(state),
        get_widgets(state),
        get_data_tree(state),
        get_should_show_widget_name(state),
    )
}

/// Badge for the selected widget, when exactly one existing widget is selected.
pub fn selected_name_data(
    (positions, selected, widgets, data_tree, show_widget_name): &SelectedNameInputs,
) -> Option<WidgetNameData> {
    if !show_widget_name || selected.len() != 1 {
        return None;
    }
    let selected_id = selected.iter().next()?;
    let widget = widgets.get(selected_id)?;
    Some(widget_name_data(widget, data_tree, positions, false))
}

/// Badge for the focused widget, unless it is also selected.
pub fn focused_name_data(
    (positions, focused, selected, widgets, data_tree, show_widget_name): &FocusedNameInputs,
) -> Option<WidgetNameData> {
    let focused_id = focused.as_ref()?;
    if !show_widget_name || widgets.is_empty() {
        return None;
    }
    let widget = widgets.get(focused_id)?;
    if selected.contains(focused_id) {
        return None;
    }
    Some(widget_name_data(widget, data_tree, positions, true))
}

/// Memoized selector for the selected widget's badge.
pub fn selected_name_data_selector() -> NameDataSelector<SelectedNameInputs> {
    Selector::new("selected_name_data", selected_name_inputs, selected_name_data)
}

/// Memoized selector for the focused widget's badge.
pub fn focused_name_data_selector() -> NameDataSelector<FocusedNameInputs> {
    Selector::new("focused_name_data", focused_name_inputs, focused_name_data)
}

/// Slices the name badges are derived from.
pub fn name_overlay_slices() -> SliceSet {
    SliceSet::from([
        StateSlice::Positions,
        StateSlice::Selection,
        StateSlice::Widgets,
        StateSlice::DataTree,
        StateSlice::Flags,
    ])
}

/// The badges to draw in one frame.
#[derive(Debug, Clone, Default)]
pub struct NameOverlayFrame {
    pub selected: Rc<Option<WidgetNameData>>,
    pub focused: Rc<Option<WidgetNameData>>,
}

impl NameOverlayFrame {
    /// Badges in draw order.
    pub fn labels(&self) -> impl Iterator<Item = &WidgetNameData> {
        self.selected.iter().chain(self.focused.iter())
    }

    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.selected, &other.selected) && Rc::ptr_eq(&self.focused, &other.focused)
    }
}

/// Keeps the name badge frame up to date with the editor state.
#[derive(Debug)]
pub struct NameOverlay {
    selected: NameDataSelector<SelectedNameInputs>,
    focused: NameDataSelector<FocusedNameInputs>,
    frame: NameOverlayFrame,
}

impl Default for NameOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl NameOverlay {
    pub fn new() -> Self {
        Self {
            selected: selected_name_data_selector(),
            focused: focused_name_data_selector(),
            frame: NameOverlayFrame::default(),
        }
    }

    /// Re-derive the frame. Returns true if either badge changed.
    pub fn refresh(&mut self, state: &EditorState) -> bool {
        let next = NameOverlayFrame {
            selected: self.selected.select(state),
            focused: self.focused.select(state),
        };
        if next.same_as(&self.frame) {
            return false;
        }
        self.frame = next;
        true
    }

    pub fn frame(&self) -> &NameOverlayFrame {
        &self.frame
    }

    /// Total combine-step runs across both selectors.
    pub fn recomputations(&self) -> usize {
        self.selected.recomputations() + self.focused.recomputations()
    }

    /// Create an overlay that refreshes itself whenever one of its slices
    /// changes, calling `on_change` when the frame differs.
    pub fn attach(
        store: &StoreHandle,
        on_change: impl Fn(&NameOverlayFrame) + 'static,
    ) -> (Rc<RefCell<NameOverlay>>, SubscriptionId) {
        let overlay = Rc::new(RefCell::new(NameOverlay::new()));
        overlay.borrow_mut().refresh(&store.state());

        let weak = Rc::downgrade(&overlay);
        let id = store.subscribe(name_overlay_slices(), move |state, _| {
            let Some(overlay) = weak.upgrade() else {
                return;
            };
            let mut overlay = overlay.borrow_mut();
            if overlay.refresh(state) {
                on_change(overlay.frame());
            }
        });
        (overlay, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SelectionRequestType, Store};
    use crate::widget::WidgetGeometry;
    use serde_json::json;
    use std::cell::Cell;

    fn ids(ids: &[&str]) -> Vec<WidgetId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn seeded_store() -> Store {
        let store = Store::new();
        store.upsert_widget(
            WidgetProps::new("Text1", "TEXT_WIDGET")
                .with_id("t1")
                .with_parent("c1")
                .with_geometry(WidgetGeometry::default()),
        );
        store.upsert_widget(WidgetProps::new("Button1", "BUTTON_WIDGET").with_id("b1"));
        store.set_position("t1", WidgetPosition::new(10.0, 20.0, 100.0, 40.0));
        store.set_entity("Text1", json!({ "text": "hello" }));
        store
    }

    fn badge(data: Rc<Option<WidgetNameData>>) -> WidgetNameData {
        (*data).clone().expect("expected a name badge")
    }

    fn entity_with_one_error() -> serde_json::Value {
        json!({
            "__evaluation__": { "errors": { "text": [{ "errorMessage": "boom" }] } }
        })
    }

    #[test]
    fn test_selected_badge() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));

        let data = badge(selected_name_data_selector().select(&store.state()));
        assert_eq!(data.id, "t1");
        assert_eq!(data.widget_name, "Text1");
        assert_eq!(data.parent_id, "c1");
        assert_eq!(data.name_state, WidgetNameState::Selected);
        assert_eq!(data.position, Some(WidgetPosition::new(10.0, 20.0, 100.0, 40.0)));
    }

    #[test]
    fn test_parent_defaults_to_main_container() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["b1"]));

        let data = badge(selected_name_data_selector().select(&store.state()));
        assert_eq!(data.parent_id, MAIN_CONTAINER_WIDGET_ID);
        assert_eq!(data.position, None);
    }

    #[test]
    fn test_no_selected_badge_for_multiple_selection() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::Multiple, &ids(&["t1", "b1"]));
        assert!(store.state().flags.show_widget_name);
        assert!(selected_name_data_selector().select(&store.state()).is_none());
    }

    #[test]
    fn test_no_selected_badge_when_hidden_or_missing() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["ghost"]));
        assert!(selected_name_data_selector().select(&store.state()).is_none());

        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));
        store.set_show_widget_name(false);
        assert!(selected_name_data_selector().select(&store.state()).is_none());
    }

    #[test]
    fn test_focused_badge() {
        let store = seeded_store();
        store.focus_widget(Some("t1"));

        let data = badge(focused_name_data_selector().select(&store.state()));
        assert_eq!(data.id, "t1");
        assert_eq!(data.name_state, WidgetNameState::Focused);
    }

    #[test]
    fn test_no_focused_badge_for_selected_widget() {
        let store = seeded_store();
        store.focus_widget(Some("t1"));
        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));
        assert!(focused_name_data_selector().select(&store.state()).is_none());
    }

    #[test]
    fn test_no_focused_badge_without_focus_or_widgets() {
        let store = Store::new();
        assert!(focused_name_data_selector().select(&store.state()).is_none());
        store.focus_widget(Some("t1"));
        assert!(focused_name_data_selector().select(&store.state()).is_none());
    }

    #[test]
    fn test_error_overrides_focus() {
        let widget = WidgetProps::new("Text1", "TEXT_WIDGET").with_id("t1");
        let mut data_tree = DataTree::new();
        data_tree.insert("Text1".to_string(), entity_with_one_error());

        let data = widget_name_data(&widget, &data_tree, &WidgetPositions::new(), true);
        assert_eq!(data.name_state, WidgetNameState::Error);

        let data = widget_name_data(&widget, &DataTree::new(), &WidgetPositions::new(), true);
        assert_eq!(data.name_state, WidgetNameState::Focused);
    }

    #[test]
    fn test_selectors_are_referentially_stable() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));
        let selector = selected_name_data_selector();

        let first = selector.select(&store.state());
        let second = selector.select(&store.state());
        assert!(Rc::ptr_eq(&first, &second));

        store.set_resizing(true);
        store.show_table_filter_pane(Some("t1"));
        let third = selector.select(&store.state());
        assert!(Rc::ptr_eq(&first, &third));
        assert_eq!(selector.recomputations(), 1);
    }

    #[test]
    fn test_focus_change_does_not_recompute_selected_badge() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));
        let selector = selected_name_data_selector();
        selector.select(&store.state());

        store.focus_widget(Some("b1"));
        selector.select(&store.state());
        assert_eq!(selector.recomputations(), 1);
    }

    #[test]
    fn test_data_tree_error_updates_badge() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));
        let mut overlay = NameOverlay::new();
        assert!(overlay.refresh(&store.state()));

        store.set_entity("Text1", entity_with_one_error());
        assert!(overlay.refresh(&store.state()));
        let state = (*overlay.frame().selected).as_ref().map(|d| d.name_state);
        assert_eq!(state, Some(WidgetNameState::Error));
    }

    #[test]
    fn test_overlay_labels() {
        let store = seeded_store();
        store.select_widget(SelectionRequestType::One, &ids(&["t1"]));
        store.focus_widget(Some("b1"));

        let mut overlay = NameOverlay::new();
        overlay.refresh(&store.state());
        let names: Vec<_> = overlay.frame().labels().map(|d| d.widget_name.as_str()).collect();
        assert_eq!(names, vec!["Text1", "Button1"]);
        assert!(!overlay.refresh(&store.state()));
    }

    #[test]
    fn test_attached_overlay_follows_store() {
        let store = Rc::new(seeded_store());
        let changes = Rc::new(Cell::new(0));
        let sink = Rc::clone(&changes);
        let (overlay, _) = NameOverlay::attach(&store, move |_| sink.set(sink.get() + 1));

        store.focus_widget(Some("b1"));
        assert_eq!(changes.get(), 1);
        assert_eq!(
            (*overlay.borrow().frame().focused).as_ref().map(|d| d.id.as_str()),
            Some("b1")
        );

        store.set_resizing(true);
        assert_eq!(changes.get(), 1);

        store.select_widget(SelectionRequestType::One, &ids(&["b1"]));
        assert_eq!(changes.get(), 2);
        assert!(overlay.borrow().frame().focused.is_none());
    }
}
