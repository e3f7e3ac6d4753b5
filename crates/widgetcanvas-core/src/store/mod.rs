//! Shared editor state with slice-level change notification.
//!
//! The [`Store`] is the single place editor state is mutated. Components hold
//! a [`StoreHandle`], read through accessors or [`Store::state`], and call the
//! narrow set of mutation methods below. Observers subscribe to the slices
//! they render from and are notified after each committed change to one of
//! those slices.

mod drag_resize;
mod selection;
mod state;

pub use drag_resize::{DragDetails, DragIntent, DragResizeState, DraggingGroupCenter, GridPoint};
pub use selection::{SelectionRequestType, SelectionState};
pub use state::{EditorFlags, EditorState, SliceSet, StateSlice, TableFilterPaneState};

use crate::config::EditorConfig;
use crate::data_tree::DataTree;
use crate::widget::{WidgetId, WidgetPosition, WidgetPositions, WidgetProps};
use serde_json::Value;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

/// Shared handle to the editor store.
pub type StoreHandle = Rc<Store>;

/// Identifier returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn(&EditorState, SliceSet)>;

struct Observer {
    id: SubscriptionId,
    slices: SliceSet,
    callback: Callback,
}

/// Editor state store.
pub struct Store {
    state: RefCell<EditorState>,
    observers: RefCell<Vec<Observer>>,
    next_subscription: Cell<u64>,
    batch_depth: Cell<usize>,
    pending: Cell<SliceSet>,
    notifying: Cell<bool>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create a store with empty state.
    pub fn new() -> Self {
        Self::with_state(EditorState::default())
    }

    /// Create a store seeded with the given state.
    pub fn with_state(state: EditorState) -> Self {
        Self {
            state: RefCell::new(state),
            observers: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            batch_depth: Cell::new(0),
            pending: Cell::new(SliceSet::EMPTY),
            notifying: Cell::new(false),
        }
    }

    /// Create a shared store seeded with the given state.
    pub fn shared(state: EditorState) -> StoreHandle {
        Rc::new(Self::with_state(state))
    }

    /// Borrow the current state.
    ///
    /// The borrow must be released before calling a mutation method.
    pub fn state(&self) -> Ref<'_, EditorState> {
        self.state.borrow()
    }

    /// Clone the current state. Entity maps are shared, not copied.
    pub fn snapshot(&self) -> EditorState {
        self.state.borrow().clone()
    }

    // --- Reads ---

    pub fn is_selected(&self, widget_id: &str) -> bool {
        self.state.borrow().selection.is_selected(widget_id)
    }

    pub fn is_focused(&self, widget_id: &str) -> bool {
        self.state.borrow().selection.is_focused(widget_id)
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag_resize.is_dragging
    }

    pub fn is_resizing(&self) -> bool {
        self.state.borrow().drag_resize.is_resizing
    }

    /// Check if the drag in progress is over the given parent canvas.
    pub fn is_dragged_on(&self, parent_id: Option<&str>) -> bool {
        self.state.borrow().drag_resize.is_dragged_on(parent_id)
    }

    // --- Selection ---

    /// Focus a widget, or clear focus.
    pub fn focus_widget(&self, widget_id: Option<&str>) {
        log::trace!("focus_widget({:?})", widget_id);
        self.update(StateSlice::Selection, |state| state.selection.set_focused(widget_id));
    }

    /// Apply a selection request.
    pub fn select_widget(&self, request: SelectionRequestType, widget_ids: &[WidgetId]) {
        log::debug!("select_widget({:?}, {:?})", request, widget_ids);
        self.update(StateSlice::Selection, |state| state.selection.apply(request, widget_ids));
    }

    // --- Drag and resize ---

    /// Commit a drag start or stop intent.
    pub fn set_dragging_state(&self, intent: DragIntent) {
        log::debug!(
            "set_dragging_state(is_dragging: {}, dragged_on: {:?})",
            intent.is_dragging,
            intent.dragged_on
        );
        self.update(StateSlice::DragResize, |state| {
            let before = state.drag_resize.clone();
            state.drag_resize.apply(intent);
            state.drag_resize != before
        });
    }

    /// Record the canvas the drag in progress is currently over.
    pub fn set_dragged_on(&self, parent_id: Option<&str>) {
        self.update(StateSlice::DragResize, |state| {
            let details = &mut state.drag_resize.drag_details;
            if details.dragged_on.as_deref() == parent_id {
                return false;
            }
            details.dragged_on = parent_id.map(str::to_string);
            true
        });
    }

    pub fn set_resizing(&self, is_resizing: bool) {
        self.update(StateSlice::DragResize, |state| {
            set_if_changed(&mut state.drag_resize.is_resizing, is_resizing)
        });
    }

    pub fn set_dragging_disabled(&self, disabled: bool) {
        self.update(StateSlice::DragResize, |state| {
            set_if_changed(&mut state.drag_resize.is_dragging_disabled, disabled)
        });
    }

    // --- Panels and flags ---

    /// Show the table filter pane for a widget, or hide it.
    pub fn show_table_filter_pane(&self, widget_id: Option<&str>) {
        self.update(StateSlice::TableFilterPane, |state| {
            state.table_filter_pane.show(widget_id)
        });
    }

    pub fn set_show_widget_name(&self, show: bool) {
        self.update(StateSlice::Flags, |state| {
            set_if_changed(&mut state.flags.show_widget_name, show)
        });
    }

    pub fn set_preview_mode(&self, preview: bool) {
        self.update(StateSlice::Flags, |state| {
            set_if_changed(&mut state.flags.preview_mode, preview)
        });
    }

    /// Apply editor configuration to the flags and drag state.
    pub fn apply_config(&self, config: &EditorConfig) {
        self.batch(|store| {
            store.set_show_widget_name(config.show_widget_name);
            store.set_preview_mode(config.preview_mode);
            store.set_dragging_disabled(config.dragging_disabled);
        });
    }

    // --- Entities ---

    /// Insert or replace a widget.
    pub fn upsert_widget(&self, widget: WidgetProps) {
        self.update(StateSlice::Widgets, |state| {
            if state.widgets.get(&widget.widget_id) == Some(&widget) {
                return false;
            }
            Rc::make_mut(&mut state.widgets).insert(widget.widget_id.clone(), widget);
            true
        });
    }

    /// Remove a widget along with its position, selection and focus.
    pub fn remove_widget(&self, widget_id: &str) {
        log::debug!("remove_widget({})", widget_id);
        self.batch(|store| {
            store.update(StateSlice::Widgets, |state| {
                state.widgets.contains_key(widget_id)
                    && Rc::make_mut(&mut state.widgets).remove(widget_id).is_some()
            });
            store.update(StateSlice::Positions, |state| {
                state.positions.contains_key(widget_id)
                    && Rc::make_mut(&mut state.positions).remove(widget_id).is_some()
            });
            store.update(StateSlice::Selection, |state| state.selection.remove(widget_id));
        });
    }

    /// Record the measured position of a widget.
    pub fn set_position(&self, widget_id: &str, position: WidgetPosition) {
        self.update(StateSlice::Positions, |state| {
            if state.positions.get(widget_id) == Some(&position) {
                return false;
            }
            Rc::make_mut(&mut state.positions).insert(widget_id.to_string(), position);
            true
        });
    }

    /// Replace all widget positions.
    pub fn set_positions(&self, positions: WidgetPositions) {
        self.update(StateSlice::Positions, |state| {
            state.positions = Rc::new(positions);
            true
        });
    }

    /// Replace the evaluated entity of one widget.
    pub fn set_entity(&self, widget_name: &str, entity: Value) {
        self.update(StateSlice::DataTree, |state| {
            if state.data_tree.get(widget_name) == Some(&entity) {
                return false;
            }
            Rc::make_mut(&mut state.data_tree).insert(widget_name.to_string(), entity);
            true
        });
    }

    /// Replace the whole data tree after an evaluation pass.
    pub fn set_data_tree(&self, data_tree: DataTree) {
        self.update(StateSlice::DataTree, |state| {
            state.data_tree = Rc::new(data_tree);
            true
        });
    }

    // --- Subscriptions ---

    /// Register an observer for changes to any of the given slices.
    ///
    /// The callback receives the state after the change and the set of
    /// slices that changed.
    pub fn subscribe(
        &self,
        slices: impl Into<SliceSet>,
        callback: impl Fn(&EditorState, SliceSet) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.observers.borrow_mut().push(Observer {
            id,
            slices: slices.into(),
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|observer| observer.id != id);
        observers.len() != before
    }

    /// Run several mutations and notify observers once at the end.
    pub fn batch<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        self.batch_depth.set(self.batch_depth.get() + 1);
        let result = f(self);
        self.batch_depth.set(self.batch_depth.get() - 1);
        self.flush();
        result
    }

    fn update(&self, slice: StateSlice, f: impl FnOnce(&mut EditorState) -> bool) {
        let changed = {
            let mut state = self.state.borrow_mut();
            f(&mut *state)
        };
        if changed {
            let mut pending = self.pending.get();
            pending.insert(slice);
            self.pending.set(pending);
            self.flush();
        }
    }

    /// Deliver pending notifications unless a batch or a delivery is running.
    ///
    /// Changes made by observers while being notified are delivered in a
    /// following round; every callback sees the state as of its own call.
    fn flush(&self) {
        if self.batch_depth.get() > 0 || self.notifying.get() {
            return;
        }
        self.notifying.set(true);
        loop {
            let changed = self.pending.replace(SliceSet::EMPTY);
            if changed.is_empty() {
                break;
            }
            let targets: Vec<(SubscriptionId, Callback)> = self
                .observers
                .borrow()
                .iter()
                .filter(|observer| observer.slices.intersects(changed))
                .map(|observer| (observer.id, Rc::clone(&observer.callback)))
                .collect();
            for (id, callback) in targets {
                if !self.is_subscribed(id) {
                    continue;
                }
                let snapshot = self.snapshot();
                callback(&snapshot, changed);
            }
        }
        self.notifying.set(false);
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.observers.borrow().iter().any(|observer| observer.id == id)
    }
}

/// Overwrite a value, reporting whether it changed.
fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn ids(ids: &[&str]) -> Vec<WidgetId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn record(store: &Store, slices: impl Into<SliceSet>) -> Rc<RefCell<Vec<SliceSet>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store.subscribe(slices, move |_, changed| sink.borrow_mut().push(changed));
        log
    }

    #[test]
    fn test_observer_notified_only_for_its_slices() {
        let store = Store::new();
        let selection_log = record(&store, StateSlice::Selection);
        let drag_log = record(&store, StateSlice::DragResize);

        store.select_widget(SelectionRequestType::One, &ids(&["a"]));
        assert_eq!(selection_log.borrow().len(), 1);
        assert!(drag_log.borrow().is_empty());

        store.set_resizing(true);
        assert_eq!(selection_log.borrow().len(), 1);
        assert_eq!(drag_log.borrow().len(), 1);
    }

    #[test]
    fn test_no_notification_without_change() {
        let store = Store::new();
        let log = record(&store, SliceSet::all());

        store.focus_widget(None);
        store.set_show_widget_name(true);
        store.set_resizing(false);
        store.show_table_filter_pane(None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_batch_notifies_once() {
        let store = Store::new();
        let log = record(&store, SliceSet::all());

        store.batch(|store| {
            store.focus_widget(Some("a"));
            store.select_widget(SelectionRequestType::One, &ids(&["a"]));
            store.set_preview_mode(true);
        });

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert!(log[0].contains(StateSlice::Selection));
        assert!(log[0].contains(StateSlice::Flags));
        assert!(!log[0].contains(StateSlice::Widgets));
    }

    #[test]
    fn test_observer_sees_committed_state() {
        let store = Store::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        store.subscribe(StateSlice::Selection, move |state, _| {
            *sink.borrow_mut() = state.selection.focused().cloned();
        });

        store.focus_widget(Some("w1"));
        assert_eq!(seen.borrow().as_deref(), Some("w1"));
    }

    #[test]
    fn test_reentrant_dispatch_is_delivered() {
        let store = Store::shared(EditorState::default());
        let weak = Rc::downgrade(&store);
        store.subscribe(StateSlice::Selection, move |state, _| {
            if state.selection.focused().is_some() {
                if let Some(store) = weak.upgrade() {
                    store.set_resizing(false);
                    store.set_dragged_on(Some("canvas"));
                }
            }
        });
        let drag_log = record(&store, StateSlice::DragResize);

        store.focus_widget(Some("w1"));
        assert_eq!(drag_log.borrow().len(), 1);
        assert!(store.is_dragged_on(Some("canvas")));
    }

    #[test]
    fn test_unsubscribe() {
        let store = Store::new();
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(StateSlice::Flags, move |_, _| sink.set(sink.get() + 1));

        store.set_preview_mode(true);
        assert!(store.unsubscribe(id));
        store.set_preview_mode(false);
        assert_eq!(count.get(), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_remove_widget_clears_everything() {
        let store = Store::new();
        let widget = WidgetProps::new("Button1", "BUTTON_WIDGET").with_id("b1");
        store.upsert_widget(widget);
        store.set_position("b1", WidgetPosition::new(0.0, 0.0, 50.0, 20.0));
        store.select_widget(SelectionRequestType::One, &ids(&["b1"]));
        store.focus_widget(Some("b1"));
        let log = record(&store, SliceSet::all());

        store.remove_widget("b1");

        let state = store.state();
        assert!(state.widgets.is_empty());
        assert!(state.positions.is_empty());
        assert!(state.selection.selected().is_empty());
        assert!(state.selection.focused().is_none());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_copy_on_write_keeps_old_snapshots() {
        let store = Store::new();
        store.set_entity("Text1", json!({ "text": "a" }));
        let before = store.snapshot();

        store.set_entity("Text1", json!({ "text": "b" }));
        assert_eq!(before.data_tree["Text1"], json!({ "text": "a" }));
        assert!(!Rc::ptr_eq(&before.data_tree, &store.state().data_tree));
    }

    #[test]
    fn test_apply_config() {
        let store = Store::new();
        store.apply_config(&EditorConfig {
            show_widget_name: false,
            preview_mode: true,
            dragging_disabled: true,
        });
        let state = store.state();
        assert!(!state.flags.show_widget_name);
        assert!(state.flags.preview_mode);
        assert!(state.drag_resize.is_dragging_disabled);
    }
}
