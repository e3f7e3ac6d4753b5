//! The editor state tree.

use super::drag_resize::DragResizeState;
use super::selection::SelectionState;
use crate::data_tree::DataTree;
use crate::widget::{CanvasWidgets, WidgetId, WidgetPositions};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Named parts of the editor state that observers subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateSlice {
    Widgets,
    Positions,
    DataTree,
    Selection,
    DragResize,
    TableFilterPane,
    Flags,
}

impl StateSlice {
    /// Every slice.
    pub const ALL: [StateSlice; 7] = [
        StateSlice::Widgets,
        StateSlice::Positions,
        StateSlice::DataTree,
        StateSlice::Selection,
        StateSlice::DragResize,
        StateSlice::TableFilterPane,
        StateSlice::Flags,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of state slices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSet(u8);

impl SliceSet {
    pub const EMPTY: SliceSet = SliceSet(0);

    /// A set containing every slice.
    pub fn all() -> Self {
        StateSlice::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, slice: StateSlice) {
        self.0 |= slice.bit();
    }

    pub fn contains(self, slice: StateSlice) -> bool {
        self.0 & slice.bit() != 0
    }

    pub fn intersects(self, other: SliceSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<StateSlice> for SliceSet {
    fn from(slice: StateSlice) -> Self {
        SliceSet(slice.bit())
    }
}

impl<const N: usize> From<[StateSlice; N]> for SliceSet {
    fn from(slices: [StateSlice; N]) -> Self {
        slices.into_iter().collect()
    }
}

impl FromIterator<StateSlice> for SliceSet {
    fn from_iter<I: IntoIterator<Item = StateSlice>>(iter: I) -> Self {
        let mut set = SliceSet::EMPTY;
        for slice in iter {
            set.insert(slice);
        }
        set
    }
}

/// Visibility of the table filter pane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFilterPaneState {
    pub is_visible: bool,
    pub widget_id: Option<WidgetId>,
    pub last_widget_id: Option<WidgetId>,
}

impl TableFilterPaneState {
    /// Show the pane for a widget, or hide it when no widget is given.
    ///
    /// Returns true if anything changed.
    pub fn show(&mut self, widget_id: Option<&str>) -> bool {
        let next = match widget_id {
            Some(id) => TableFilterPaneState {
                is_visible: true,
                widget_id: Some(id.to_string()),
                last_widget_id: Some(id.to_string()),
            },
            None => TableFilterPaneState {
                is_visible: false,
                widget_id: None,
                last_widget_id: self.last_widget_id.clone(),
            },
        };
        if *self == next {
            return false;
        }
        *self = next;
        true
    }
}

/// Editor-wide switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorFlags {
    /// Draw the name badge of the selected or focused widget.
    pub show_widget_name: bool,
    /// The editor shows the app as end users see it; no drag affordances.
    pub preview_mode: bool,
}

impl Default for EditorFlags {
    fn default() -> Self {
        Self {
            show_widget_name: true,
            preview_mode: false,
        }
    }
}

/// The whole editor state.
///
/// Large entity maps sit behind `Rc` and are replaced copy-on-write, so a
/// clone of the state is cheap and two states can be compared slice by slice
/// through `Rc::ptr_eq`.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub widgets: Rc<CanvasWidgets>,
    pub positions: Rc<WidgetPositions>,
    pub data_tree: Rc<DataTree>,
    pub selection: SelectionState,
    pub drag_resize: DragResizeState,
    pub table_filter_pane: TableFilterPaneState,
    pub flags: EditorFlags,
}
