//! WidgetCanvas Core Library
//!
//! Editor state and interaction logic for a widget canvas: drag affordances
//! around each widget and the name badges of the selected and focused widgets.

pub mod config;
pub mod data_tree;
pub mod draggable;
pub mod input;
pub mod scene;
pub mod selectors;
pub mod store;
pub mod widget;
pub mod widget_name;

pub use config::{ConfigError, EditorConfig};
pub use data_tree::{DataTree, EVAL_ERROR_PATH, get_error_count};
pub use draggable::{
    DragStartOutcome, DragViewState, DraggableComponent, DraggableInputs, DraggableProps,
    DraggableView, compute_start_points,
};
pub use input::{InteractionEvent, Modifiers};
pub use scene::{Scene, SceneError};
pub use selectors::Selector;
pub use store::{
    DragIntent, EditorState, SelectionRequestType, SliceSet, StateSlice, Store, StoreHandle,
    SubscriptionId,
};
pub use widget::{
    MAIN_CONTAINER_WIDGET_ID, WIDGET_PADDING, WidgetGeometry, WidgetId, WidgetPosition,
    WidgetProps,
};
pub use widget_name::{NameOverlay, NameOverlayFrame, WidgetNameData, WidgetNameState};
