//! Drag affordances for widgets on the canvas.
//!
//! Every widget is wrapped in a [`DraggableComponent`]. The wrapper does not
//! own any drag state: it derives what to show from the shared store, asks
//! the store to focus the widget on hover, and commits a drag-start intent
//! when the user starts dragging a focused widget. Moving the dragged
//! widgets is left to the drag layer that consumes that intent.

use crate::input::InteractionEvent;
use crate::selectors::{
    is_current_widget_focused, is_dragging_sibling, is_widget_selected, should_allow_drag,
};
use crate::store::{
    DragIntent, DraggingGroupCenter, EditorState, GridPoint, SelectionRequestType, SliceSet,
    StateSlice, StoreHandle, SubscriptionId,
};
use crate::widget::{WIDGET_PADDING, WidgetGeometry, WidgetId, WidgetProps};
use kurbo::{Rect, Vec2};
use peniko::Color;
use peniko::color::Rgba8;
use serde::Serialize;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Width of the dashed boundary drawn around widgets during a drag.
pub const BOUNDARY_BORDER_WIDTH: f64 = 1.0;

/// Colour of the drag boundary: the anchor colour at half opacity.
pub fn boundary_color() -> Color {
    Color::from_rgba8(0x6a, 0x86, 0xce, 0x80)
}

/// Test hook class name for a widget type, e.g. `t--draggable-tablewidget`.
pub fn draggable_class_name(widget_type: &str) -> String {
    format!("t--draggable-{}", widget_type.replace('_', "").to_lowercase())
}

/// Where inside the widget the drag was grabbed, in grid units.
///
/// `offset` is the pointer position relative to the widget's bounds, in
/// pixels. It is divided by the parent's row and column spacing, then each
/// axis is clamped to `[0, dimension - 1]` so a pointer just outside the
/// element still yields a cell inside the widget.
pub fn compute_start_points(geometry: &WidgetGeometry, offset: Vec2) -> GridPoint {
    // max/min rather than clamp: a widget narrower than one unit gives an
    // upper bound below zero.
    let top = (offset.y / geometry.parent_row_space)
        .max(0.0)
        .min(geometry.height() - 1.0);
    let left = (offset.x / geometry.parent_column_space)
        .max(0.0)
        .min(geometry.width() - 1.0);
    GridPoint::new(top, left)
}

/// Props of a draggable wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggableProps {
    pub widget_id: WidgetId,
    pub parent_id: Option<WidgetId>,
    pub widget_type: String,
    pub is_flex_child: bool,
    pub resize_disabled: bool,
    pub drag_disabled: bool,
    pub geometry: WidgetGeometry,
}

impl From<&WidgetProps> for DraggableProps {
    fn from(widget: &WidgetProps) -> Self {
        Self {
            widget_id: widget.widget_id.clone(),
            parent_id: widget.parent_id.clone(),
            widget_type: widget.widget_type.clone(),
            is_flex_child: widget.is_flex_child,
            resize_disabled: widget.resize_disabled,
            drag_disabled: widget.drag_disabled,
            geometry: widget.geometry,
        }
    }
}

/// Global state a wrapper reads on each render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraggableInputs {
    pub is_selected: bool,
    pub is_focused: bool,
    pub is_resizing: bool,
    pub is_dragging: bool,
    /// A drag is in progress over this widget's parent.
    pub is_dragging_sibling: bool,
    pub should_allow_drag: bool,
}

impl DraggableInputs {
    /// Read the inputs for one widget from the editor state.
    pub fn collect(state: &EditorState, props: &DraggableProps) -> Self {
        Self {
            is_selected: is_widget_selected(state, &props.widget_id),
            is_focused: is_current_widget_focused(state, &props.widget_id),
            is_resizing: state.drag_resize.is_resizing,
            is_dragging: state.drag_resize.is_dragging,
            is_dragging_sibling: is_dragging_sibling(state, props.parent_id.as_deref()),
            should_allow_drag: should_allow_drag(state),
        }
    }
}

/// CSS-like display of the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Block,
    None,
}

/// What a wrapper shows, derived purely from its props and inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragViewState {
    /// Any widget, this one included, is being dragged or resized.
    pub is_resizing_or_dragging: bool,
    pub is_current_widget_dragging: bool,
    pub is_current_widget_resizing: bool,
    pub show_boundary: bool,
    pub display: Display,
    pub boundary_opacity: f32,
    pub allow_drag: bool,
}

impl DragViewState {
    pub fn derive(props: &DraggableProps, inputs: &DraggableInputs) -> Self {
        let is_resizing_or_dragging = inputs.is_resizing || inputs.is_dragging;
        let is_current_widget_dragging = inputs.is_dragging && inputs.is_selected;
        let is_current_widget_resizing = inputs.is_resizing && inputs.is_selected;
        let show_boundary =
            !props.is_flex_child && (is_current_widget_dragging || inputs.is_dragging_sibling);

        // While dragging, the drag layer draws the widget instead.
        let display = if !props.is_flex_child && is_current_widget_dragging {
            Display::None
        } else {
            Display::Block
        };

        let boundary_opacity = if !is_resizing_or_dragging || is_current_widget_resizing {
            0.0
        } else {
            1.0
        };

        Self {
            is_resizing_or_dragging,
            is_current_widget_dragging,
            is_current_widget_resizing,
            show_boundary,
            display,
            boundary_opacity,
            allow_drag: !props.drag_disabled && inputs.should_allow_drag,
        }
    }
}

/// Dashed outline drawn around a widget while a drag is in progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryView {
    pub class_name: String,
    pub opacity: f32,
    /// How far the outline extends past the widget, in pixels.
    pub outset: f64,
    pub border_width: f64,
    #[serde(skip)]
    pub color: Rgba8,
}

/// Rendered output of a draggable wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableView {
    pub class_name: String,
    pub test_id: &'static str,
    pub draggable: bool,
    pub display: Display,
    pub boundary: Option<BoundaryView>,
}

impl DraggableView {
    pub fn new(props: &DraggableProps, inputs: &DraggableInputs) -> Self {
        let view = DragViewState::derive(props, inputs);
        let boundary = view.show_boundary.then(|| BoundaryView {
            class_name: format!("widget-boundary-{}", props.widget_id),
            opacity: view.boundary_opacity,
            outset: WIDGET_PADDING - 2.0,
            border_width: BOUNDARY_BORDER_WIDTH,
            color: boundary_color().to_rgba8(),
        });
        Self {
            class_name: draggable_class_name(&props.widget_type),
            test_id: if inputs.is_selected { "t--selected" } else { "" },
            draggable: view.allow_drag,
            display: view.display,
            boundary,
        }
    }
}

/// Why a drag gesture did or did not start a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragStartOutcome {
    /// The intent was committed to the store.
    Started(DragIntent),
    /// The widget or the editor does not allow dragging right now.
    NotAllowed,
    /// The wrapper has not been laid out.
    NoBounds,
    /// Ctrl or cmd was held; the gesture selects instead.
    MultiSelectModifier,
    /// Widgets must be focused before they can be dragged.
    NotFocused,
}

/// Callback that focuses a widget.
pub type FocusSetter = Rc<dyn Fn(&str)>;

/// Slices a wrapper re-renders on.
pub fn draggable_slices() -> SliceSet {
    SliceSet::from([StateSlice::Selection, StateSlice::DragResize, StateSlice::Flags])
}

/// Drag wrapper around one widget.
pub struct DraggableComponent {
    store: StoreHandle,
    /// Shared with subscriptions so they render from the current props.
    props: Rc<RefCell<DraggableProps>>,
    focus_setter: Option<FocusSetter>,
    bounds: Option<Rect>,
}

impl DraggableComponent {
    /// Create a wrapper that focuses through the store.
    pub fn new(store: StoreHandle, props: DraggableProps) -> Self {
        let focus_store = Rc::clone(&store);
        let focus_setter: FocusSetter = Rc::new(move |id: &str| focus_store.focus_widget(Some(id)));
        Self {
            store,
            props: Rc::new(RefCell::new(props)),
            focus_setter: Some(focus_setter),
            bounds: None,
        }
    }

    /// Replace the focus callback. `None` disables hover focus.
    pub fn with_focus_setter(mut self, focus_setter: Option<FocusSetter>) -> Self {
        self.focus_setter = focus_setter;
        self
    }

    pub fn props(&self) -> Ref<'_, DraggableProps> {
        self.props.borrow()
    }

    /// Replace the props. Later renders, subscribed ones included, use them.
    pub fn set_props(&mut self, props: DraggableProps) {
        *self.props.borrow_mut() = props;
    }

    /// Record the wrapper's laid-out bounds in client coordinates.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn inputs(&self) -> DraggableInputs {
        DraggableInputs::collect(&self.store.state(), &self.props.borrow())
    }

    pub fn render(&self) -> DraggableView {
        DraggableView::new(&self.props.borrow(), &self.inputs())
    }

    /// Pointer entered the wrapper: focus the widget if nothing is being
    /// dragged or resized. The event is always consumed.
    pub fn on_hover_enter(&self, event: &mut InteractionEvent) {
        let props = self.props.borrow().clone();
        let inputs = self.inputs();
        let is_resizing_or_dragging = inputs.is_resizing || inputs.is_dragging;
        let can_focus = !is_resizing_or_dragging && !inputs.is_focused && !props.resize_disabled;
        if let Some(focus_widget) = self.focus_setter.as_ref().filter(|_| can_focus) {
            focus_widget(&props.widget_id);
        }
        event.stop_propagation();
    }

    /// The platform started a drag on the wrapper.
    pub fn on_drag_gesture_start(&self, event: &mut InteractionEvent) -> DragStartOutcome {
        event.prevent_default();
        event.stop_propagation();

        let props = self.props.borrow().clone();
        let inputs = self.inputs();
        let allow_drag = !props.drag_disabled && inputs.should_allow_drag;
        if !allow_drag {
            log::debug!("Drag not allowed for widget {}", props.widget_id);
            return DragStartOutcome::NotAllowed;
        }
        let Some(bounds) = self.bounds else {
            log::debug!("Drag ignored for widget {}: no bounds", props.widget_id);
            return DragStartOutcome::NoBounds;
        };
        if event.modifiers.is_multi_select() {
            return DragStartOutcome::MultiSelectModifier;
        }
        if !inputs.is_focused {
            log::debug!("Drag ignored for widget {}: not focused", props.widget_id);
            return DragStartOutcome::NotFocused;
        }

        let start_points =
            compute_start_points(&props.geometry, event.offset_from(bounds.origin()));
        let intent = DragIntent {
            is_dragging: true,
            drag_group_actual_parent: props.parent_id.clone().unwrap_or_default(),
            dragging_group_center: DraggingGroupCenter {
                widget_id: Some(props.widget_id.clone()),
            },
            start_points,
            dragged_on: props.parent_id.clone(),
        };

        self.store.batch(|store| {
            if !inputs.is_selected {
                store.select_widget(SelectionRequestType::One, &[props.widget_id.clone()]);
            }
            store.show_table_filter_pane(None);
            store.set_dragging_state(intent.clone());
        });

        log::debug!(
            "Drag started on widget {} at {:?}",
            props.widget_id,
            start_points
        );
        DragStartOutcome::Started(intent)
    }

    /// Call `on_render` with a fresh view whenever the state it reads changes.
    pub fn subscribe(&self, on_render: impl Fn(DraggableView) + 'static) -> SubscriptionId {
        let props = Rc::clone(&self.props);
        self.store.subscribe(draggable_slices(), move |state, _| {
            let props = props.borrow();
            on_render(DraggableView::new(&props, &DraggableInputs::collect(state, &props)));
        })
    }
}

impl std::fmt::Debug for DraggableComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraggableComponent")
            .field("props", &*self.props.borrow())
            .field("has_focus_setter", &self.focus_setter.is_some())
            .field("bounds", &self.bounds)
            .finish()
    }
}
