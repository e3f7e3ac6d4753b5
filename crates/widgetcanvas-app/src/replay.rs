//! Replays a session against a scene and records what the canvas shows.

use crate::session::SessionEvent;
use kurbo::Point;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;
use widgetcanvas_core::store::DragIntent;
use widgetcanvas_core::{
    DragStartOutcome, DraggableComponent, DraggableProps, DraggableView, EditorConfig,
    InteractionEvent, NameOverlay, Scene, Store, StoreHandle, WidgetId, WidgetNameData,
    WidgetPosition,
};

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Step {step}: unknown widget {widget_id}")]
    UnknownWidget { step: usize, widget_id: WidgetId },
}

/// What the canvas shows after one step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub step: usize,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
    pub widgets: BTreeMap<WidgetId, DraggableView>,
    pub name_labels: Vec<WidgetNameData>,
}

fn outcome_label(outcome: &DragStartOutcome) -> &'static str {
    match outcome {
        DragStartOutcome::Started(_) => "started",
        DragStartOutcome::NotAllowed => "not_allowed",
        DragStartOutcome::NoBounds => "no_bounds",
        DragStartOutcome::MultiSelectModifier => "multi_select_modifier",
        DragStartOutcome::NotFocused => "not_focused",
    }
}

/// A canvas driven by scripted events.
pub struct Replay {
    store: StoreHandle,
    components: Vec<DraggableComponent>,
    overlay: Rc<RefCell<NameOverlay>>,
}

impl Replay {
    /// Set up a canvas holding `scene`, with flags taken from `config`.
    ///
    /// Widget bounds come from the scene positions, which are taken to be in
    /// client coordinates.
    pub fn new(scene: &Scene, config: &EditorConfig) -> Self {
        let store = Store::shared(scene.to_state());
        store.apply_config(config);

        let components = scene
            .widgets
            .iter()
            .map(|widget| {
                let mut component =
                    DraggableComponent::new(Rc::clone(&store), DraggableProps::from(widget));
                component.set_bounds(
                    scene
                        .positions
                        .get(&widget.widget_id)
                        .map(WidgetPosition::to_rect),
                );
                component
            })
            .collect();

        let (overlay, _) = NameOverlay::attach(&store, |frame| {
            log::debug!("Name badges changed: {} shown", frame.labels().count());
        });

        Self {
            store,
            components,
            overlay,
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    fn component(&self, step: usize, widget_id: &str) -> Result<&DraggableComponent, ReplayError> {
        self.components
            .iter()
            .find(|component| component.props().widget_id == widget_id)
            .ok_or_else(|| ReplayError::UnknownWidget {
                step,
                widget_id: widget_id.to_string(),
            })
    }

    /// Apply one event and capture the resulting frame.
    pub fn step(&mut self, step: usize, event: &SessionEvent) -> Result<Frame, ReplayError> {
        log::debug!("Step {}: {:?}", step, event);
        let mut outcome = None;
        match event {
            SessionEvent::HoverEnter { widget_id } => {
                let mut interaction = InteractionEvent::new(Point::ZERO);
                self.component(step, widget_id)?.on_hover_enter(&mut interaction);
            }
            SessionEvent::DragStart { widget_id, x, y, modifiers } => {
                let mut interaction =
                    InteractionEvent::new(Point::new(*x, *y)).with_modifiers(*modifiers);
                let component = self.component(step, widget_id)?;
                let result = component.on_drag_gesture_start(&mut interaction);
                outcome = Some(outcome_label(&result));
            }
            SessionEvent::DragEnd => self.store.set_dragging_state(DragIntent::stop()),
            SessionEvent::DragOver { parent_id } => self.store.set_dragged_on(parent_id.as_deref()),
            SessionEvent::SetResizing { value } => self.store.set_resizing(*value),
            SessionEvent::Select { mode, widget_ids } => {
                self.store.select_widget(*mode, widget_ids)
            }
            SessionEvent::Focus { widget_id } => self.store.focus_widget(widget_id.as_deref()),
            SessionEvent::SetEntity { widget_name, entity } => {
                self.store.set_entity(widget_name, entity.clone())
            }
            SessionEvent::SetPreviewMode { value } => self.store.set_preview_mode(*value),
            SessionEvent::SetShowWidgetName { value } => self.store.set_show_widget_name(*value),
            SessionEvent::ShowTableFilterPane { widget_id } => {
                self.store.show_table_filter_pane(widget_id.as_deref())
            }
            SessionEvent::RemoveWidget { widget_id } => {
                self.component(step, widget_id)?;
                self.store.remove_widget(widget_id);
                self.components.retain(|component| &component.props().widget_id != widget_id);
            }
        }
        Ok(self.frame(step, event.kind(), outcome))
    }

    /// Replay a whole session.
    pub fn run(&mut self, events: &[SessionEvent]) -> Result<Vec<Frame>, ReplayError> {
        events
            .iter()
            .enumerate()
            .map(|(step, event)| self.step(step, event))
            .collect()
    }

    fn frame(&self, step: usize, event: &'static str, outcome: Option<&'static str>) -> Frame {
        let widgets = self
            .components
            .iter()
            .map(|component| (component.props().widget_id.clone(), component.render()))
            .collect();
        let name_labels = self.overlay.borrow().frame().labels().cloned().collect();
        Frame {
            step,
            event,
            outcome,
            widgets,
            name_labels,
        }
    }
}
