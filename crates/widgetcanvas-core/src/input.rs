//! Pointer and drag events delivered to canvas widgets.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Check if the secondary-selection modifier (ctrl or cmd) is held.
    ///
    /// A drag gesture started with this modifier is treated as a selection
    /// gesture, never as a drag.
    pub fn is_multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// An event dispatched to a widget wrapper.
///
/// Handlers record whether they consumed the event; the host decides what
/// to do with the platform default and with ancestor handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    /// Pointer position in client (viewport) coordinates.
    pub client: Point,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl InteractionEvent {
    /// Create an event at the given client position.
    pub fn new(client: Point) -> Self {
        Self {
            client,
            modifiers: Modifiers::default(),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Set the modifier keys.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Suppress the platform's default handling.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event from reaching ancestor handlers.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Offset of the pointer from an element origin.
    pub fn offset_from(&self, origin: Point) -> Vec2 {
        self.client - origin
    }
}
