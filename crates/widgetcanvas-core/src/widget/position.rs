//! Pixel positions measured by the canvas.

use super::WidgetId;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pixel positions of all rendered widgets, keyed by id.
pub type WidgetPositions = HashMap<WidgetId, WidgetPosition>;

/// Position of a widget on the canvas, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl WidgetPosition {
    /// Create a new position.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The position as a rectangle in canvas coordinates.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }
}

impl From<Rect> for WidgetPosition {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversion() {
        let position = WidgetPosition::new(10.0, 20.0, 100.0, 40.0);
        let rect = position.to_rect();
        assert_eq!(rect, Rect::new(10.0, 20.0, 110.0, 60.0));
        assert_eq!(WidgetPosition::from(rect), position);
    }

    #[test]
    fn test_from_flipped_rect() {
        let position = WidgetPosition::from(Rect::new(110.0, 60.0, 10.0, 20.0));
        assert_eq!(position, WidgetPosition::new(10.0, 20.0, 100.0, 40.0));
    }
}
