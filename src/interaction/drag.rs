//! Drag gestures. Each gesture is a short-lived value created on press,
//! fed pointer moves, and consumed on release or abort.

use crate::layout::MIN_COLUMN_WIDTH;
use crate::state::ResizeTarget;

/// Pointer travel below which a header press counts as a click.
pub const REORDER_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGesture {
    pub target: ResizeTarget,
    pub start_x: f64,
    pub start_width: f64,
}

impl ResizeGesture {
    pub fn new(target: ResizeTarget, start_x: f64, start_width: f64) -> Self {
        Self {
            target,
            start_x,
            start_width,
        }
    }

    /// Width for the current pointer x, never below the minimum.
    pub fn width_at(&self, x: f64) -> f64 {
        (self.start_width + (x - self.start_x)).max(MIN_COLUMN_WIDTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReorderGesture {
    /// Visual index of the pressed header
    pub index: usize,
    pub start_x: f64,
    /// Set once the pointer has travelled past the threshold
    pub dragging: bool,
}

impl ReorderGesture {
    pub fn new(index: usize, start_x: f64) -> Self {
        Self {
            index,
            start_x,
            dragging: false,
        }
    }

    /// Track a move; returns whether the gesture is now a drag.
    pub fn track(&mut self, x: f64) -> bool {
        if !self.dragging && (x - self.start_x).abs() > REORDER_THRESHOLD {
            self.dragging = true;
        }
        self.dragging
    }
}

/// The single gesture that may be active at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Resize(ResizeGesture),
    Reorder(ReorderGesture),
    /// Live drag-select from a cell press
    Select,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_clamps_to_minimum() {
        let gesture = ResizeGesture::new(ResizeTarget::Column(0), 200.0, 100.0);
        assert_eq!(gesture.width_at(250.0), 150.0);
        assert_eq!(gesture.width_at(100.0), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_reorder_threshold() {
        let mut gesture = ReorderGesture::new(1, 100.0);
        assert!(!gesture.track(102.0));
        assert!(!gesture.track(97.0));
        assert!(gesture.track(104.0));
        // Once dragging, coming back doesn't revert to a click.
        assert!(gesture.track(100.0));
    }
}
