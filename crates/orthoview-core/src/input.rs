//! Pointer gesture classification.
//!
//! A pointer-down/move/up sequence is a drag if any movement occurred
//! between down and up, otherwise a click. Clicks move the shared cursor;
//! drags pan the camera, which the engine observes through center-change
//! events rather than through the pointer stream.

use serde::{Deserialize, Serialize};

use crate::host::ViewportId;

/// Outcome of a completed pointer gesture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// Press and release without movement.
    Click {
        viewport: ViewportId,
        position: [f64; 3],
    },

    /// Press with movement before release.
    Drag { viewport: ViewportId },
}

/// Tracks the pointer sequence on whichever viewport holds the button.
#[derive(Debug, Default)]
pub struct DragTracker {
    active: Option<Press>,
}

#[derive(Debug)]
struct Press {
    viewport: ViewportId,
    moved: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A button went down on a viewport.
    pub fn on_pressed(&mut self, viewport: ViewportId) {
        self.active = Some(Press {
            viewport,
            moved: false,
        });
    }

    /// The pointer moved while the button was down.
    pub fn on_moved(&mut self, viewport: ViewportId) {
        if let Some(press) = self.active.as_mut() {
            if press.viewport == viewport {
                press.moved = true;
            }
        }
    }

    /// The button was released; classifies the completed gesture.
    /// Releases without a matching press are ignored.
    pub fn on_released(&mut self, viewport: ViewportId, position: [f64; 3]) -> Option<Gesture> {
        let press = self.active.take()?;
        if press.viewport != viewport {
            return None;
        }
        if press.moved {
            Some(Gesture::Drag { viewport })
        } else {
            Some(Gesture::Click { viewport, position })
        }
    }

    /// Abandon any in-flight press (session teardown).
    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_is_a_click() {
        let mut tracker = DragTracker::new();
        tracker.on_pressed(ViewportId::Primary);
        let gesture = tracker.on_released(ViewportId::Primary, [1.0, 2.0, 3.0]);
        assert_eq!(
            gesture,
            Some(Gesture::Click {
                viewport: ViewportId::Primary,
                position: [1.0, 2.0, 3.0],
            })
        );
    }

    #[test]
    fn test_any_movement_makes_a_drag() {
        let mut tracker = DragTracker::new();
        tracker.on_pressed(ViewportId::SecondaryA);
        tracker.on_moved(ViewportId::SecondaryA);
        let gesture = tracker.on_released(ViewportId::SecondaryA, [0.0, 0.0, 0.0]);
        assert_eq!(
            gesture,
            Some(Gesture::Drag {
                viewport: ViewportId::SecondaryA,
            })
        );
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut tracker = DragTracker::new();
        assert_eq!(tracker.on_released(ViewportId::Primary, [0.0; 3]), None);
    }

    #[test]
    fn test_movement_on_other_viewport_does_not_count() {
        let mut tracker = DragTracker::new();
        tracker.on_pressed(ViewportId::Primary);
        tracker.on_moved(ViewportId::SecondaryB);
        let gesture = tracker.on_released(ViewportId::Primary, [5.0, 5.0, 5.0]);
        assert!(matches!(gesture, Some(Gesture::Click { .. })));
    }

    #[test]
    fn test_reset_abandons_press() {
        let mut tracker = DragTracker::new();
        tracker.on_pressed(ViewportId::Primary);
        tracker.reset();
        assert_eq!(tracker.on_released(ViewportId::Primary, [0.0; 3]), None);
    }
}
