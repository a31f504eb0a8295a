//! Camera synchronization across the three viewports.
//!
//! One zoom factor is shared by all viewports; pan deltas propagate to
//! the other viewports along the axis each pair of views has in common.

use crate::axes::ViewOrientation;
use crate::gate::{Echo, EventGate};
use crate::host::{ViewerHost, ViewportId};

/// Zoom differences at or below this are float jitter from drags, not
/// user zooms, and are ignored.
pub const ZOOM_EPSILON: f64 = 1e-4;

/// Unifies zoom and propagates pan deltas between viewports.
#[derive(Clone, Debug)]
pub struct CameraSync {
    /// The zoom factor every viewport is held at.
    reference_zoom: f64,

    /// Last center seen per viewport in the event stream, the base for
    /// pan deltas. Advanced when a center event is handled or absorbed,
    /// not when the engine writes, so user pans queued ahead of pending
    /// engine writes still measure against the state they panned from.
    last_centers: [[f64; 3]; 3],
}

impl CameraSync {
    pub fn new(reference_zoom: f64, centers: [[f64; 3]; 3]) -> Self {
        Self {
            reference_zoom,
            last_centers: centers,
        }
    }

    /// The tracked shared zoom factor.
    pub fn reference_zoom(&self) -> f64 {
        self.reference_zoom
    }

    /// Record a center observed outside pan handling: session-start
    /// writes and absorbed echoes of the engine's own pan writes.
    pub fn note_center(&mut self, viewport: ViewportId, center: [f64; 3]) {
        self.last_centers[viewport.index()] = center;
    }

    /// Adopt the triggering viewport's zoom as the new reference and
    /// write it into every viewport, unless the difference is within
    /// [`ZOOM_EPSILON`]. Returns `true` when the reference changed.
    pub fn unify_zoom<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
        trigger: ViewportId,
    ) -> bool {
        let zoom = host.camera(trigger).zoom;
        if (zoom - self.reference_zoom).abs() <= ZOOM_EPSILON {
            return false;
        }
        self.reference_zoom = zoom;
        for viewport in ViewportId::ALL {
            gate.expect(viewport, Echo::Zoom(zoom));
            host.set_zoom(viewport, zoom);
        }
        true
    }

    /// Propagate a pan on `trigger` to the other two viewports: each
    /// receives the delta component of the axis it shares with the
    /// triggering view.
    pub fn propagate_pan<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
        trigger: ViewportId,
        orientations: [ViewOrientation; 3],
        new_center: [f64; 3],
    ) {
        let last = self.last_centers[trigger.index()];
        let delta = [
            new_center[0] - last[0],
            new_center[1] - last[1],
            new_center[2] - last[2],
        ];
        self.last_centers[trigger.index()] = new_center;

        for viewport in ViewportId::ALL {
            if viewport == trigger {
                continue;
            }
            let Some(axis) = orientations[trigger.index()].shared_axis(orientations[viewport.index()])
            else {
                continue;
            };
            let component = delta[axis.index()];
            if component == 0.0 {
                continue;
            }
            let mut center = host.camera(viewport).center;
            center[axis.index()] += component;
            gate.expect(viewport, Echo::Center(center));
            host.set_center(viewport, center);
            // The target's baseline advances when its echo is absorbed.
        }
    }
}
