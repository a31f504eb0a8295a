//! The single 3D cursor shared by the three viewports.

use serde::{Deserialize, Serialize};

use crate::axes::ViewOrientation;
use crate::bounds::VolumeBounds;

/// Shared cursor position, always clamped inside the volume bounds.
///
/// Clicks write integer coordinates; programmatic updates may leave
/// fractional values, which [`Cursor::step`] rounds for slice indexing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Position in volume coordinates, `[x, y, z]`.
    pub position: [f64; 3],
}

impl Cursor {
    /// Cursor at the integer midpoint of the volume.
    pub fn at_midpoint(bounds: &VolumeBounds) -> Self {
        let mid = bounds.midpoint();
        Self {
            position: [mid[0] as f64, mid[1] as f64, mid[2] as f64],
        }
    }

    /// Programmatic update, clamped into the bounds.
    pub fn set_position(&mut self, position: [f64; 3], bounds: &VolumeBounds) {
        self.position = bounds.clamp(position);
    }

    /// Apply a click on a viewport: the two displayed axes take the
    /// clicked position, clamped and rounded to the nearest integer; the
    /// hidden axis keeps its current value.
    pub fn apply_click(
        &mut self,
        orientation: ViewOrientation,
        clicked: [f64; 3],
        bounds: &VolumeBounds,
    ) {
        let (a, b) = orientation.displayed();
        for axis in [a, b] {
            let i = axis.index();
            let max = bounds.axis_max(axis) as f64;
            self.position[i] = clicked[i].clamp(0.0, max).round();
        }
    }

    /// Slice index per axis, for pushing into viewport dims.
    pub fn step(&self) -> [u64; 3] {
        [
            self.position[0].round() as u64,
            self.position[1].round() as u64,
            self.position[2].round() as u64,
        ]
    }
}
