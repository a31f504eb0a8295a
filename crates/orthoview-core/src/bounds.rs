//! Volume extents shared by all three viewports.

use serde::{Deserialize, Serialize};

use crate::axes::Axis;

/// Per-axis inclusive extents of the volume, fixed for the session
/// lifetime. A volume with `n` samples along an axis has `axis_max = n - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBounds {
    /// Largest valid X coordinate.
    pub x_max: u64,

    /// Largest valid Y coordinate.
    pub y_max: u64,

    /// Largest valid Z coordinate.
    pub z_max: u64,
}

impl VolumeBounds {
    /// Create bounds from inclusive per-axis maxima.
    pub fn new(x_max: u64, y_max: u64, z_max: u64) -> Self {
        Self {
            x_max,
            y_max,
            z_max,
        }
    }

    /// Create bounds from per-axis sample counts, e.g. a `(100, 100, 20)`
    /// volume yields maxima `(99, 99, 19)`. Zero-length axes collapse to 0.
    pub fn from_extents(extents: [u64; 3]) -> Self {
        Self {
            x_max: extents[0].saturating_sub(1),
            y_max: extents[1].saturating_sub(1),
            z_max: extents[2].saturating_sub(1),
        }
    }

    /// Maximum coordinate along one axis.
    pub fn axis_max(&self, axis: Axis) -> u64 {
        match axis {
            Axis::X => self.x_max,
            Axis::Y => self.y_max,
            Axis::Z => self.z_max,
        }
    }

    /// Maxima as an `[x, y, z]` array.
    pub fn maxima(&self) -> [u64; 3] {
        [self.x_max, self.y_max, self.z_max]
    }

    /// Integer midpoint of the volume, the initial cursor position.
    pub fn midpoint(&self) -> [u64; 3] {
        [self.x_max / 2, self.y_max / 2, self.z_max / 2]
    }

    /// Midpoint in float coordinates, the initial camera center.
    pub fn midpoint_f64(&self) -> [f64; 3] {
        let mid = self.midpoint();
        [mid[0] as f64, mid[1] as f64, mid[2] as f64]
    }

    /// Clamp a position into `[0, axis_max]` per axis.
    pub fn clamp(&self, position: [f64; 3]) -> [f64; 3] {
        let mut clamped = position;
        for axis in Axis::ALL {
            let i = axis.index();
            clamped[i] = clamped[i].clamp(0.0, self.axis_max(axis) as f64);
        }
        clamped
    }

    /// Whether a position lies inside the bounds on every axis.
    pub fn contains(&self, position: [f64; 3]) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            let value = position[axis.index()];
            value >= 0.0 && value <= self.axis_max(axis) as f64
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extents() {
        let bounds = VolumeBounds::from_extents([100, 100, 20]);
        assert_eq!(bounds, VolumeBounds::new(99, 99, 19));
    }

    #[test]
    fn test_from_extents_zero_axis() {
        let bounds = VolumeBounds::from_extents([0, 1, 5]);
        assert_eq!(bounds, VolumeBounds::new(0, 0, 4));
    }

    #[test]
    fn test_midpoint() {
        let bounds = VolumeBounds::from_extents([100, 100, 20]);
        assert_eq!(bounds.midpoint(), [49, 49, 9]);
    }

    #[test]
    fn test_clamp() {
        let bounds = VolumeBounds::new(99, 99, 19);
        assert_eq!(bounds.clamp([150.0, -3.0, 10.0]), [99.0, 0.0, 10.0]);
        assert_eq!(bounds.clamp([50.0, 50.0, 50.0]), [50.0, 50.0, 19.0]);
    }

    #[test]
    fn test_contains() {
        let bounds = VolumeBounds::new(99, 99, 19);
        assert!(bounds.contains([0.0, 99.0, 19.0]));
        assert!(!bounds.contains([0.0, 99.0, 19.5]));
        assert!(!bounds.contains([-0.1, 0.0, 0.0]));
    }
}
