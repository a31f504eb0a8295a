//! Axis and orientation math for the three orthogonal views.
//!
//! Every viewport displays exactly two of the volume axes and hides the
//! third. The three fixed orientations (XY, XZ, YZ) are the only ones the
//! engine supports; the pan projection table in
//! [`ViewOrientation::shared_axis`] is derived from them.

use serde::{Deserialize, Serialize};

/// One of the three volume axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in canonical order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of this axis into `[x, y, z]` component arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Lower-case label, used in overlay layer names.
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Fixed orthogonal orientation of a viewport: which two axes it displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewOrientation {
    /// Displays X and Y, hides Z.
    Xy,
    /// Displays X and Z, hides Y.
    Xz,
    /// Displays Y and Z, hides X.
    Yz,
}

impl ViewOrientation {
    /// The two displayed axes, in display order.
    pub fn displayed(self) -> (Axis, Axis) {
        match self {
            ViewOrientation::Xy => (Axis::X, Axis::Y),
            ViewOrientation::Xz => (Axis::X, Axis::Z),
            ViewOrientation::Yz => (Axis::Y, Axis::Z),
        }
    }

    /// The axis perpendicular to the view plane.
    pub fn hidden(self) -> Axis {
        match self {
            ViewOrientation::Xy => Axis::Z,
            ViewOrientation::Xz => Axis::Y,
            ViewOrientation::Yz => Axis::X,
        }
    }

    /// Dims order handed to the viewport: hidden axis first, then the
    /// displayed pair, so stepping the leading dimension scrolls slices.
    pub fn dims_order(self) -> [Axis; 3] {
        let (a, b) = self.displayed();
        [self.hidden(), a, b]
    }

    /// Whether this orientation displays the given axis.
    pub fn displays(self, axis: Axis) -> bool {
        let (a, b) = self.displayed();
        a == axis || b == axis
    }

    /// The axis both orientations display, or `None` for identical
    /// orientations. Each distinct pair of the fixed trio shares exactly
    /// one axis; a pan delta along it in one view moves the other.
    pub fn shared_axis(self, other: ViewOrientation) -> Option<Axis> {
        if self == other {
            return None;
        }
        Axis::ALL
            .into_iter()
            .find(|&axis| self.displays(axis) && other.displays(axis))
    }

    /// Short label such as `"xy"`, used in overlay layer names.
    pub fn label(self) -> &'static str {
        match self {
            ViewOrientation::Xy => "xy",
            ViewOrientation::Xz => "xz",
            ViewOrientation::Yz => "yz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_axis_is_not_displayed() {
        for orientation in [
            ViewOrientation::Xy,
            ViewOrientation::Xz,
            ViewOrientation::Yz,
        ] {
            assert!(!orientation.displays(orientation.hidden()));
        }
    }

    #[test]
    fn test_dims_order_is_a_permutation() {
        for orientation in [
            ViewOrientation::Xy,
            ViewOrientation::Xz,
            ViewOrientation::Yz,
        ] {
            let order = orientation.dims_order();
            let mut seen = [false; 3];
            for axis in order {
                seen[axis.index()] = true;
            }
            assert_eq!(seen, [true, true, true]);
        }
    }

    #[test]
    fn test_shared_axis_table() {
        assert_eq!(
            ViewOrientation::Xy.shared_axis(ViewOrientation::Xz),
            Some(Axis::X)
        );
        assert_eq!(
            ViewOrientation::Xy.shared_axis(ViewOrientation::Yz),
            Some(Axis::Y)
        );
        assert_eq!(
            ViewOrientation::Xz.shared_axis(ViewOrientation::Yz),
            Some(Axis::Z)
        );
        assert_eq!(ViewOrientation::Xy.shared_axis(ViewOrientation::Xy), None);
    }

    #[test]
    fn test_shared_axis_is_symmetric() {
        let all = [
            ViewOrientation::Xy,
            ViewOrientation::Xz,
            ViewOrientation::Yz,
        ];
        for a in all {
            for b in all {
                assert_eq!(a.shared_axis(b), b.shared_axis(a));
            }
        }
    }
}
