//! Crosshair overlay geometry.
//!
//! Each viewport carries one overlay layer with two axis-aligned guide
//! lines through the shared cursor. The geometry is fully derived from
//! cursor, bounds, and the viewport's orientation; it is never mutated
//! directly by the user.

use serde::{Deserialize, Serialize};

use crate::axes::ViewOrientation;
use crate::bounds::VolumeBounds;
use crate::cursor::Cursor;

/// Width of the guide lines in world units at zoom factor 1.0. Too small
/// a value makes the lines vanish at low zoom.
pub const INITIAL_LINE_WIDTH: f64 = 2.3;

/// A straight guide segment in volume coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: [f64; 3],
    pub end: [f64; 3],
}

impl Segment {
    pub fn new(start: [f64; 3], end: [f64; 3]) -> Self {
        Self { start, end }
    }
}

/// The two guide lines for a viewport: one fixed at the cursor's first
/// displayed coordinate spanning the second displayed axis, and one the
/// other way round. Both lines sit at the cursor's hidden-axis coordinate
/// so they land on the currently displayed slice.
pub fn crosshair_segments(
    cursor: &Cursor,
    bounds: &VolumeBounds,
    orientation: ViewOrientation,
) -> [Segment; 2] {
    let (a, b) = orientation.displayed();
    let h = orientation.hidden();

    let mut along_b_start = [0.0; 3];
    along_b_start[a.index()] = cursor.position[a.index()];
    along_b_start[h.index()] = cursor.position[h.index()];
    let mut along_b_end = along_b_start;
    along_b_end[b.index()] = bounds.axis_max(b) as f64;

    let mut along_a_start = [0.0; 3];
    along_a_start[b.index()] = cursor.position[b.index()];
    along_a_start[h.index()] = cursor.position[h.index()];
    let mut along_a_end = along_a_start;
    along_a_end[a.index()] = bounds.axis_max(a) as f64;

    [
        Segment::new(along_b_start, along_b_end),
        Segment::new(along_a_start, along_a_end),
    ]
}

/// Guide line width for the current zoom, keeping the apparent screen
/// thickness constant.
pub fn line_width(zoom: f64) -> f64 {
    INITIAL_LINE_WIDTH / zoom
}

/// Overlay layer name for a viewport orientation. One name per viewport,
/// never shared between viewports and never mirrored.
pub fn overlay_name(orientation: ViewOrientation) -> &'static str {
    match orientation {
        ViewOrientation::Xy => "crosshair-xy",
        ViewOrientation::Xz => "crosshair-xz",
        ViewOrientation::Yz => "crosshair-yz",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xy_segments_span_full_plane() {
        let bounds = VolumeBounds::from_extents([100, 100, 20]);
        let cursor = Cursor::at_midpoint(&bounds);
        let [along_y, along_x] = crosshair_segments(&cursor, &bounds, ViewOrientation::Xy);

        // Vertical line: x fixed at 49, y spans 0..=99, z on the slice.
        assert_eq!(along_y.start, [49.0, 0.0, 9.0]);
        assert_eq!(along_y.end, [49.0, 99.0, 9.0]);

        // Horizontal line: y fixed at 49, x spans 0..=99.
        assert_eq!(along_x.start, [0.0, 49.0, 9.0]);
        assert_eq!(along_x.end, [99.0, 49.0, 9.0]);
    }

    #[test]
    fn test_segments_sit_on_hidden_slice() {
        let bounds = VolumeBounds::from_extents([100, 100, 20]);
        let cursor = Cursor {
            position: [10.0, 20.0, 5.0],
        };
        for orientation in [
            ViewOrientation::Xy,
            ViewOrientation::Xz,
            ViewOrientation::Yz,
        ] {
            let h = orientation.hidden().index();
            for segment in crosshair_segments(&cursor, &bounds, orientation) {
                assert_eq!(segment.start[h], cursor.position[h]);
                assert_eq!(segment.end[h], cursor.position[h]);
            }
        }
    }

    #[test]
    fn test_line_width_scales_inversely_with_zoom() {
        assert_eq!(line_width(1.0), INITIAL_LINE_WIDTH);
        assert!((line_width(2.0) - INITIAL_LINE_WIDTH / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlay_names_are_distinct() {
        let names = [
            overlay_name(ViewOrientation::Xy),
            overlay_name(ViewOrientation::Xz),
            overlay_name(ViewOrientation::Yz),
        ];
        assert_ne!(names[0], names[1]);
        assert_ne!(names[0], names[2]);
        assert_ne!(names[1], names[2]);
    }
}
