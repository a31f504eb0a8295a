//! Cursor synchronization integration tests
//!
//! Clicks on any viewport move the one shared cursor, step every
//! viewport onto the matching slices, and redraw the crosshairs.

mod common;

use common::{active_session, guides};
use orthoview_core::host::{ViewerHost, ViewportId};

#[test]
fn test_initial_cursor_is_the_volume_midpoint() {
    let (_host, ortho) = active_session();
    let cursor = ortho.session().unwrap().cursor();
    assert_eq!(cursor.position, [49.0, 49.0, 9.0]);
}

#[test]
fn test_click_moves_the_cursor_everywhere() {
    let (mut host, mut ortho) = active_session();

    host.click(ViewportId::Primary, [75.0, 75.0, 0.0]);
    ortho.pump(&mut host).expect("click cascades cleanly");

    let cursor = ortho.session().unwrap().cursor();
    assert_eq!(cursor.position, [75.0, 75.0, 9.0]);
    for viewport in ViewportId::ALL {
        assert_eq!(host.dims(viewport).current_step, [75, 75, 9]);
    }
    assert_eq!(host.pending_events(), 0);
}

#[test]
fn test_click_on_a_secondary_keeps_its_hidden_axis() {
    let (mut host, mut ortho) = active_session();

    // SecondaryA shows the XZ plane; y stays at the midpoint.
    host.click(ViewportId::SecondaryA, [30.0, 0.0, 15.0]);
    ortho.pump(&mut host).expect("click cascades cleanly");

    let cursor = ortho.session().unwrap().cursor();
    assert_eq!(cursor.position, [30.0, 49.0, 15.0]);
    for viewport in ViewportId::ALL {
        assert_eq!(host.dims(viewport).current_step, [30, 49, 15]);
    }
}

#[test]
fn test_click_outside_the_volume_clamps() {
    let (mut host, mut ortho) = active_session();

    host.click(ViewportId::Primary, [250.0, -5.0, 0.0]);
    ortho.pump(&mut host).expect("click cascades cleanly");

    assert_eq!(ortho.session().unwrap().cursor().position, [99.0, 0.0, 9.0]);
}

#[test]
fn test_click_redraws_every_crosshair() {
    let (mut host, mut ortho) = active_session();

    host.click(ViewportId::Primary, [75.0, 75.0, 0.0]);
    ortho.pump(&mut host).expect("click cascades cleanly");

    // Primary (XY): one line at x = 75 spanning y, one at y = 75
    // spanning x, both on the z = 9 slice.
    let ([along_y, along_x], _width) = guides(&host, ViewportId::Primary);
    assert_eq!(along_y.start, [75.0, 0.0, 9.0]);
    assert_eq!(along_y.end, [75.0, 99.0, 9.0]);
    assert_eq!(along_x.start, [0.0, 75.0, 9.0]);
    assert_eq!(along_x.end, [99.0, 75.0, 9.0]);

    // SecondaryA (XZ) sits on the y = 75 slice now.
    let (segments, _width) = guides(&host, ViewportId::SecondaryA);
    for segment in segments {
        assert_eq!(segment.start[1], 75.0);
        assert_eq!(segment.end[1], 75.0);
    }
}

#[test]
fn test_drag_leaves_the_cursor_in_place() {
    let (mut host, mut ortho) = active_session();

    host.drag(ViewportId::Primary, [3.0, 0.0, 0.0]);
    ortho.pump(&mut host).expect("drag cascades cleanly");

    assert_eq!(ortho.session().unwrap().cursor().position, [49.0, 49.0, 9.0]);
    for viewport in ViewportId::ALL {
        assert_eq!(host.dims(viewport).current_step, [49, 49, 9]);
    }
}
