//! Shared helpers for the integration suites.

use orthoview_core::crosshair::{overlay_name, Segment};
use orthoview_core::host::{ViewerHost, ViewportId};
use orthoview_core::layer::{Layer, LayerContent};
use orthoview_core::session::{Orthoview, ORIENTATIONS};
use orthoview_memory::MemoryHost;

/// Per-axis sample counts of the test volume.
pub const EXTENTS: [u64; 3] = [100, 100, 20];

/// Host whose primary viewport holds one image and one points layer.
#[allow(dead_code)]
pub fn seeded_host() -> MemoryHost {
    let mut host = MemoryHost::with_primary(EXTENTS);
    host.seed_layer(ViewportId::Primary, Layer::image("tomogram"));
    host.seed_layer(ViewportId::Primary, Layer::points("picks"));
    host
}

/// Seeded host with an active session whose start echoes are absorbed.
#[allow(dead_code)]
pub fn active_session() -> (MemoryHost, Orthoview) {
    let mut host = seeded_host();
    let mut ortho = Orthoview::new();
    ortho.enable(&mut host).expect("session starts");
    ortho.pump(&mut host).expect("start echoes absorb cleanly");
    assert_eq!(host.pending_events(), 0);
    (host, ortho)
}

/// Layer names of a viewport with the crosshair overlay stripped.
#[allow(dead_code)]
pub fn content_names(host: &MemoryHost, viewport: ViewportId) -> Vec<String> {
    host.layer_names(viewport)
        .into_iter()
        .filter(|name| !name.starts_with("crosshair-"))
        .collect()
}

/// Geometry and width of a viewport's crosshair overlay.
#[allow(dead_code)]
pub fn guides(host: &MemoryHost, viewport: ViewportId) -> ([Segment; 2], f64) {
    let name = overlay_name(ORIENTATIONS[viewport.index()]);
    let index = host.layer_index(viewport, name).expect("overlay present");
    match host.layer(viewport, index).expect("overlay present").content {
        LayerContent::Guides { segments, width } => (segments, width),
        other => panic!("overlay is not a guides layer: {other:?}"),
    }
}
