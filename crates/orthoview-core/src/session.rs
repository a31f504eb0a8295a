//! Session lifecycle and event dispatch.
//!
//! A [`SyncSession`] owns everything one synchronization episode needs:
//! bounds, cursor, camera sync state, the mirror table, the event gate,
//! and the pre-session snapshot of the primary viewport. The
//! [`Orthoview`] controller owns at most one session and is the entry
//! point an embedding wires host events into.
//!
//! All handlers run on the host's event thread; each user event runs one
//! synchronous cascade to completion before the next is processed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::axes::ViewOrientation;
use crate::bounds::VolumeBounds;
use crate::camera::CameraSync;
use crate::crosshair::{crosshair_segments, line_width, overlay_name};
use crate::cursor::Cursor;
use crate::error::{SyncError, SyncResult};
use crate::gate::{Echo, EventGate};
use crate::host::{Dims, HostEvent, ViewerHost, ViewportId};
use crate::input::{DragTracker, Gesture};
use crate::layer::{Layer, LayerContent};
use crate::mirror::LayerMirror;

/// Lifecycle states of a synchronization session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Inactive,
    Starting,
    Active,
    Stopping,
}

/// Orientation of each viewport, indexed by [`ViewportId::index`].
pub const ORIENTATIONS: [ViewOrientation; 3] = [
    ViewOrientation::Xy,
    ViewOrientation::Xz,
    ViewOrientation::Yz,
];

/// Snapshot of the primary viewport taken at session start and reapplied
/// at stop, so disabling leaves the viewer exactly as it was found.
#[derive(Clone, Debug)]
struct PrimarySnapshot {
    layer_order: Vec<String>,
    visibility: Vec<(String, bool)>,
    selection: BTreeSet<String>,
}

impl PrimarySnapshot {
    fn capture<H: ViewerHost>(host: &H) -> Self {
        let layer_order = host.layer_names(ViewportId::Primary);
        let visibility = layer_order
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                host.layer(ViewportId::Primary, index)
                    .map(|layer| (name.clone(), layer.content.visible()))
            })
            .collect();
        Self {
            layer_order,
            visibility,
            selection: host.selection(ViewportId::Primary),
        }
    }

    /// Reapply order, visibility, and selection to the primary. Layers
    /// the user removed during the session are skipped.
    fn restore<H: ViewerHost>(&self, host: &mut H) {
        for (target_index, name) in self.layer_order.iter().enumerate() {
            if let Some(current) = host.layer_index(ViewportId::Primary, name) {
                let last = host.layer_count(ViewportId::Primary).saturating_sub(1);
                let target = target_index.min(last);
                if current != target {
                    host.move_layer(ViewportId::Primary, current, target);
                }
            }
        }
        for (name, visible) in &self.visibility {
            if let Some(index) = host.layer_index(ViewportId::Primary, name) {
                if let Some(layer) = host.layer(ViewportId::Primary, index) {
                    if layer.content.visible() != *visible {
                        let mut content = layer.content;
                        content.set_visible(*visible);
                        host.set_layer_content(ViewportId::Primary, index, content);
                    }
                }
            }
        }
        host.set_selection(ViewportId::Primary, self.selection.clone());
    }
}

/// One active synchronization episode across the three viewports.
#[derive(Debug)]
pub struct SyncSession {
    id: Uuid,
    state: SessionState,
    bounds: VolumeBounds,
    cursor: Cursor,
    camera: CameraSync,
    mirror: LayerMirror,
    gate: EventGate,
    tracker: DragTracker,
    snapshot: PrimarySnapshot,
}

impl SyncSession {
    /// Validate the primary viewport and bring all three viewports up.
    ///
    /// Fails with [`SyncError::NoLayers`] when the primary is empty and
    /// [`SyncError::IncompatibleLayer`] when any layer is not a
    /// 3-dimensional image, points, or labels layer; in both cases
    /// nothing has been mutated and the state reverts to inactive.
    pub fn start<H: ViewerHost>(host: &mut H) -> SyncResult<Self> {
        let count = host.layer_count(ViewportId::Primary);
        if count == 0 {
            return Err(SyncError::NoLayers);
        }
        for index in 0..count {
            let layer = host
                .layer(ViewportId::Primary, index)
                .ok_or(SyncError::MirrorNotFound {
                    name: format!("layer@{index}"),
                    viewport: ViewportId::Primary,
                })?;
            if !layer.content.is_mirrorable() {
                return Err(SyncError::incompatible(
                    layer.name,
                    "unsupported kind, only images, points and labels mirror",
                ));
            }
            if layer.content.ndim() != 3 {
                return Err(SyncError::incompatible(
                    layer.name,
                    format!("data is {}-dimensional", layer.content.ndim()),
                ));
            }
        }

        // Events queued before the session existed belong to a world the
        // listeners never saw.
        while host.poll_event().is_some() {}

        let snapshot = PrimarySnapshot::capture(host);
        let primary_dims = host.dims(ViewportId::Primary);
        let bounds = VolumeBounds::from_extents(primary_dims.range);
        let cursor = Cursor::at_midpoint(&bounds);
        let reference_zoom = host.camera(ViewportId::Primary).zoom;
        let mut gate = EventGate::new();

        let mut session = Self {
            id: Uuid::new_v4(),
            state: SessionState::Starting,
            bounds,
            cursor,
            camera: CameraSync::new(reference_zoom, [[0.0; 3]; 3]),
            mirror: LayerMirror::new([
                overlay_name(ORIENTATIONS[0]),
                overlay_name(ORIENTATIONS[1]),
                overlay_name(ORIENTATIONS[2]),
            ]),
            gate: EventGate::new(),
            tracker: DragTracker::new(),
            snapshot,
        };

        // Primary shows the XY plane; secondaries open on XZ and YZ.
        host.set_dims(
            ViewportId::Primary,
            Dims {
                order: ORIENTATIONS[0],
                current_step: cursor.step(),
                range: primary_dims.range,
            },
        );
        for secondary in ViewportId::SECONDARY {
            let mut dims = Dims::new(ORIENTATIONS[secondary.index()], primary_dims.range);
            dims.current_step = cursor.step();
            host.open_viewport(secondary, dims);
        }

        if let Err(err) = session.mirror.initialize(host, &mut gate) {
            // Roll the half-started session back before surfacing.
            for secondary in ViewportId::SECONDARY {
                if host.is_open(secondary) {
                    host.close_viewport(secondary);
                }
            }
            while host.poll_event().is_some() {}
            return Err(err);
        }

        // One overlay per viewport, pinned last.
        for viewport in ViewportId::ALL {
            let orientation = ORIENTATIONS[viewport.index()];
            let layer = Layer::new(
                overlay_name(orientation),
                LayerContent::Guides {
                    segments: crosshair_segments(&cursor, &bounds, orientation),
                    width: line_width(reference_zoom),
                },
            );
            let index = host.layer_count(viewport);
            gate.expect(viewport, Echo::LayerInserted(index));
            host.insert_layer(viewport, index, layer);
        }

        // Unify the cameras on the primary's zoom, centered on the
        // volume midpoint, all stepping the cursor slice.
        let midpoint = bounds.midpoint_f64();
        for viewport in ViewportId::ALL {
            gate.expect(viewport, Echo::Zoom(reference_zoom));
            host.set_zoom(viewport, reference_zoom);
            gate.expect(viewport, Echo::Center(midpoint));
            host.set_center(viewport, midpoint);
            host.set_current_step(viewport, cursor.step());
            session.camera.note_center(viewport, midpoint);
        }

        session.gate = gate;
        session.mirror.mirror_selection(host, &mut session.gate)?;
        session.state = SessionState::Active;
        info!(session = %session.id, ?bounds, "orthoview session started");
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bounds(&self) -> VolumeBounds {
        self.bounds
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The shared zoom factor all viewports are held at.
    pub fn zoom(&self) -> f64 {
        self.camera.reference_zoom()
    }

    /// Content layer names tracked by the mirror, in stacking order.
    pub fn content_layers(&self) -> &[String] {
        self.mirror.names()
    }

    /// Drain the host queue, dispatching every pending event.
    ///
    /// Recoverable errors are remembered and surfaced after the drain so
    /// gated echoes of an undo are still absorbed; a fatal error aborts
    /// immediately and the caller must tear the session down.
    pub fn pump<H: ViewerHost>(&mut self, host: &mut H) -> SyncResult<()> {
        let mut first_error = None;
        while let Some(event) = host.poll_event() {
            match self.dispatch(host, event) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Handle one host event, running the full cascade it implies.
    pub fn dispatch<H: ViewerHost>(&mut self, host: &mut H, event: HostEvent) -> SyncResult<()> {
        if self.state != SessionState::Active {
            return Ok(());
        }
        if let Some(echo) = event.echo() {
            if self.gate.absorb(event.viewport(), &echo) {
                // Echoed center writes advance the pan baseline.
                if let HostEvent::CenterChanged { viewport, center } = event {
                    self.camera.note_center(viewport, center);
                }
                return Ok(());
            }
        }

        match event {
            HostEvent::ZoomChanged { viewport, .. } => {
                if self.camera.unify_zoom(host, &mut self.gate, viewport) {
                    debug!(zoom = self.camera.reference_zoom(), "zoom unified");
                    self.refresh_overlays(host)?;
                }
                Ok(())
            }

            HostEvent::CenterChanged { viewport, center } => {
                self.camera
                    .propagate_pan(host, &mut self.gate, viewport, ORIENTATIONS, center);
                Ok(())
            }

            HostEvent::PointerPressed { viewport, .. } => {
                self.tracker.on_pressed(viewport);
                Ok(())
            }

            HostEvent::PointerMoved { viewport, .. } => {
                self.tracker.on_moved(viewport);
                Ok(())
            }

            HostEvent::PointerReleased { viewport, position } => {
                match self.tracker.on_released(viewport, position) {
                    Some(Gesture::Click { viewport, position }) => {
                        self.apply_click(host, viewport, position)
                    }
                    // Drags arrive as center changes; nothing to do here.
                    Some(Gesture::Drag { .. }) | None => Ok(()),
                }
            }

            HostEvent::LayerInserted { viewport, index } => {
                if !viewport.is_primary() {
                    warn!(?viewport, index, "ignoring layer insert on a secondary");
                    return Ok(());
                }
                self.mirror.on_inserted(host, &mut self.gate, index)?;
                self.assert_overlays_on_top(host)
            }

            HostEvent::LayerRemoved {
                viewport,
                index,
                layer,
            } => {
                if !viewport.is_primary() {
                    warn!(?viewport, index, "ignoring layer removal on a secondary");
                    return Ok(());
                }
                if self.mirror.is_overlay_name(&layer.name) {
                    // The overlay is gone; the session cannot continue.
                    return Err(SyncError::MirrorNotFound {
                        name: layer.name,
                        viewport,
                    });
                }
                self.mirror.on_removed(host, &mut self.gate, &layer.name)
            }

            HostEvent::LayersReordered { viewport } => {
                if !viewport.is_primary() {
                    warn!(?viewport, "ignoring reorder on a secondary");
                    return Ok(());
                }
                self.assert_overlays_on_top(host)?;
                self.mirror.on_reordered(host, &mut self.gate)
            }

            HostEvent::SelectionChanged { viewport } => {
                if !viewport.is_primary() {
                    debug!(?viewport, "ignoring selection change on a secondary");
                    return Ok(());
                }
                self.mirror.mirror_selection(host, &mut self.gate)
            }

            HostEvent::LayerRenamed {
                viewport,
                index,
                old_name,
                new_name,
            } => {
                if old_name == self.mirror.overlay_name(viewport) {
                    // Overlays reject renames; put the name back.
                    warn!(?viewport, %new_name, "reverting crosshair overlay rename");
                    self.gate.expect(viewport, Echo::LayerRenamed(old_name.clone()));
                    host.rename_layer(viewport, index, &old_name);
                    return Ok(());
                }
                if !viewport.is_primary() {
                    warn!(?viewport, %old_name, "ignoring rename on a secondary");
                    return Ok(());
                }
                self.mirror
                    .on_renamed(host, &mut self.gate, index, &new_name)
            }

            HostEvent::LayerUpdated { viewport, index } => {
                if !viewport.is_primary() {
                    debug!(?viewport, index, "ignoring layer update on a secondary");
                    return Ok(());
                }
                if index >= self.mirror.content_len() {
                    // Attribute edits on the overlay itself are not mirrored.
                    return Ok(());
                }
                self.mirror.on_updated(host, &mut self.gate, index)
            }
        }
    }

    /// Explicit disable: tear everything down and restore the primary.
    pub fn stop<H: ViewerHost>(mut self, host: &mut H) -> SyncResult<()> {
        self.state = SessionState::Stopping;
        self.teardown(host);
        info!(session = %self.id, "orthoview session stopped");
        Ok(())
    }

    /// Teardown after an invariant violation; never fails.
    pub fn force_stop<H: ViewerHost>(mut self, host: &mut H) {
        self.state = SessionState::Stopping;
        self.teardown(host);
        warn!(session = %self.id, "orthoview session torn down after invariant violation");
    }

    fn teardown<H: ViewerHost>(&mut self, host: &mut H) {
        let primary_overlay = self.mirror.overlay_name(ViewportId::Primary);
        if let Some(index) = host.layer_index(ViewportId::Primary, primary_overlay) {
            host.remove_layer(ViewportId::Primary, index);
        }
        for secondary in ViewportId::SECONDARY {
            if host.is_open(secondary) {
                host.close_viewport(secondary);
            }
        }
        self.snapshot.restore(host);
        self.tracker.reset();
        self.gate.clear();
        // The teardown writes queued their own echoes; nobody is
        // listening any more, so leave the queue empty.
        while host.poll_event().is_some() {}
        self.state = SessionState::Inactive;
    }

    /// Move the shared cursor from a click and push it everywhere.
    fn apply_click<H: ViewerHost>(
        &mut self,
        host: &mut H,
        viewport: ViewportId,
        position: [f64; 3],
    ) -> SyncResult<()> {
        self.cursor
            .apply_click(ORIENTATIONS[viewport.index()], position, &self.bounds);
        debug!(?viewport, cursor = ?self.cursor.position, "cursor moved");
        for target in ViewportId::ALL {
            host.set_current_step(target, self.cursor.step());
        }
        self.refresh_overlays(host)
    }

    /// Rewrite every overlay's geometry and width from the current
    /// cursor and zoom.
    fn refresh_overlays<H: ViewerHost>(&mut self, host: &mut H) -> SyncResult<()> {
        let width = line_width(self.camera.reference_zoom());
        for viewport in ViewportId::ALL {
            let orientation = ORIENTATIONS[viewport.index()];
            let name = overlay_name(orientation);
            let index =
                host.layer_index(viewport, name)
                    .ok_or_else(|| SyncError::MirrorNotFound {
                        name: name.to_string(),
                        viewport,
                    })?;
            self.gate.expect(viewport, Echo::LayerUpdated(index));
            host.set_layer_content(
                viewport,
                index,
                LayerContent::Guides {
                    segments: crosshair_segments(&self.cursor, &self.bounds, orientation),
                    width,
                },
            );
        }
        Ok(())
    }

    /// Re-assert the overlay-on-top invariant in every viewport.
    fn assert_overlays_on_top<H: ViewerHost>(&mut self, host: &mut H) -> SyncResult<()> {
        for viewport in ViewportId::ALL {
            let name = self.mirror.overlay_name(viewport);
            let index =
                host.layer_index(viewport, name)
                    .ok_or_else(|| SyncError::MirrorNotFound {
                        name: name.to_string(),
                        viewport,
                    })?;
            let last = host.layer_count(viewport) - 1;
            if index != last {
                self.gate.expect(viewport, Echo::LayersReordered);
                host.move_layer(viewport, index, last);
            }
        }
        Ok(())
    }
}

/// Entry point owning at most one synchronization session.
///
/// Mirrors the enable/disable toggle of the surrounding widget: `enable`
/// starts a session, `disable` stops it, and `pump` feeds pending host
/// events through the active session, tearing it down on a fatal error.
#[derive(Debug, Default)]
pub struct Orthoview {
    session: Option<SyncSession>,
}

impl Orthoview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is currently active.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&SyncSession> {
        self.session.as_ref()
    }

    /// Start a session on the host's primary viewport.
    pub fn enable<H: ViewerHost>(&mut self, host: &mut H) -> SyncResult<()> {
        if self.session.is_some() {
            return Err(SyncError::session_state(
                "a session is already active on this viewport",
            ));
        }
        self.session = Some(SyncSession::start(host)?);
        Ok(())
    }

    /// Stop the active session, restoring the primary viewport.
    pub fn disable<H: ViewerHost>(&mut self, host: &mut H) -> SyncResult<()> {
        match self.session.take() {
            Some(session) => session.stop(host),
            None => Err(SyncError::session_state("no active session to disable")),
        }
    }

    /// Feed pending host events through the active session. A fatal
    /// error tears the session down before it is surfaced.
    pub fn pump<H: ViewerHost>(&mut self, host: &mut H) -> SyncResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let result = session.pump(host);
        if let Err(err) = &result {
            if err.is_fatal() {
                error!(%err, "invariant violation, tearing the session down");
                if let Some(session) = self.session.take() {
                    session.force_stop(host);
                }
            }
        }
        result
    }
}
