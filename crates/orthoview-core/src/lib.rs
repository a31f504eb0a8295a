//! orthoview-core - synchronized orthogonal slice views of volumetric data
//!
//! This crate keeps three 2D viewports (XY, XZ, YZ) of one 3D dataset
//! consistent: they share a single 3D cursor, one camera zoom factor,
//! and one mirrored set of content layers. It is a pure coordination
//! engine; rendering, storage, and file I/O belong to the embedding
//! viewer, which the engine drives through the [`host::ViewerHost`]
//! contract.
//!
//! # Key components
//!
//! - **VolumeBounds / Cursor**: the shared 3D position, always clamped
//!   inside the volume
//! - **CameraSync**: one zoom factor across all viewports, pan deltas
//!   propagated along shared axes
//! - **LayerMirror**: content layer replication from the primary into
//!   the two secondary viewports
//! - **EventGate**: payload-matched echo absorption so programmatic
//!   writes never re-trigger the handlers that issued them, while user
//!   events queued alongside pending echoes still pass through
//! - **SyncSession / Orthoview**: session lifecycle, event dispatch, and
//!   the enable/disable entry point
//!
//! # Event flow
//!
//! A user event on any viewport runs exactly one synchronous cascade:
//! cursor/camera update, crosshair refresh, mirror propagation. Echoes
//! of the engine's own writes are absorbed by the gate, so cascades
//! never feed back.

pub mod axes;
pub mod bounds;
pub mod camera;
pub mod crosshair;
pub mod cursor;
pub mod error;
pub mod gate;
pub mod host;
pub mod input;
pub mod layer;
pub mod mirror;
pub mod session;

pub use axes::{Axis, ViewOrientation};
pub use bounds::VolumeBounds;
pub use camera::{CameraSync, ZOOM_EPSILON};
pub use crosshair::{crosshair_segments, line_width, overlay_name, Segment, INITIAL_LINE_WIDTH};
pub use cursor::Cursor;
pub use error::{SyncError, SyncResult};
pub use gate::{Echo, EventGate};
pub use host::{Camera, Dims, HostEvent, ViewerHost, ViewportId};
pub use input::{DragTracker, Gesture};
pub use layer::{
    Blending, Color, DataRef, ImageAttrs, Interpolation, LabelsAttrs, Layer, LayerContent,
    LayerKind, PointSymbol, PointsAttrs,
};
pub use mirror::LayerMirror;
pub use session::{Orthoview, SessionState, SyncSession, ORIENTATIONS};
