//! The viewer-host contract.
//!
//! The engine never renders pixels or touches files; it drives an
//! external viewer through this trait and observes the viewer's event
//! queue. Any host that satisfies the echo discipline below can be
//! synchronized:
//!
//! - every mutating operation that has an event kind enqueues exactly one
//!   matching event, whether the write came from the user or the engine;
//! - dims writes ([`ViewerHost::set_dims`], [`ViewerHost::set_current_step`])
//!   enqueue nothing;
//! - events are delivered in the order the mutations happened;
//! - layer names stay unique within a viewport: hosts uniquify colliding
//!   inserts and renames, and the enqueued event carries the name that
//!   was actually assigned.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::axes::ViewOrientation;
use crate::gate::Echo;
use crate::layer::{Layer, LayerContent};

/// Identity of one of the three synchronized viewports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportId {
    /// The view the session was started from.
    Primary,
    /// First auxiliary view (XZ).
    SecondaryA,
    /// Second auxiliary view (YZ).
    SecondaryB,
}

impl ViewportId {
    /// All viewports, primary first.
    pub const ALL: [ViewportId; 3] = [
        ViewportId::Primary,
        ViewportId::SecondaryA,
        ViewportId::SecondaryB,
    ];

    /// The two secondary viewports.
    pub const SECONDARY: [ViewportId; 2] = [ViewportId::SecondaryA, ViewportId::SecondaryB];

    /// Index into per-viewport arrays.
    pub fn index(self) -> usize {
        match self {
            ViewportId::Primary => 0,
            ViewportId::SecondaryA => 1,
            ViewportId::SecondaryB => 2,
        }
    }

    pub fn is_primary(self) -> bool {
        self == ViewportId::Primary
    }
}

/// Camera state of one viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Center of the view in volume coordinates.
    pub center: [f64; 3],

    /// Zoom factor; larger is closer.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            zoom: 1.0,
        }
    }
}

/// Dimension state of one viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dims {
    /// Which two axes the viewport displays.
    pub order: ViewOrientation,

    /// Current slice index per axis, `[x, y, z]`.
    pub current_step: [u64; 3],

    /// Number of samples per axis, `[x, y, z]`.
    pub range: [u64; 3],
}

impl Dims {
    /// Dims for a freshly opened viewport, stepping the volume midpoint.
    pub fn new(order: ViewOrientation, range: [u64; 3]) -> Self {
        Self {
            order,
            current_step: [
                range[0].saturating_sub(1) / 2,
                range[1].saturating_sub(1) / 2,
                range[2].saturating_sub(1) / 2,
            ],
            range,
        }
    }
}

/// An event emitted by the viewer host.
///
/// Layer indices refer to the viewport's full layer list at the time the
/// event was enqueued, overlay included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum HostEvent {
    /// A viewport's zoom factor changed.
    ZoomChanged { viewport: ViewportId, zoom: f64 },

    /// A viewport's camera center changed.
    CenterChanged {
        viewport: ViewportId,
        center: [f64; 3],
    },

    /// A layer was inserted at `index`.
    LayerInserted { viewport: ViewportId, index: usize },

    /// The layer previously at `index` was removed.
    LayerRemoved {
        viewport: ViewportId,
        index: usize,
        layer: Layer,
    },

    /// The viewport's layer order changed.
    LayersReordered { viewport: ViewportId },

    /// The viewport's layer selection changed.
    SelectionChanged { viewport: ViewportId },

    /// The layer at `index` was renamed.
    LayerRenamed {
        viewport: ViewportId,
        index: usize,
        old_name: String,
        new_name: String,
    },

    /// Attributes or data of the layer at `index` changed.
    LayerUpdated { viewport: ViewportId, index: usize },

    /// A pointer button went down at a volume-space position.
    PointerPressed {
        viewport: ViewportId,
        position: [f64; 3],
    },

    /// The pointer moved while a button was down.
    PointerMoved {
        viewport: ViewportId,
        position: [f64; 3],
    },

    /// The pointer button was released.
    PointerReleased {
        viewport: ViewportId,
        position: [f64; 3],
    },
}

impl HostEvent {
    /// Viewport the event originated from.
    pub fn viewport(&self) -> ViewportId {
        match self {
            HostEvent::ZoomChanged { viewport, .. }
            | HostEvent::CenterChanged { viewport, .. }
            | HostEvent::LayerInserted { viewport, .. }
            | HostEvent::LayerRemoved { viewport, .. }
            | HostEvent::LayersReordered { viewport }
            | HostEvent::SelectionChanged { viewport }
            | HostEvent::LayerRenamed { viewport, .. }
            | HostEvent::LayerUpdated { viewport, .. }
            | HostEvent::PointerPressed { viewport, .. }
            | HostEvent::PointerMoved { viewport, .. }
            | HostEvent::PointerReleased { viewport, .. } => *viewport,
        }
    }

    /// Gate fingerprint of this event. Pointer events are never
    /// programmatic, so they carry none.
    pub fn echo(&self) -> Option<Echo> {
        match self {
            HostEvent::ZoomChanged { zoom, .. } => Some(Echo::Zoom(*zoom)),
            HostEvent::CenterChanged { center, .. } => Some(Echo::Center(*center)),
            HostEvent::LayerInserted { index, .. } => Some(Echo::LayerInserted(*index)),
            HostEvent::LayerRemoved { index, .. } => Some(Echo::LayerRemoved(*index)),
            HostEvent::LayersReordered { .. } => Some(Echo::LayersReordered),
            HostEvent::SelectionChanged { .. } => Some(Echo::SelectionChanged),
            HostEvent::LayerRenamed { new_name, .. } => {
                Some(Echo::LayerRenamed(new_name.clone()))
            }
            HostEvent::LayerUpdated { index, .. } => Some(Echo::LayerUpdated(*index)),
            HostEvent::PointerPressed { .. }
            | HostEvent::PointerMoved { .. }
            | HostEvent::PointerReleased { .. } => None,
        }
    }
}

/// Imperative surface of the external viewer application.
pub trait ViewerHost {
    /// Whether the viewport exists.
    fn is_open(&self, viewport: ViewportId) -> bool;

    /// Create a viewport with the given dims. No echo.
    fn open_viewport(&mut self, viewport: ViewportId, dims: Dims);

    /// Destroy a viewport and everything in it. No echo.
    fn close_viewport(&mut self, viewport: ViewportId);

    /// Current camera state.
    fn camera(&self, viewport: ViewportId) -> Camera;

    /// Write the zoom factor. Echoes [`HostEvent::ZoomChanged`].
    fn set_zoom(&mut self, viewport: ViewportId, zoom: f64);

    /// Write the camera center. Echoes [`HostEvent::CenterChanged`].
    fn set_center(&mut self, viewport: ViewportId, center: [f64; 3]);

    /// Current dims state.
    fn dims(&self, viewport: ViewportId) -> Dims;

    /// Replace the dims state. No echo.
    fn set_dims(&mut self, viewport: ViewportId, dims: Dims);

    /// Write the current slice index per axis. No echo.
    fn set_current_step(&mut self, viewport: ViewportId, step: [u64; 3]);

    /// Number of layers in the viewport.
    fn layer_count(&self, viewport: ViewportId) -> usize;

    /// Layer at `index`, if any.
    fn layer(&self, viewport: ViewportId, index: usize) -> Option<Layer>;

    /// Index of the layer with the given name.
    fn layer_index(&self, viewport: ViewportId, name: &str) -> Option<usize>;

    /// Layer names in stacking order.
    fn layer_names(&self, viewport: ViewportId) -> Vec<String>;

    /// Insert a layer at `index`. Echoes [`HostEvent::LayerInserted`].
    fn insert_layer(&mut self, viewport: ViewportId, index: usize, layer: Layer);

    /// Remove the layer at `index`. Echoes [`HostEvent::LayerRemoved`].
    fn remove_layer(&mut self, viewport: ViewportId, index: usize) -> Option<Layer>;

    /// Move a layer between positions. Echoes [`HostEvent::LayersReordered`].
    fn move_layer(&mut self, viewport: ViewportId, from: usize, to: usize);

    /// Rename the layer at `index`. Echoes [`HostEvent::LayerRenamed`].
    fn rename_layer(&mut self, viewport: ViewportId, index: usize, name: &str);

    /// Replace the content of the layer at `index`. Echoes
    /// [`HostEvent::LayerUpdated`].
    fn set_layer_content(&mut self, viewport: ViewportId, index: usize, content: LayerContent);

    /// Currently selected layer names.
    fn selection(&self, viewport: ViewportId) -> BTreeSet<String>;

    /// Replace the selection. Echoes [`HostEvent::SelectionChanged`].
    fn set_selection(&mut self, viewport: ViewportId, names: BTreeSet<String>);

    /// Pop the oldest pending event, if any.
    fn poll_event(&mut self) -> Option<HostEvent>;
}
