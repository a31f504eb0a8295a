//! orthoview-memory - in-memory viewer host
//!
//! A complete [`ViewerHost`] implementation backed by plain structs and a
//! [`VecDeque`] event queue. It stands in for a real viewer application
//! in tests and headless embeddings, and follows the host contract's
//! echo discipline exactly: every mutating operation with an event kind
//! enqueues one matching event, dims writes enqueue nothing, and events
//! come out in mutation order.
//!
//! Tests simulate the user by calling the same mutating operations the
//! engine calls; the engine tells its own writes apart through its gate,
//! not through the host.

use std::collections::{BTreeSet, VecDeque};

use orthoview_core::host::{Camera, Dims, HostEvent, ViewerHost, ViewportId};
use orthoview_core::layer::{Layer, LayerContent};
use orthoview_core::ViewOrientation;

/// State of one open viewport.
#[derive(Clone, Debug)]
struct ViewportState {
    dims: Dims,
    camera: Camera,
    layers: Vec<Layer>,
    selection: BTreeSet<String>,
}

impl ViewportState {
    fn new(dims: Dims) -> Self {
        Self {
            dims,
            camera: Camera::default(),
            layers: Vec::new(),
            selection: BTreeSet::new(),
        }
    }
}

/// In-memory viewer host with an explicit event queue.
#[derive(Debug, Default)]
pub struct MemoryHost {
    viewports: [Option<ViewportState>; 3],
    events: VecDeque<HostEvent>,
}

impl MemoryHost {
    /// Host with no open viewports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose primary viewport shows a volume with the given
    /// per-axis sample counts.
    pub fn with_primary(extents: [u64; 3]) -> Self {
        let mut host = Self::new();
        host.viewports[ViewportId::Primary.index()] =
            Some(ViewportState::new(Dims::new(ViewOrientation::Xy, extents)));
        host
    }

    /// Append a layer to a viewport without enqueueing an event, for
    /// building pre-session state.
    pub fn seed_layer(&mut self, viewport: ViewportId, mut layer: Layer) {
        layer.name = self.unique_name(viewport, &layer.name, None);
        self.viewport_mut(viewport).layers.push(layer);
    }

    /// Number of queued events.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drop all queued events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Enqueue an arbitrary event, e.g. a pointer sequence.
    pub fn push_event(&mut self, event: HostEvent) {
        self.events.push_back(event);
    }

    /// Enqueue a press/release pair at one position: a click.
    pub fn click(&mut self, viewport: ViewportId, position: [f64; 3]) {
        self.push_event(HostEvent::PointerPressed { viewport, position });
        self.push_event(HostEvent::PointerReleased { viewport, position });
    }

    /// Drag the viewport's camera center by a delta, enqueueing the
    /// pointer sequence and the center change a real viewer would emit.
    pub fn drag(&mut self, viewport: ViewportId, delta: [f64; 3]) {
        let start = self.camera(viewport).center;
        let end = [
            start[0] + delta[0],
            start[1] + delta[1],
            start[2] + delta[2],
        ];
        self.push_event(HostEvent::PointerPressed {
            viewport,
            position: start,
        });
        self.push_event(HostEvent::PointerMoved {
            viewport,
            position: end,
        });
        // The viewer itself pans its camera while dragging.
        self.set_center(viewport, end);
        self.push_event(HostEvent::PointerReleased {
            viewport,
            position: end,
        });
    }

    /// Resolve a name against the viewport's layers, appending ` [n]`
    /// until it collides with nothing, as napari does. `skip` excludes a
    /// layer from the collision check when it is the one being renamed.
    fn unique_name(&self, viewport: ViewportId, name: &str, skip: Option<usize>) -> String {
        let taken = |candidate: &str| {
            self.viewport(viewport)
                .layers
                .iter()
                .enumerate()
                .any(|(index, layer)| Some(index) != skip && layer.name == candidate)
        };
        if !taken(name) {
            return name.to_string();
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{name} [{counter}]");
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn viewport(&self, viewport: ViewportId) -> &ViewportState {
        self.viewports[viewport.index()]
            .as_ref()
            .expect("viewport is not open")
    }

    fn viewport_mut(&mut self, viewport: ViewportId) -> &mut ViewportState {
        self.viewports[viewport.index()]
            .as_mut()
            .expect("viewport is not open")
    }
}

impl ViewerHost for MemoryHost {
    fn is_open(&self, viewport: ViewportId) -> bool {
        self.viewports[viewport.index()].is_some()
    }

    fn open_viewport(&mut self, viewport: ViewportId, dims: Dims) {
        self.viewports[viewport.index()] = Some(ViewportState::new(dims));
    }

    fn close_viewport(&mut self, viewport: ViewportId) {
        self.viewports[viewport.index()] = None;
    }

    fn camera(&self, viewport: ViewportId) -> Camera {
        self.viewport(viewport).camera
    }

    fn set_zoom(&mut self, viewport: ViewportId, zoom: f64) {
        self.viewport_mut(viewport).camera.zoom = zoom;
        self.events.push_back(HostEvent::ZoomChanged { viewport, zoom });
    }

    fn set_center(&mut self, viewport: ViewportId, center: [f64; 3]) {
        self.viewport_mut(viewport).camera.center = center;
        self.events
            .push_back(HostEvent::CenterChanged { viewport, center });
    }

    fn dims(&self, viewport: ViewportId) -> Dims {
        self.viewport(viewport).dims
    }

    fn set_dims(&mut self, viewport: ViewportId, dims: Dims) {
        self.viewport_mut(viewport).dims = dims;
    }

    fn set_current_step(&mut self, viewport: ViewportId, step: [u64; 3]) {
        self.viewport_mut(viewport).dims.current_step = step;
    }

    fn layer_count(&self, viewport: ViewportId) -> usize {
        self.viewport(viewport).layers.len()
    }

    fn layer(&self, viewport: ViewportId, index: usize) -> Option<Layer> {
        self.viewport(viewport).layers.get(index).cloned()
    }

    fn layer_index(&self, viewport: ViewportId, name: &str) -> Option<usize> {
        self.viewport(viewport)
            .layers
            .iter()
            .position(|layer| layer.name == name)
    }

    fn layer_names(&self, viewport: ViewportId) -> Vec<String> {
        self.viewport(viewport)
            .layers
            .iter()
            .map(|layer| layer.name.clone())
            .collect()
    }

    fn insert_layer(&mut self, viewport: ViewportId, index: usize, mut layer: Layer) {
        layer.name = self.unique_name(viewport, &layer.name, None);
        let state = self.viewport_mut(viewport);
        let index = index.min(state.layers.len());
        state.layers.insert(index, layer);
        self.events
            .push_back(HostEvent::LayerInserted { viewport, index });
    }

    fn remove_layer(&mut self, viewport: ViewportId, index: usize) -> Option<Layer> {
        let state = self.viewport_mut(viewport);
        if index >= state.layers.len() {
            return None;
        }
        let layer = state.layers.remove(index);
        state.selection.remove(&layer.name);
        self.events.push_back(HostEvent::LayerRemoved {
            viewport,
            index,
            layer: layer.clone(),
        });
        Some(layer)
    }

    fn move_layer(&mut self, viewport: ViewportId, from: usize, to: usize) {
        let state = self.viewport_mut(viewport);
        if from >= state.layers.len() || to >= state.layers.len() {
            return;
        }
        let layer = state.layers.remove(from);
        state.layers.insert(to, layer);
        self.events
            .push_back(HostEvent::LayersReordered { viewport });
    }

    fn rename_layer(&mut self, viewport: ViewportId, index: usize, name: &str) {
        if index >= self.viewport(viewport).layers.len() {
            return;
        }
        let assigned = self.unique_name(viewport, name, Some(index));
        let state = self.viewport_mut(viewport);
        let layer = &mut state.layers[index];
        if layer.name == assigned {
            return;
        }
        let old_name = std::mem::replace(&mut layer.name, assigned.clone());
        if state.selection.remove(&old_name) {
            state.selection.insert(assigned.clone());
        }
        self.events.push_back(HostEvent::LayerRenamed {
            viewport,
            index,
            old_name,
            new_name: assigned,
        });
    }

    fn set_layer_content(&mut self, viewport: ViewportId, index: usize, content: LayerContent) {
        let state = self.viewport_mut(viewport);
        let Some(layer) = state.layers.get_mut(index) else {
            return;
        };
        layer.content = content;
        self.events
            .push_back(HostEvent::LayerUpdated { viewport, index });
    }

    fn selection(&self, viewport: ViewportId) -> BTreeSet<String> {
        self.viewport(viewport).selection.clone()
    }

    fn set_selection(&mut self, viewport: ViewportId, names: BTreeSet<String>) {
        self.viewport_mut(viewport).selection = names;
        self.events
            .push_back(HostEvent::SelectionChanged { viewport });
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        assert!(host.is_open(ViewportId::Primary));
        assert!(!host.is_open(ViewportId::SecondaryA));

        host.open_viewport(
            ViewportId::SecondaryA,
            Dims::new(ViewOrientation::Xz, [10, 10, 10]),
        );
        assert!(host.is_open(ViewportId::SecondaryA));

        host.close_viewport(ViewportId::SecondaryA);
        assert!(!host.is_open(ViewportId::SecondaryA));
    }

    #[test]
    fn test_every_mutation_echoes_one_event() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.insert_layer(ViewportId::Primary, 0, Layer::image("a"));
        host.insert_layer(ViewportId::Primary, 1, Layer::image("b"));
        host.set_zoom(ViewportId::Primary, 2.0);
        host.set_center(ViewportId::Primary, [1.0, 2.0, 3.0]);
        host.move_layer(ViewportId::Primary, 0, 1);
        host.rename_layer(ViewportId::Primary, 0, "c");
        host.set_selection(ViewportId::Primary, BTreeSet::from(["c".to_string()]));
        host.remove_layer(ViewportId::Primary, 0);
        assert_eq!(host.pending_events(), 8);
    }

    #[test]
    fn test_dims_writes_do_not_echo() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.set_current_step(ViewportId::Primary, [1, 2, 3]);
        host.set_dims(
            ViewportId::Primary,
            Dims::new(ViewOrientation::Yz, [10, 10, 10]),
        );
        assert_eq!(host.pending_events(), 0);
        assert_eq!(host.dims(ViewportId::Primary).current_step, [4, 4, 4]);
    }

    #[test]
    fn test_move_layer_semantics() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        for name in ["a", "b", "c"] {
            host.seed_layer(ViewportId::Primary, Layer::image(name));
        }
        host.move_layer(ViewportId::Primary, 0, 2);
        assert_eq!(host.layer_names(ViewportId::Primary), ["b", "c", "a"]);
        host.move_layer(ViewportId::Primary, 2, 0);
        assert_eq!(host.layer_names(ViewportId::Primary), ["a", "b", "c"]);
    }

    #[test]
    fn test_rename_updates_selection() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.seed_layer(ViewportId::Primary, Layer::image("a"));
        host.set_selection(ViewportId::Primary, BTreeSet::from(["a".to_string()]));
        host.rename_layer(ViewportId::Primary, 0, "b");
        assert!(host.selection(ViewportId::Primary).contains("b"));
    }

    #[test]
    fn test_duplicate_insert_names_are_uniquified() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.insert_layer(ViewportId::Primary, 0, Layer::image("a"));
        host.insert_layer(ViewportId::Primary, 1, Layer::image("a"));
        host.insert_layer(ViewportId::Primary, 2, Layer::image("a"));
        assert_eq!(host.layer_names(ViewportId::Primary), ["a", "a [1]", "a [2]"]);
    }

    #[test]
    fn test_rename_to_a_taken_name_is_uniquified() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.seed_layer(ViewportId::Primary, Layer::image("a"));
        host.seed_layer(ViewportId::Primary, Layer::image("b"));
        host.rename_layer(ViewportId::Primary, 1, "a");
        assert_eq!(host.layer_names(ViewportId::Primary), ["a", "a [1]"]);
        match host.poll_event() {
            Some(HostEvent::LayerRenamed { new_name, .. }) => assert_eq!(new_name, "a [1]"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_rename_to_the_current_name_is_a_noop() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.seed_layer(ViewportId::Primary, Layer::image("a"));
        host.rename_layer(ViewportId::Primary, 0, "a");
        assert_eq!(host.pending_events(), 0);
    }

    #[test]
    fn test_removed_event_carries_the_layer() {
        let mut host = MemoryHost::with_primary([10, 10, 10]);
        host.seed_layer(ViewportId::Primary, Layer::points("picks"));
        host.remove_layer(ViewportId::Primary, 0);
        match host.poll_event() {
            Some(HostEvent::LayerRemoved { layer, .. }) => assert_eq!(layer.name, "picks"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
