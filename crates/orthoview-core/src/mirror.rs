//! Layer mirroring between the primary and secondary viewports.
//!
//! The primary viewport owns the content layers; each secondary holds one
//! mirror per content layer, matched through a stable index→name table
//! owned here. Renames are therefore an explicit operation on an index,
//! never inferred from name comparison. Crosshair overlays are excluded
//! from every rule and stay pinned on top of each viewport.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::{SyncError, SyncResult};
use crate::gate::{Echo, EventGate};
use crate::host::{ViewerHost, ViewportId};
use crate::layer::{Layer, LayerContent};

/// Replicates the primary viewport's content layers into the secondaries.
#[derive(Debug)]
pub struct LayerMirror {
    /// Content layer names in stacking order, index-aligned across all
    /// three viewports. Overlays are not tracked here.
    names: Vec<String>,

    /// Overlay layer name per viewport, indexed by [`ViewportId::index`].
    overlay_names: [&'static str; 3],
}

impl LayerMirror {
    pub fn new(overlay_names: [&'static str; 3]) -> Self {
        Self {
            names: Vec::new(),
            overlay_names,
        }
    }

    /// Number of tracked content layers.
    pub fn content_len(&self) -> usize {
        self.names.len()
    }

    /// Tracked content layer names in stacking order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Overlay name of a viewport.
    pub fn overlay_name(&self, viewport: ViewportId) -> &'static str {
        self.overlay_names[viewport.index()]
    }

    /// Whether a name is any viewport's overlay.
    pub fn is_overlay_name(&self, name: &str) -> bool {
        self.overlay_names.contains(&name)
    }

    /// Mirror every primary layer into both secondaries (session start).
    /// The caller has already validated kind and dimensionality, and the
    /// overlays are not yet present.
    pub fn initialize<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
    ) -> SyncResult<()> {
        let count = host.layer_count(ViewportId::Primary);
        for index in 0..count {
            let layer = host
                .layer(ViewportId::Primary, index)
                .ok_or_else(|| missing(format!("layer@{index}"), ViewportId::Primary))?;
            self.force_out_of_slice(host, gate, ViewportId::Primary, index, &layer.content);
            let mirrored = mirrored_content(&layer.content);
            for secondary in ViewportId::SECONDARY {
                gate.expect(secondary, Echo::LayerInserted(index));
                host.insert_layer(secondary, index, Layer::new(&layer.name, mirrored.clone()));
            }
            self.names.push(layer.name);
        }
        Ok(())
    }

    /// Replay an attribute or data change on both mirrors (§ attribute
    /// change rule).
    pub fn on_updated<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
        index: usize,
    ) -> SyncResult<()> {
        let name = self
            .names
            .get(index)
            .cloned()
            .ok_or_else(|| missing(format!("layer@{index}"), ViewportId::Primary))?;
        let layer = host
            .layer(ViewportId::Primary, index)
            .ok_or_else(|| missing(name.clone(), ViewportId::Primary))?;
        self.force_out_of_slice(host, gate, ViewportId::Primary, index, &layer.content);

        for secondary in ViewportId::SECONDARY {
            let mirror_index = host
                .layer_index(secondary, &name)
                .ok_or_else(|| missing(name.clone(), secondary))?;
            let mirror = host
                .layer(secondary, mirror_index)
                .ok_or_else(|| missing(name.clone(), secondary))?;
            let merged = merged_content(&layer.content, &mirror.content);
            gate.expect(secondary, Echo::LayerUpdated(mirror_index));
            host.set_layer_content(secondary, mirror_index, merged);
        }
        Ok(())
    }

    /// Rename both mirrors by position index and update the table. The
    /// index is used because the name that would otherwise match is the
    /// one being changed.
    pub fn on_renamed<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
        index: usize,
        new_name: &str,
    ) -> SyncResult<()> {
        let old_name = self
            .names
            .get(index)
            .cloned()
            .ok_or_else(|| missing(format!("layer@{index}"), ViewportId::Primary))?;
        for secondary in ViewportId::SECONDARY {
            let mirror_index = host
                .layer_index(secondary, &old_name)
                .ok_or_else(|| missing(old_name.clone(), secondary))?;
            gate.expect(secondary, Echo::LayerRenamed(new_name.to_string()));
            host.rename_layer(secondary, mirror_index, new_name);
        }
        self.names[index] = new_name.to_string();
        Ok(())
    }

    /// Mirror a newly inserted primary layer, or undo the insertion and
    /// report it when the layer cannot be mirrored.
    pub fn on_inserted<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
        index: usize,
    ) -> SyncResult<()> {
        let layer = host
            .layer(ViewportId::Primary, index)
            .ok_or_else(|| missing(format!("layer@{index}"), ViewportId::Primary))?;

        let reason = if !layer.content.is_mirrorable() {
            Some("unsupported kind, only images, points and labels mirror".to_string())
        } else if layer.content.ndim() != 3 {
            Some(format!("data is {}-dimensional", layer.content.ndim()))
        } else {
            None
        };
        if let Some(reason) = reason {
            // Undo before surfacing, so the layer sets stay identical.
            warn!(layer = %layer.name, %reason, "rejecting inserted layer");
            gate.expect(ViewportId::Primary, Echo::LayerRemoved(index));
            host.remove_layer(ViewportId::Primary, index);
            return Err(SyncError::incompatible(layer.name, reason));
        }

        // Insertions past the overlay land at the end of the content
        // region; the caller re-asserts overlay-on-top afterwards.
        let content_index = index.min(self.names.len());
        self.force_out_of_slice(host, gate, ViewportId::Primary, index, &layer.content);
        let mirrored = mirrored_content(&layer.content);
        for secondary in ViewportId::SECONDARY {
            gate.expect(secondary, Echo::LayerInserted(content_index));
            host.insert_layer(
                secondary,
                content_index,
                Layer::new(&layer.name, mirrored.clone()),
            );
        }
        self.names.insert(content_index, layer.name);
        Ok(())
    }

    /// Remove both mirrors of a removed primary content layer.
    pub fn on_removed<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
        name: &str,
    ) -> SyncResult<()> {
        let position = self
            .names
            .iter()
            .position(|tracked| tracked == name)
            .ok_or_else(|| missing(name.to_string(), ViewportId::Primary))?;
        for secondary in ViewportId::SECONDARY {
            let mirror_index = host
                .layer_index(secondary, name)
                .ok_or_else(|| missing(name.to_string(), secondary))?;
            gate.expect(secondary, Echo::LayerRemoved(mirror_index));
            host.remove_layer(secondary, mirror_index);
        }
        self.names.remove(position);
        Ok(())
    }

    /// Replay the primary's content layer order on both secondaries. The
    /// caller has already pinned the overlays back on top.
    pub fn on_reordered<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
    ) -> SyncResult<()> {
        let target: Vec<String> = host
            .layer_names(ViewportId::Primary)
            .into_iter()
            .filter(|name| !self.is_overlay_name(name))
            .collect();

        for secondary in ViewportId::SECONDARY {
            for (target_index, name) in target.iter().enumerate() {
                let current = host
                    .layer_index(secondary, name)
                    .ok_or_else(|| missing(name.clone(), secondary))?;
                if current != target_index {
                    gate.expect(secondary, Echo::LayersReordered);
                    host.move_layer(secondary, current, target_index);
                }
            }
        }
        self.names = target;
        Ok(())
    }

    /// Mirror the primary's by-name selection into both secondaries,
    /// stripping overlays out of any selection first.
    pub fn mirror_selection<H: ViewerHost>(
        &mut self,
        host: &mut H,
        gate: &mut EventGate,
    ) -> SyncResult<()> {
        let mut selection = host.selection(ViewportId::Primary);
        if selection.contains(self.overlay_name(ViewportId::Primary)) {
            warn!("crosshair overlay selected, removing it from the selection");
            selection.remove(self.overlay_name(ViewportId::Primary));
            gate.expect(ViewportId::Primary, Echo::SelectionChanged);
            host.set_selection(ViewportId::Primary, selection.clone());
        }

        // Only tracked content names cross viewports.
        let mirrored: BTreeSet<String> = selection
            .into_iter()
            .filter(|name| self.names.iter().any(|tracked| tracked == name))
            .collect();
        for secondary in ViewportId::SECONDARY {
            gate.expect(secondary, Echo::SelectionChanged);
            host.set_selection(secondary, mirrored.clone());
        }
        Ok(())
    }

    /// Points layers display out-of-slice in every viewport, including
    /// the primary; write the flag back whenever it is unset.
    fn force_out_of_slice<H: ViewerHost>(
        &self,
        host: &mut H,
        gate: &mut EventGate,
        viewport: ViewportId,
        index: usize,
        content: &LayerContent,
    ) {
        if let LayerContent::Points { data, attrs } = content {
            if !attrs.out_of_slice_display {
                let mut attrs = attrs.clone();
                attrs.out_of_slice_display = true;
                gate.expect(viewport, Echo::LayerUpdated(index));
                host.set_layer_content(
                    viewport,
                    index,
                    LayerContent::Points {
                        data: data.clone(),
                        attrs,
                    },
                );
            }
        }
    }
}

fn missing(name: String, viewport: ViewportId) -> SyncError {
    SyncError::MirrorNotFound { name, viewport }
}

/// Content for a fresh mirror: identical data reference and attributes,
/// with points forced to display out of slice.
fn mirrored_content(primary: &LayerContent) -> LayerContent {
    let mut content = primary.clone();
    if let LayerContent::Points { attrs, .. } = &mut content {
        attrs.out_of_slice_display = true;
    }
    content
}

/// Content for an existing mirror after a primary change: everything is
/// taken from the primary except empty point color lists, which keep the
/// mirror's current colors.
fn merged_content(primary: &LayerContent, mirror: &LayerContent) -> LayerContent {
    let mut content = mirrored_content(primary);
    if let (
        LayerContent::Points { attrs, .. },
        LayerContent::Points {
            attrs: mirror_attrs,
            ..
        },
    ) = (&mut content, mirror)
    {
        if attrs.face_color.is_empty() {
            attrs.face_color = mirror_attrs.face_color.clone();
        }
        if attrs.edge_color.is_empty() {
            attrs.edge_color = mirror_attrs.edge_color.clone();
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{DataRef, PointsAttrs};

    fn points_content(face: Vec<crate::layer::Color>, out_of_slice: bool) -> LayerContent {
        LayerContent::Points {
            data: DataRef::volume(),
            attrs: PointsAttrs {
                face_color: face,
                out_of_slice_display: out_of_slice,
                ..PointsAttrs::default()
            },
        }
    }

    #[test]
    fn test_mirrored_points_force_out_of_slice() {
        let mirrored = mirrored_content(&points_content(Vec::new(), false));
        match mirrored {
            LayerContent::Points { attrs, .. } => assert!(attrs.out_of_slice_display),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_mirrored_image_is_identical() {
        let primary = Layer::image("tomogram").content;
        assert_eq!(mirrored_content(&primary), primary);
    }

    #[test]
    fn test_merged_keeps_mirror_colors_when_primary_is_empty() {
        let primary = points_content(Vec::new(), true);
        let mirror = points_content(vec![[1.0, 0.0, 0.0, 1.0]], true);
        match merged_content(&primary, &mirror) {
            LayerContent::Points { attrs, .. } => {
                assert_eq!(attrs.face_color, vec![[1.0, 0.0, 0.0, 1.0]]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_merged_prefers_primary_colors_when_set() {
        let primary = points_content(vec![[0.0, 1.0, 0.0, 1.0]], true);
        let mirror = points_content(vec![[1.0, 0.0, 0.0, 1.0]], true);
        match merged_content(&primary, &mirror) {
            LayerContent::Points { attrs, .. } => {
                assert_eq!(attrs.face_color, vec![[0.0, 1.0, 0.0, 1.0]]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_overlay_name_lookup() {
        let mirror = LayerMirror::new(["crosshair-xy", "crosshair-xz", "crosshair-yz"]);
        assert!(mirror.is_overlay_name("crosshair-xz"));
        assert!(!mirror.is_overlay_name("tomogram"));
        assert_eq!(mirror.overlay_name(ViewportId::SecondaryB), "crosshair-yz");
    }
}
