//! Content layer model.
//!
//! The engine mirrors three layer kinds (images, point annotations, label
//! maps) and manages its own crosshair overlays. Pixel and point data are
//! owned by the embedding viewer; layers reference them through opaque
//! [`DataRef`] handles, so the engine never touches storage formats.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crosshair::Segment;

/// RGBA color, components in `[0, 1]`.
pub type Color = [f32; 4];

/// Kind of a layer, as seen by the mirroring rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Image,
    Points,
    Labels,
    /// Crosshair overlay guides, created only by the session.
    Guides,
    /// Any kind the engine does not mirror.
    Other,
}

/// Opaque reference to externally owned layer data. Mirrors share the
/// same handle; the engine only needs identity and dimensionality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRef {
    /// Identity of the underlying data.
    pub id: Uuid,

    /// Number of dimensions of the data.
    pub ndim: u8,
}

impl DataRef {
    /// A fresh reference to 3-dimensional data.
    pub fn volume() -> Self {
        Self {
            id: Uuid::new_v4(),
            ndim: 3,
        }
    }

    /// A fresh reference with an explicit dimensionality.
    pub fn with_ndim(ndim: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            ndim,
        }
    }
}

/// Blending mode applied when compositing a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blending {
    Opaque,
    #[default]
    Translucent,
    Additive,
}

/// Interpolation used when sampling an image layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    #[default]
    Nearest,
    Linear,
}

/// Marker symbol for point annotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointSymbol {
    #[default]
    Disc,
    Ring,
    Cross,
    Square,
}

/// Style attributes of an image layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAttrs {
    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,

    /// Display range `[low, high]` mapped onto the colormap.
    pub contrast_limits: [f64; 2],

    /// Gamma correction exponent.
    pub gamma: f64,

    /// Colormap name.
    pub colormap: String,

    /// Compositing mode.
    pub blending: Blending,

    /// Sampling interpolation.
    pub interpolation: Interpolation,

    /// Whether the layer is rendered.
    pub visible: bool,
}

impl Default for ImageAttrs {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            contrast_limits: [0.0, 1.0],
            gamma: 1.0,
            colormap: "gray".to_string(),
            blending: Blending::Translucent,
            interpolation: Interpolation::Nearest,
            visible: true,
        }
    }
}

/// Style attributes of a points layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointsAttrs {
    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,

    /// Marker size in world units.
    pub size: f64,

    /// Compositing mode.
    pub blending: Blending,

    /// Marker symbol.
    pub symbol: PointSymbol,

    /// Per-point fill colors; empty means the viewer default.
    pub face_color: Vec<Color>,

    /// Per-point edge colors; empty means the viewer default.
    pub edge_color: Vec<Color>,

    /// Optional text template rendered next to each point.
    pub text: Option<String>,

    /// Whether points show on neighbouring slices. Forced `true` on
    /// mirrored layers so annotations stay visible in every view.
    pub out_of_slice_display: bool,

    /// Whether the layer is rendered.
    pub visible: bool,
}

impl Default for PointsAttrs {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            size: 10.0,
            blending: Blending::Translucent,
            symbol: PointSymbol::Disc,
            face_color: Vec::new(),
            edge_color: Vec::new(),
            text: None,
            out_of_slice_display: false,
            visible: true,
        }
    }
}

/// Style attributes of a label map layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelsAttrs {
    /// Label value the brush paints with.
    pub selected_label: u32,

    /// Whether only the selected label is rendered.
    pub show_selected_label: bool,

    /// Overall opacity in `[0, 1]`.
    pub opacity: f64,

    /// Brush radius in world units.
    pub brush_size: f64,

    /// Compositing mode.
    pub blending: Blending,

    /// Colormap name.
    pub colormap: String,

    /// Contour thickness; 0 renders filled regions.
    pub contour: u32,

    /// Number of dimensions the edit tools affect.
    pub n_edit_dimensions: u8,

    /// Whether fills are restricted to contiguous regions.
    pub contiguous: bool,

    /// Whether painting preserves existing labels.
    pub preserve_labels: bool,

    /// Whether the layer is rendered.
    pub visible: bool,
}

impl Default for LabelsAttrs {
    fn default() -> Self {
        Self {
            selected_label: 1,
            show_selected_label: false,
            opacity: 0.7,
            brush_size: 10.0,
            blending: Blending::Translucent,
            colormap: "labels".to_string(),
            contour: 0,
            n_edit_dimensions: 2,
            contiguous: true,
            preserve_labels: false,
            visible: true,
        }
    }
}

/// The full content of a layer: data reference plus kind-specific style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LayerContent {
    Image {
        data: DataRef,
        attrs: ImageAttrs,
    },

    Points {
        data: DataRef,
        attrs: PointsAttrs,
    },

    Labels {
        data: DataRef,
        attrs: LabelsAttrs,
    },

    /// Crosshair overlay geometry, owned by the session.
    Guides {
        segments: [Segment; 2],
        width: f64,
    },

    /// A kind the engine refuses to mirror (surfaces, shapes, ...).
    Other {
        kind_name: String,
        ndim: u8,
    },
}

impl LayerContent {
    /// Kind of this content.
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerContent::Image { .. } => LayerKind::Image,
            LayerContent::Points { .. } => LayerKind::Points,
            LayerContent::Labels { .. } => LayerKind::Labels,
            LayerContent::Guides { .. } => LayerKind::Guides,
            LayerContent::Other { .. } => LayerKind::Other,
        }
    }

    /// Dimensionality of the underlying data. Guides are 3D segments.
    pub fn ndim(&self) -> u8 {
        match self {
            LayerContent::Image { data, .. }
            | LayerContent::Points { data, .. }
            | LayerContent::Labels { data, .. } => data.ndim,
            LayerContent::Guides { .. } => 3,
            LayerContent::Other { ndim, .. } => *ndim,
        }
    }

    /// Whether the mirroring rules replicate this kind.
    pub fn is_mirrorable(&self) -> bool {
        matches!(
            self,
            LayerContent::Image { .. } | LayerContent::Points { .. } | LayerContent::Labels { .. }
        )
    }

    /// Visibility flag, `true` for kinds without one.
    pub fn visible(&self) -> bool {
        match self {
            LayerContent::Image { attrs, .. } => attrs.visible,
            LayerContent::Points { attrs, .. } => attrs.visible,
            LayerContent::Labels { attrs, .. } => attrs.visible,
            LayerContent::Guides { .. } | LayerContent::Other { .. } => true,
        }
    }

    /// Set the visibility flag where the kind has one.
    pub fn set_visible(&mut self, visible: bool) {
        match self {
            LayerContent::Image { attrs, .. } => attrs.visible = visible,
            LayerContent::Points { attrs, .. } => attrs.visible = visible,
            LayerContent::Labels { attrs, .. } => attrs.visible = visible,
            LayerContent::Guides { .. } | LayerContent::Other { .. } => {}
        }
    }
}

/// A named layer as held by a viewport. Names are unique per viewport and
/// are the key the mirroring rules match on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique name within the owning viewport.
    pub name: String,

    /// Kind, data reference, and style.
    pub content: LayerContent,
}

impl Layer {
    pub fn new(name: impl Into<String>, content: LayerContent) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// A 3D image layer with default style.
    pub fn image(name: impl Into<String>) -> Self {
        Self::new(
            name,
            LayerContent::Image {
                data: DataRef::volume(),
                attrs: ImageAttrs::default(),
            },
        )
    }

    /// A 3D points layer with default style.
    pub fn points(name: impl Into<String>) -> Self {
        Self::new(
            name,
            LayerContent::Points {
                data: DataRef::volume(),
                attrs: PointsAttrs::default(),
            },
        )
    }

    /// A 3D labels layer with default style.
    pub fn labels(name: impl Into<String>) -> Self {
        Self::new(
            name,
            LayerContent::Labels {
                data: DataRef::volume(),
                attrs: LabelsAttrs::default(),
            },
        )
    }

    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Layer::image("a").kind(), LayerKind::Image);
        assert_eq!(Layer::points("b").kind(), LayerKind::Points);
        assert_eq!(Layer::labels("c").kind(), LayerKind::Labels);
    }

    #[test]
    fn test_mirrorable_kinds() {
        assert!(Layer::image("a").content.is_mirrorable());
        assert!(Layer::points("b").content.is_mirrorable());
        assert!(Layer::labels("c").content.is_mirrorable());
        assert!(!LayerContent::Other {
            kind_name: "shapes".to_string(),
            ndim: 3,
        }
        .is_mirrorable());
    }

    #[test]
    fn test_ndim() {
        let flat = LayerContent::Image {
            data: DataRef::with_ndim(2),
            attrs: ImageAttrs::default(),
        };
        assert_eq!(flat.ndim(), 2);
        assert_eq!(Layer::labels("l").content.ndim(), 3);
    }

    #[test]
    fn test_visibility_round_trip() {
        let mut layer = Layer::image("a");
        assert!(layer.content.visible());
        layer.content.set_visible(false);
        assert!(!layer.content.visible());
    }

    #[test]
    fn test_layer_survives_json_serialization() {
        let layer = Layer::points("picks");
        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layer);
    }

    #[test]
    fn test_mirrors_share_the_data_handle() {
        let layer = Layer::image("a");
        let mirror = layer.clone();
        match (&layer.content, &mirror.content) {
            (LayerContent::Image { data: a, .. }, LayerContent::Image { data: b, .. }) => {
                assert_eq!(a.id, b.id);
            }
            _ => unreachable!(),
        }
    }
}
