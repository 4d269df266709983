use crate::foundation::core::{Affine, BezPath, Rect};
use crate::render::blend::BlendMode;
use crate::scene::texture::Texture;
use serde::{Deserialize, Serialize};

/// One independently toggleable sub-region of a node's cached bitmap.
///
/// `rect` is in node-local coordinates, the same space as [`PaintableNode::bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRect {
    /// Region of the node covered by this partition.
    pub rect: Rect,
    /// Whether this partition is blitted on the next draw.
    pub is_draw: bool,
}

impl SplitRect {
    /// Build a partition.
    pub fn new(rect: Rect, is_draw: bool) -> Self {
        Self { rect, is_draw }
    }
}

/// What a node contributes to a clip outline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// A drawable leaf; as a mask it contributes its bounds.
    #[default]
    Leaf,
    /// A container whose children contribute their own outlines, in order.
    Group {
        /// Child nodes in paint order.
        children: Vec<PaintableNode>,
    },
    /// Vector geometry in node-local coordinates.
    Shape {
        /// Outline, serialized as SVG path data.
        #[serde(with = "svg_path")]
        path: BezPath,
    },
    /// No shape information; the bounds rectangle stands in for the outline.
    Bounds,
}

/// Flattened per-node state handed over by the scene graph.
///
/// The compositor only borrows nodes for the duration of one call and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintableNode {
    /// World-space transform, already composed through all ancestors.
    #[serde(default)]
    pub matrix: Affine,
    /// Computed alpha in `[0, 1]`.
    #[serde(default = "full_alpha")]
    pub alpha: f32,
    /// Compositing operator.
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Cached bitmap; `None` or zero-sized means nothing to draw.
    #[serde(skip)]
    pub texture: Option<Texture>,
    /// Node bounds relative to the node origin. The texture's top-left pixel maps to the bounds'
    /// top-left corner.
    #[serde(default)]
    pub bounds: Rect,
    /// Pixel origin shift applied after the matrix.
    #[serde(default)]
    pub offset_x: i32,
    /// Pixel origin shift applied after the matrix.
    #[serde(default)]
    pub offset_y: i32,
    /// Ordered partitions of the bitmap. Non-empty whenever `texture` is present.
    #[serde(default)]
    pub split_rects: Vec<SplitRect>,
    /// Sub-atlas sampling origin override.
    #[serde(default)]
    pub atlas_rect: Option<Rect>,
    /// Mask outline behavior.
    #[serde(default)]
    pub kind: NodeKind,
}

fn full_alpha() -> f32 {
    1.0
}

impl Default for PaintableNode {
    fn default() -> Self {
        Self {
            matrix: Affine::IDENTITY,
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
            texture: None,
            bounds: Rect::ZERO,
            offset_x: 0,
            offset_y: 0,
            split_rects: Vec::new(),
            atlas_rect: None,
            kind: NodeKind::Leaf,
        }
    }
}

impl PaintableNode {
    /// A drawable leaf covering its whole texture with a single partition.
    pub fn leaf(texture: Texture) -> Self {
        let bounds = Rect::new(
            0.0,
            0.0,
            f64::from(texture.width()),
            f64::from(texture.height()),
        );
        Self {
            texture: Some(texture),
            bounds,
            split_rects: vec![SplitRect::new(bounds, true)],
            ..Self::default()
        }
    }

    /// A mask shape.
    pub fn shape(path: BezPath) -> Self {
        Self {
            bounds: kurbo::Shape::bounding_box(&path),
            kind: NodeKind::Shape { path },
            ..Self::default()
        }
    }

    /// A group of child nodes.
    pub fn group(children: Vec<PaintableNode>) -> Self {
        Self {
            kind: NodeKind::Group { children },
            ..Self::default()
        }
    }

    /// A node known only by its bounds.
    pub fn bounds_only(bounds: Rect) -> Self {
        Self {
            bounds,
            kind: NodeKind::Bounds,
            ..Self::default()
        }
    }

    /// Replace the world transform.
    pub fn with_matrix(mut self, matrix: Affine) -> Self {
        self.matrix = matrix;
        self
    }

    /// Replace the computed alpha.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Replace the blend mode.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Replace the pixel origin offset.
    pub fn with_offset(mut self, offset_x: i32, offset_y: i32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Replace the bounds. Partitions are left untouched.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replace the partition list.
    pub fn with_split_rects(mut self, split_rects: Vec<SplitRect>) -> Self {
        self.split_rects = split_rects;
        self
    }

    /// Sample the texture from a sub-atlas region.
    pub fn with_atlas_rect(mut self, atlas_rect: Rect) -> Self {
        self.atlas_rect = Some(atlas_rect);
        self
    }

    /// The texture, when present and non-empty.
    pub fn drawable_texture(&self) -> Option<&Texture> {
        self.texture.as_ref().filter(|t| !t.is_empty())
    }

    /// `true` when drawing must go through the partition list rather than one full blit.
    pub fn is_partitioned(&self) -> bool {
        self.split_rects.len() != 1 || self.atlas_rect.is_some()
    }

    /// Child nodes of a group; empty for every other kind.
    pub fn children(&self) -> &[PaintableNode] {
        match &self.kind {
            NodeKind::Group { children } => children,
            _ => &[],
        }
    }
}

mod svg_path {
    use crate::foundation::core::BezPath;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(path: &BezPath, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&path.to_svg())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BezPath, D::Error> {
        let data = String::deserialize(d)?;
        BezPath::from_svg(data.trim())
            .map_err(|e| serde::de::Error::custom(format!("invalid svg path: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
