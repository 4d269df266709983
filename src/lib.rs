//! Raster compositing backend for flattened 2D scene graphs.
//!
//! A [`CanvasRenderer`] draws [`PaintableNode`]s onto one surface in paint order:
//!
//! - redundant global alpha / blend mode writes are skipped ([`StateTracker`])
//! - nested clip masks are built from shapes, groups and bounds ([`MaskStack`])
//! - cached bitmaps are blitted whole or as independently toggled partitions
//!
//! The CPU backend ([`CpuContext`]) rasterizes with `vello_cpu`; other backends plug in through
//! [`DrawContext`].
#![forbid(unsafe_code)]

mod foundation;
mod render;
mod scene;

pub use crate::foundation::color::CssColor;
pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{CompositorError, CompositorResult};

pub use crate::render::backend::FrameRGBA;
pub use crate::render::blend::{BLEND_MODE_NAMES, BlendMode};
pub use crate::render::blit::{FrameStats, blit};
pub use crate::render::context::DrawContext;
pub use crate::render::cpu::CpuContext;
pub use crate::render::mask::{ClipScope, MaskStack};
pub use crate::render::opts::{
    DEFAULT_SURFACE_ID, ENV_DEBUG_BOUNDS, ENV_DEVICE_PIXEL_RATIO, RendererOpts,
};
pub use crate::render::renderer::CanvasRenderer;
pub use crate::render::state::{DeviceState, StateTracker};
pub use crate::render::target::{HostContainer, RenderTarget, Surface};
pub use crate::scene::node::{NodeKind, PaintableNode, SplitRect};
pub use crate::scene::texture::Texture;
