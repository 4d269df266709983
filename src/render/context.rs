use crate::foundation::color::CssColor;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Vec2};
use crate::foundation::error::CompositorResult;
use crate::render::backend::FrameRGBA;
use crate::render::blend::BlendMode;
use crate::scene::texture::Texture;

/// The native 2D drawing context a [`crate::RenderTarget`] drives.
///
/// Semantics follow a host canvas: one current graphics state (transform, global alpha, blend
/// mode, clip) with a save/restore stack, a current path built in device space, and image blits
/// that honor the current state. [`crate::CpuContext`] is the raster implementation.
pub trait DrawContext {
    /// Create a context with a `width x height` backing store.
    fn create(width: u32, height: u32) -> CompositorResult<Self>
    where
        Self: Sized;

    /// Replace the backing store; contents and graphics state are reset.
    fn resize(&mut self, width: u32, height: u32) -> CompositorResult<()>;

    /// Start a frame: reset the graphics state to defaults (identity transform, alpha 1, normal
    /// blend, no clip, empty path), then clear the surface or fill it with `background`.
    fn begin_frame(&mut self, background: Option<CssColor>);

    /// Finish a frame; pixels become observable through [`DrawContext::readback_rgba8`].
    fn end_frame(&mut self) -> CompositorResult<()>;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Post-multiply a translation onto the current transform.
    fn translate(&mut self, offset: Vec2);

    /// Set the global alpha used by subsequent blits.
    fn set_global_alpha(&mut self, alpha: f32);

    /// Set the compositing operator used by subsequent blits.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Push the graphics state.
    fn save(&mut self);

    /// Pop the graphics state, reverting any clip applied since the matching save.
    fn restore(&mut self);

    /// Discard the current path.
    fn begin_path(&mut self);

    /// Append `path`, mapped through the current transform, to the current path.
    fn append_path(&mut self, path: &BezPath);

    /// Intersect the clip region with the current path.
    fn clip(&mut self);

    /// Draw the whole texture with its top-left corner at `origin` (local coordinates).
    fn draw_image(&mut self, texture: &Texture, origin: Point) {
        let (w, h) = (f64::from(texture.width()), f64::from(texture.height()));
        self.draw_image_rect(
            texture,
            Rect::new(0.0, 0.0, w, h),
            Rect::new(origin.x, origin.y, origin.x + w, origin.y + h),
        );
    }

    /// Draw the `src` region of the texture into the `dst` rectangle (local coordinates).
    fn draw_image_rect(&mut self, texture: &Texture, src: Rect, dst: Rect);

    /// Outline `rect` (local coordinates) with a solid stroke. Used by the debug overlay.
    fn stroke_rect(&mut self, rect: Rect, width: f64, color: CssColor);

    /// Copy out the pixels of the last finished frame.
    fn readback_rgba8(&self) -> CompositorResult<FrameRGBA>;
}
