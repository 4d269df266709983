use crate::foundation::color::CssColor;
use crate::foundation::core::{Affine, BezPath, Rect, Vec2};
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::backend::FrameRGBA;
use crate::render::blend::BlendMode;
use crate::render::context::DrawContext;
use crate::scene::texture::Texture;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasState {
    transform: Affine,
    global_alpha: f32,
    blend_mode: BlendMode,
    // Clip layers pushed since the matching save.
    clip_layers: u32,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            blend_mode: BlendMode::Normal,
            clip_layers: 0,
        }
    }
}

/// CPU raster drawing context backed by `vello_cpu`.
///
/// Drawing is recorded between [`DrawContext::begin_frame`] and [`DrawContext::end_frame`] and
/// rasterized into the backing pixmap when the frame ends.
pub struct CpuContext {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    state: CanvasState,
    saved: SmallVec<[CanvasState; 8]>,
    // Device-space path.
    path: BezPath,
}

impl CpuContext {
    /// Backing store width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Backing store height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Depth of the save stack.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    fn open_clip_layers(&self) -> u32 {
        self.state.clip_layers + self.saved.iter().map(|s| s.clip_layers).sum::<u32>()
    }

    fn unwind_layers(&mut self) {
        while !self.saved.is_empty() {
            self.restore();
        }
        for _ in 0..self.state.clip_layers {
            self.ctx.pop_layer();
        }
        self.state.clip_layers = 0;
    }
}

impl DrawContext for CpuContext {
    fn create(width: u32, height: u32) -> CompositorResult<Self> {
        let (w, h) = checked_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            state: CanvasState::default(),
            saved: SmallVec::new(),
            path: BezPath::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) -> CompositorResult<()> {
        *self = Self::create(width, height)?;
        Ok(())
    }

    fn begin_frame(&mut self, background: Option<CssColor>) {
        if self.open_clip_layers() > 0 {
            // An aborted frame left layers open; start from a fresh recorder.
            self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        } else {
            self.ctx.reset();
        }
        self.state = CanvasState::default();
        self.saved.clear();
        self.path = BezPath::new();

        clear_pixmap_to_transparent(&mut self.pixmap);
        if let Some(color) = background {
            let [r, g, b, a] = color.to_rgba8();
            self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }
    }

    fn end_frame(&mut self) -> CompositorResult<()> {
        self.unwind_layers();
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }

    fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine::translate(offset);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    fn save(&mut self) {
        self.saved.push(self.state);
        self.state.clip_layers = 0;
    }

    fn restore(&mut self) {
        let Some(prev) = self.saved.pop() else {
            return;
        };
        for _ in 0..self.state.clip_layers {
            self.ctx.pop_layer();
        }
        self.state = prev;
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn append_path(&mut self, path: &BezPath) {
        let mut device = path.clone();
        device.apply_affine(self.state.transform);
        for el in device.elements() {
            self.path.push(*el);
        }
    }

    fn clip(&mut self) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.push_clip_layer(&bezpath_to_cpu(&self.path));
        self.state.clip_layers += 1;
    }

    fn draw_image_rect(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        let alpha = self.state.global_alpha;
        if texture.is_empty() || alpha <= 0.0 {
            return;
        }
        let image_rect = Rect::new(
            0.0,
            0.0,
            f64::from(texture.width()),
            f64::from(texture.height()),
        );
        let Some((src, dst)) = clamp_source(src, dst, image_rect) else {
            return;
        };

        let paint_transform = Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate(-src.origin().to_vec2());

        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_transform(affine_to_cpu(self.state.transform));
        self.ctx.set_paint_transform(affine_to_cpu(paint_transform));
        self.ctx.set_paint(texture.paint().clone());

        let blended = self.state.blend_mode != BlendMode::Normal;
        if blended {
            self.ctx.push_blend_layer(self.state.blend_mode.to_peniko());
        }
        if alpha < 1.0 {
            self.ctx.push_opacity_layer(alpha);
        }
        self.ctx.fill_rect(&rect_to_cpu(dst));
        if alpha < 1.0 {
            self.ctx.pop_layer();
        }
        if blended {
            self.ctx.pop_layer();
        }
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: CssColor) {
        let [r, g, b, a] = color.to_rgba8();
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_transform(affine_to_cpu(self.state.transform));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_rect(&rect_to_cpu(rect));
    }

    fn readback_rgba8(&self) -> CompositorResult<FrameRGBA> {
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn checked_dims(width: u32, height: u32) -> CompositorResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(CompositorError::validation(format!(
            "surface dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| CompositorError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CompositorError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Clamp `src` to the image and shrink `dst` by the same proportion, as a host canvas does.
///
/// Returns `None` when nothing is left to draw.
pub(crate) fn clamp_source(src: Rect, dst: Rect, image: Rect) -> Option<(Rect, Rect)> {
    if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0 {
        return None;
    }
    let clipped = src.intersect(image);
    if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
        return None;
    }
    let sx = dst.width() / src.width();
    let sy = dst.height() / src.height();
    let dst = Rect::new(
        dst.x0 + (clipped.x0 - src.x0) * sx,
        dst.y0 + (clipped.y0 - src.y0) * sy,
        dst.x1 - (src.x1 - clipped.x1) * sx,
        dst.y1 - (src.y1 - clipped.y1) * sy,
    );
    Some((clipped, dst))
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
