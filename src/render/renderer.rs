use crate::foundation::color::CssColor;
use crate::foundation::core::{Affine, Rect, Vec2};
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::backend::FrameRGBA;
use crate::render::blit::{FrameStats, blit};
use crate::render::context::DrawContext;
use crate::render::cpu::CpuContext;
use crate::render::mask::MaskStack;
use crate::render::opts::RendererOpts;
use crate::render::state::StateTracker;
use crate::render::target::{HostContainer, RenderTarget, Surface};
use crate::scene::node::PaintableNode;

const BOUNDS_STROKE_WIDTH: f64 = 4.0;
const DRAW_RECT_STROKE_WIDTH: f64 = 2.0;

/// Draws flattened scene nodes onto one surface, frame by frame.
///
/// A frame is `begin`, then any mix of `draw` and balanced `begin_mask`/`end_mask`, then `end`.
/// Calls that break this order return [`CompositorError::Lifecycle`].
pub struct CanvasRenderer<C: DrawContext = CpuContext> {
    opts: RendererOpts,
    target: Option<RenderTarget<C>>,
    tracker: StateTracker,
    masks: MaskStack,
    stats: FrameStats,
    framing: bool,
    destroyed: bool,
}

impl CanvasRenderer<CpuContext> {
    /// A CPU renderer with default options.
    pub fn new() -> Self {
        Self::from_valid_opts(RendererOpts::default())
    }
}

impl Default for CanvasRenderer<CpuContext> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DrawContext> CanvasRenderer<C> {
    /// A renderer with explicit options.
    pub fn with_opts(opts: RendererOpts) -> CompositorResult<Self> {
        opts.validate()?;
        Ok(Self::from_valid_opts(opts))
    }

    fn from_valid_opts(opts: RendererOpts) -> Self {
        Self {
            opts,
            target: None,
            tracker: StateTracker::new(),
            masks: MaskStack::new(),
            stats: FrameStats::default(),
            framing: false,
            destroyed: false,
        }
    }

    /// Attach `surface` to `host` and create its drawing context.
    #[tracing::instrument(skip(self, surface, host), fields(
        width = surface.pixel_width,
        height = surface.pixel_height,
    ))]
    pub fn init(&mut self, surface: Surface, host: &mut HostContainer) -> CompositorResult<()> {
        if self.destroyed {
            return Err(CompositorError::lifecycle("init called after destroy"));
        }
        if self.target.is_some() {
            return Err(CompositorError::lifecycle("renderer is already initialised"));
        }
        let target = RenderTarget::attach(
            surface,
            host,
            &self.opts.surface_id,
            self.opts.device_pixel_ratio,
        )?;
        tracing::debug!(id = %self.opts.surface_id, "render target attached");
        self.target = Some(target);
        Ok(())
    }

    /// Resize the surface to `width x height` physical pixels.
    ///
    /// A frame in progress is discarded.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, width: u32, height: u32) -> CompositorResult<()> {
        self.ensure_live("resize")?;
        let Some(target) = self.target.as_mut() else {
            return Err(CompositorError::lifecycle("resize called before init"));
        };
        target.resize(width, height)?;
        if self.framing {
            tracing::warn!(open_masks = self.masks.depth(), "resize discarded the frame in progress");
            self.framing = false;
        }
        self.masks.clear();
        self.tracker.reset();
        Ok(())
    }

    /// Start a frame. `""` clears the surface to transparent; anything else is parsed as a color
    /// and fills it.
    ///
    /// Starting a frame while one is in progress discards the old frame and its open masks.
    #[tracing::instrument(skip(self))]
    pub fn begin(&mut self, clear_color: &str) -> CompositorResult<()> {
        self.ensure_live("begin")?;
        let background = match clear_color.trim() {
            "" => None,
            color => Some(CssColor::parse(color)?),
        };
        if self.framing {
            tracing::warn!(open_masks = self.masks.depth(), "begin discarded the frame in progress");
        }
        let Some(target) = self.target.as_mut() else {
            return Err(CompositorError::lifecycle("begin called before init"));
        };
        target.ctx_mut().begin_frame(background);
        self.tracker.reset();
        self.masks.clear();
        self.stats = FrameStats::default();
        self.framing = true;
        Ok(())
    }

    /// Draw one node's cached bitmap.
    pub fn draw(&mut self, node: &PaintableNode) -> CompositorResult<()> {
        self.ensure_framing("draw")?;
        let Some(target) = self.target.as_mut() else {
            return Err(CompositorError::lifecycle("draw called before init"));
        };
        let drawn = blit(target.ctx_mut(), &mut self.tracker, node, &mut self.stats);
        if drawn && self.opts.debug_bounds {
            let offset = Vec2::new(f64::from(node.offset_x), f64::from(node.offset_y));
            let ctx = target.ctx_mut();
            ctx.stroke_rect(
                node.bounds - offset,
                BOUNDS_STROKE_WIDTH,
                CssColor::rgba(1.0, 0.0, 0.0, 1.0),
            );
            // Device-space draw rect.
            ctx.set_transform(Affine::IDENTITY);
            ctx.stroke_rect(
                node.matrix.transform_rect_bbox(node.bounds) - offset,
                DRAW_RECT_STROKE_WIDTH,
                CssColor::rgba(0.0, 1.0, 0.0, 1.0),
            );
        }
        Ok(())
    }

    /// Clip subsequent drawing to the outline of `mask` until the matching [`Self::end_mask`].
    pub fn begin_mask(&mut self, mask: &PaintableNode) -> CompositorResult<()> {
        self.ensure_framing("begin_mask")?;
        let Some(target) = self.target.as_mut() else {
            return Err(CompositorError::lifecycle("begin_mask called before init"));
        };
        self.masks.begin(target.ctx_mut(), &mut self.tracker, mask);
        self.stats.masks += 1;
        Ok(())
    }

    /// Close the innermost mask scope.
    pub fn end_mask(&mut self) -> CompositorResult<()> {
        self.ensure_live("end_mask")?;
        let Some(target) = self.target.as_mut() else {
            return Err(CompositorError::lifecycle("end_mask called before init"));
        };
        self.masks.end(target.ctx_mut(), &mut self.tracker)?;
        Ok(())
    }

    /// Finish the frame and return its counters.
    #[tracing::instrument(skip(self))]
    pub fn end(&mut self) -> CompositorResult<FrameStats> {
        self.ensure_framing("end")?;
        if !self.masks.is_empty() {
            return Err(CompositorError::lifecycle(format!(
                "end called with {} open mask(s)",
                self.masks.depth()
            )));
        }
        let Some(target) = self.target.as_mut() else {
            return Err(CompositorError::lifecycle("end called before init"));
        };
        target.ctx_mut().end_frame()?;
        self.framing = false;

        let stats = self.stats;
        tracing::debug!(
            draws = stats.draws,
            empty_skips = stats.empty_skips,
            full_blits = stats.full_blits,
            partitions_drawn = stats.partitions_drawn,
            partitions_skipped = stats.partitions_skipped,
            alpha_writes = stats.alpha_writes,
            blend_writes = stats.blend_writes,
            masks = stats.masks,
            "frame finished"
        );
        Ok(stats)
    }

    /// Release the surface and context. Safe to call repeatedly.
    #[tracing::instrument(skip(self))]
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.target = None;
        self.masks.clear();
        self.tracker.reset();
        self.framing = false;
        self.destroyed = true;
        tracing::debug!("renderer destroyed");
    }

    /// Pixels of the last finished frame.
    pub fn readback_rgba8(&self) -> CompositorResult<FrameRGBA> {
        self.ensure_live("readback_rgba8")?;
        match &self.target {
            Some(target) => target.ctx().readback_rgba8(),
            None => Err(CompositorError::lifecycle("readback_rgba8 called before init")),
        }
    }

    /// Logical drawing area, once initialised.
    pub fn viewport(&self) -> Option<Rect> {
        self.target.as_ref().map(RenderTarget::viewport)
    }

    /// The attached surface, once initialised.
    pub fn surface(&self) -> Option<&Surface> {
        self.target.as_ref().map(RenderTarget::surface)
    }

    /// The render target, once initialised.
    pub fn target(&self) -> Option<&RenderTarget<C>> {
        self.target.as_ref()
    }

    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether a frame is in progress.
    pub fn is_framing(&self) -> bool {
        self.framing
    }

    /// Number of open mask scopes.
    pub fn mask_depth(&self) -> usize {
        self.masks.depth()
    }

    fn ensure_live(&self, op: &str) -> CompositorResult<()> {
        if self.destroyed {
            return Err(CompositorError::lifecycle(format!("{op} called after destroy")));
        }
        if self.target.is_none() {
            return Err(CompositorError::lifecycle(format!("{op} called before init")));
        }
        Ok(())
    }

    fn ensure_framing(&self, op: &str) -> CompositorResult<()> {
        self.ensure_live(op)?;
        if !self.framing {
            return Err(CompositorError::lifecycle(format!(
                "{op} called outside a frame"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
