use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::context::DrawContext;
use crate::render::state::StateTracker;
use crate::scene::node::{NodeKind, PaintableNode};
use kurbo::Shape as _;

const RECT_TOLERANCE: f64 = 0.1;

/// One open mask scope. The clip itself lives in the context between save and restore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipScope {
    /// Number of outlines appended to the clip path when the scope was opened.
    pub outlines: usize,
}

/// LIFO stack of clip scopes opened by [`crate::CanvasRenderer::begin_mask`].
#[derive(Clone, Debug, Default)]
pub struct MaskStack {
    scopes: Vec<ClipScope>,
}

impl MaskStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Forget all scopes without touching the context. Only valid when the context state is
    /// reset at the same time (a new frame).
    pub fn clear(&mut self) {
        self.scopes.clear();
    }

    /// Open a clip scope shaped like `node`.
    ///
    /// Saves the graphics state, forces global alpha to 0 for the scope, builds the outline of
    /// `node` into a fresh path and intersects the clip with it.
    pub fn begin<C: DrawContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        tracker: &mut StateTracker,
        node: &PaintableNode,
    ) -> ClipScope {
        tracker.save();
        ctx.save();
        tracker.apply_alpha(0.0);
        ctx.set_global_alpha(0.0);
        ctx.begin_path();
        let outlines = build_outline(ctx, node);
        ctx.clip();

        let scope = ClipScope { outlines };
        self.scopes.push(scope);
        tracing::trace!(depth = self.scopes.len(), outlines, "mask scope opened");
        scope
    }

    /// Close the innermost scope, reverting its clip and alpha override.
    pub fn end<C: DrawContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        tracker: &mut StateTracker,
    ) -> CompositorResult<ClipScope> {
        let scope = self
            .scopes
            .pop()
            .ok_or_else(|| CompositorError::lifecycle("end_mask called without an open mask"))?;
        ctx.restore();
        tracker.restore();
        tracing::trace!(depth = self.scopes.len(), "mask scope closed");
        Ok(scope)
    }
}

/// Append the outline of `node` (depth-first, pre-order) to the current path.
///
/// Returns the number of outlines appended. Groups contribute only through their children.
pub(crate) fn build_outline<C: DrawContext + ?Sized>(ctx: &mut C, node: &PaintableNode) -> usize {
    match &node.kind {
        NodeKind::Shape { path } => {
            ctx.set_transform(node.matrix);
            ctx.append_path(path);
            1
        }
        NodeKind::Group { children } => children
            .iter()
            .map(|child| build_outline(ctx, child))
            .sum(),
        NodeKind::Leaf | NodeKind::Bounds => {
            ctx.set_transform(node.matrix);
            ctx.append_path(&node.bounds.to_path(RECT_TOLERANCE));
            1
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
