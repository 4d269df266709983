use crate::foundation::core::{Point, Rect, Vec2, rebase_origin};
use crate::render::context::DrawContext;
use crate::render::state::StateTracker;
use crate::scene::node::PaintableNode;
use serde::Serialize;

/// Counters collected between `begin` and `end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Nodes that reached the context.
    pub draws: u32,
    /// `draw` calls skipped for a missing or zero-sized texture.
    pub empty_skips: u32,
    /// Nodes drawn with one whole-texture blit.
    pub full_blits: u32,
    /// Partitions blitted.
    pub partitions_drawn: u32,
    /// Partitions skipped because `is_draw` was false.
    pub partitions_skipped: u32,
    /// Global alpha writes issued.
    pub alpha_writes: u32,
    /// Blend mode writes issued.
    pub blend_writes: u32,
    /// Mask scopes opened.
    pub masks: u32,
}

/// Draw the cached texture of `node` with its transform, alpha and blend mode.
///
/// Returns `false` when the node had nothing to draw.
pub fn blit<C: DrawContext + ?Sized>(
    ctx: &mut C,
    tracker: &mut StateTracker,
    node: &PaintableNode,
    stats: &mut FrameStats,
) -> bool {
    let Some(texture) = node.drawable_texture() else {
        stats.empty_skips += 1;
        return false;
    };

    if tracker.apply_alpha(node.alpha) {
        ctx.set_global_alpha(node.alpha);
        stats.alpha_writes += 1;
    }
    if tracker.apply_blend_mode(node.blend_mode) {
        tracing::trace!(op = node.blend_mode.operation_name(), "blend mode write");
        ctx.set_blend_mode(node.blend_mode);
        stats.blend_writes += 1;
    }

    ctx.set_transform(node.matrix);
    if node.offset_x != 0 || node.offset_y != 0 {
        ctx.translate(Vec2::new(f64::from(node.offset_x), f64::from(node.offset_y)));
    }
    stats.draws += 1;

    if !node.is_partitioned() {
        ctx.draw_image(texture, Point::ZERO);
        stats.full_blits += 1;
        return true;
    }

    let local = rebase_origin(node.bounds);
    let atlas = node
        .atlas_rect
        .map(|r| r.origin().to_vec2())
        .unwrap_or(Vec2::ZERO);
    for split in &node.split_rects {
        if !split.is_draw {
            stats.partitions_skipped += 1;
            continue;
        }
        let dst: Rect = split.rect + local;
        ctx.draw_image_rect(texture, dst + atlas, dst);
        stats.partitions_drawn += 1;
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/render/blit.rs"]
mod tests;
