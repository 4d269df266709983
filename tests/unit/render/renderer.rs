use super::*;
use crate::foundation::core::{Affine, Rgba8Premul};
use crate::render::recording::{Call, RecordingContext};
use crate::scene::texture::Texture;
use kurbo::Shape;

fn renderer(opts: RendererOpts) -> (CanvasRenderer<RecordingContext>, HostContainer) {
    let mut host = HostContainer::new();
    let mut r = CanvasRenderer::<RecordingContext>::with_opts(opts).unwrap();
    r.init(Surface::new(64, 32), &mut host).unwrap();
    (r, host)
}

fn calls(r: &CanvasRenderer<RecordingContext>) -> &[Call] {
    &r.target().unwrap().ctx().calls
}

fn node() -> PaintableNode {
    PaintableNode::leaf(Texture::solid(4, 4, Rgba8Premul::from_straight_rgba(0, 0, 255, 255)).unwrap())
}

fn mask() -> PaintableNode {
    PaintableNode::shape(Rect::new(0.0, 0.0, 8.0, 8.0).to_path(0.1))
}

#[test]
fn init_uses_the_configured_surface_id() {
    let (r, host) = renderer(RendererOpts::default().with_surface_id("stage"));
    assert!(host.contains("stage"));
    assert_eq!(r.surface().unwrap().id.as_deref(), Some("stage"));
    assert_eq!(r.viewport(), Some(Rect::new(0.0, 0.0, 64.0, 32.0)));
}

#[test]
fn init_twice_is_a_lifecycle_error() {
    let (mut r, mut host) = renderer(RendererOpts::default());
    let err = r.init(Surface::new(8, 8), &mut host).unwrap_err();
    assert!(err.is_lifecycle());
    assert_eq!(host.children().len(), 1);
}

#[test]
fn with_opts_rejects_invalid_options() {
    let err = CanvasRenderer::<RecordingContext>::with_opts(
        RendererOpts::default().with_device_pixel_ratio(0.0),
    )
    .err()
    .unwrap();
    assert!(matches!(err, CompositorError::Validation(_)));
}

#[test]
fn begin_clears_or_fills() {
    let (mut r, _host) = renderer(RendererOpts::default());
    r.begin("").unwrap();
    r.end().unwrap();
    r.begin("#ff0000").unwrap();
    r.end().unwrap();
    assert_eq!(
        calls(&r),
        [
            Call::BeginFrame(None),
            Call::EndFrame,
            Call::BeginFrame(Some([255, 0, 0, 255])),
            Call::EndFrame,
        ]
    );
}

#[test]
fn begin_accepts_any_css_color() {
    let (mut r, _host) = renderer(RendererOpts::default());
    r.begin("coral").unwrap();
    r.end().unwrap();
    r.begin("hsl(0.5turn 100% 50%)").unwrap();
    r.end().unwrap();
    assert_eq!(calls(&r)[0], Call::BeginFrame(Some([255, 127, 80, 255])));
    assert_eq!(calls(&r)[2], Call::BeginFrame(Some([0, 255, 255, 255])));
}

#[test]
fn bad_clear_color_is_a_color_error() {
    let (mut r, _host) = renderer(RendererOpts::default());
    let err = r.begin("not-a-color").unwrap_err();
    assert!(matches!(err, CompositorError::Color(_)));
    assert!(!r.is_framing());
}

#[test]
fn operations_outside_a_frame_fail_fast() {
    let (mut r, _host) = renderer(RendererOpts::default());
    assert!(r.draw(&node()).unwrap_err().is_lifecycle());
    assert!(r.begin_mask(&mask()).unwrap_err().is_lifecycle());
    assert!(r.end_mask().unwrap_err().is_lifecycle());
    assert!(r.end().unwrap_err().is_lifecycle());
    assert!(calls(&r).is_empty());
}

#[test]
fn end_with_open_masks_is_rejected_until_they_close() {
    let (mut r, _host) = renderer(RendererOpts::default());
    r.begin("").unwrap();
    r.begin_mask(&mask()).unwrap();
    assert!(r.end().unwrap_err().is_lifecycle());
    assert!(r.is_framing());
    r.end_mask().unwrap();
    let stats = r.end().unwrap();
    assert_eq!(stats.masks, 1);
}

#[test]
fn begin_discards_an_unfinished_frame() {
    let (mut r, _host) = renderer(RendererOpts::default());
    r.begin("").unwrap();
    r.begin_mask(&mask()).unwrap();
    r.draw(&node().with_alpha(0.25)).unwrap();

    r.begin("").unwrap();
    assert_eq!(r.mask_depth(), 0);
    let stats = r.end().unwrap();
    assert_eq!(stats, FrameStats::default());
}

#[test]
fn alpha_is_rewritten_after_a_mask_scope() {
    let (mut r, _host) = renderer(RendererOpts::default());
    r.begin("").unwrap();
    r.draw(&node()).unwrap();
    r.begin_mask(&mask()).unwrap();
    r.draw(&node()).unwrap();
    r.end_mask().unwrap();
    r.draw(&node()).unwrap();
    let stats = r.end().unwrap();

    // Only the draw inside the mask needs alpha restored from the forced 0.
    assert_eq!(stats.alpha_writes, 1);
    assert_eq!(stats.draws, 3);
    let alpha_writes: Vec<f32> = calls(&r)
        .iter()
        .filter_map(|c| match c {
            Call::SetGlobalAlpha(a) => Some(*a),
            _ => None,
        })
        .collect();
    assert_eq!(alpha_writes, vec![0.0, 1.0]);
}

#[test]
fn begin_resets_the_tracked_state() {
    let (mut r, _host) = renderer(RendererOpts::default());
    let faded = node().with_alpha(0.5);
    r.begin("").unwrap();
    r.draw(&faded).unwrap();
    r.end().unwrap();
    r.begin("").unwrap();
    r.draw(&faded).unwrap();
    let stats = r.end().unwrap();
    assert_eq!(stats.alpha_writes, 1);
}

#[test]
fn debug_overlay_strokes_bounds_and_draw_rect_of_drawn_nodes_only() {
    let (mut r, _host) = renderer(RendererOpts::default().with_debug_bounds(true));
    r.begin("").unwrap();
    r.draw(&node().with_offset(2, 1).with_matrix(Affine::translate((10.0, 10.0))))
        .unwrap();
    r.draw(&PaintableNode::default()).unwrap();
    r.end().unwrap();

    let strokes: Vec<&Call> = calls(&r)
        .iter()
        .filter(|c| matches!(c, Call::StrokeRect(_)))
        .collect();
    assert_eq!(
        strokes,
        vec![
            &Call::StrokeRect(Rect::new(-2.0, -1.0, 2.0, 3.0)),
            &Call::StrokeRect(Rect::new(8.0, 9.0, 12.0, 13.0)),
        ]
    );
    // The draw rect is stroked in device space.
    let last_transform = calls(&r)
        .iter()
        .rev()
        .find_map(|c| match c {
            Call::SetTransform(t) => Some(*t),
            _ => None,
        });
    assert_eq!(last_transform, Some(Affine::IDENTITY));
}

#[test]
fn resize_mid_frame_drops_the_frame() {
    let (mut r, _host) = renderer(RendererOpts::default().with_device_pixel_ratio(2.0));
    r.begin("").unwrap();
    r.begin_mask(&mask()).unwrap();
    r.resize(11, 7).unwrap();
    assert!(!r.is_framing());
    assert_eq!(r.mask_depth(), 0);
    let surface = r.surface().unwrap();
    assert_eq!((surface.display_width, surface.display_height), (6, 4));
}

#[test]
fn destroy_is_idempotent_and_blocks_further_use() {
    let (mut r, _host) = renderer(RendererOpts::default());
    r.destroy();
    r.destroy();
    assert!(r.is_destroyed());
    assert!(r.surface().is_none());
    assert!(r.begin("").unwrap_err().is_lifecycle());
    assert!(r.resize(10, 10).unwrap_err().is_lifecycle());
    assert!(r.readback_rgba8().unwrap_err().is_lifecycle());

    let mut host = HostContainer::new();
    assert!(r.init(Surface::new(4, 4), &mut host).unwrap_err().is_lifecycle());
}

#[test]
fn calls_before_init_fail_fast() {
    let mut r = CanvasRenderer::<RecordingContext>::with_opts(RendererOpts::default()).unwrap();
    assert!(r.begin("").unwrap_err().is_lifecycle());
    assert!(r.resize(10, 10).unwrap_err().is_lifecycle());
    assert!(r.viewport().is_none());
}
