use super::*;
use crate::foundation::core::{Affine, BezPath, Rect};
use crate::render::recording::{Call, RecordingContext};
use kurbo::Shape;

fn square(x: f64, y: f64, size: f64) -> BezPath {
    Rect::new(x, y, x + size, y + size).to_path(0.1)
}

fn appended(ctx: &RecordingContext) -> Vec<Rect> {
    ctx.calls
        .iter()
        .filter_map(|c| match c {
            Call::AppendPath(r) => Some(*r),
            _ => None,
        })
        .collect()
}

#[test]
fn shape_mask_saves_zeroes_alpha_and_clips() {
    let mut ctx = RecordingContext::create(100, 100).unwrap();
    let mut tracker = StateTracker::new();
    let mut stack = MaskStack::new();
    let node = PaintableNode::shape(square(0.0, 0.0, 10.0))
        .with_matrix(Affine::translate((5.0, 5.0)));

    let scope = stack.begin(&mut ctx, &mut tracker, &node);
    assert_eq!(scope.outlines, 1);
    assert_eq!(stack.depth(), 1);
    assert_eq!(tracker.snapshot().alpha, 0.0);
    assert_eq!(tracker.depth(), 1);
    assert_eq!(
        ctx.calls,
        vec![
            Call::Save,
            Call::SetGlobalAlpha(0.0),
            Call::BeginPath,
            Call::SetTransform(Affine::translate((5.0, 5.0))),
            Call::AppendPath(Rect::new(5.0, 5.0, 15.0, 15.0)),
            Call::Clip,
        ]
    );

    ctx.clear();
    stack.end(&mut ctx, &mut tracker).unwrap();
    assert_eq!(ctx.calls, vec![Call::Restore]);
    assert!(stack.is_empty());
    assert_eq!(tracker.snapshot().alpha, 1.0);
    assert_eq!(tracker.depth(), 0);
}

#[test]
fn group_children_apply_their_own_matrices_in_order() {
    let mut ctx = RecordingContext::create(100, 100).unwrap();
    let group = PaintableNode::group(vec![
        PaintableNode::shape(square(0.0, 0.0, 10.0)).with_matrix(Affine::translate((0.0, 0.0))),
        PaintableNode::group(vec![
            PaintableNode::shape(square(0.0, 0.0, 10.0))
                .with_matrix(Affine::translate((20.0, 0.0))),
        ]),
        PaintableNode::shape(square(0.0, 0.0, 10.0)).with_matrix(Affine::translate((40.0, 0.0))),
    ])
    .with_matrix(Affine::scale(100.0));

    let n = build_outline(&mut ctx, &group);
    assert_eq!(n, 3);
    assert_eq!(
        appended(&ctx),
        vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 30.0, 10.0),
            Rect::new(40.0, 0.0, 50.0, 10.0),
        ]
    );
    // The group's own matrix is never applied.
    assert_eq!(
        ctx.count(|c| matches!(c, Call::SetTransform(t) if *t == Affine::scale(100.0))),
        0
    );
}

#[test]
fn empty_group_contributes_nothing_but_still_clips() {
    let mut ctx = RecordingContext::create(10, 10).unwrap();
    let mut tracker = StateTracker::new();
    let mut stack = MaskStack::new();

    let scope = stack.begin(&mut ctx, &mut tracker, &PaintableNode::group(Vec::new()));
    assert_eq!(scope.outlines, 0);
    assert!(appended(&ctx).is_empty());
    assert_eq!(ctx.count(|c| matches!(c, Call::Clip)), 1);
}

#[test]
fn bounds_and_leaf_nodes_fall_back_to_their_bounds_rectangle() {
    let mut ctx = RecordingContext::create(10, 10).unwrap();
    let bounds = PaintableNode::bounds_only(Rect::new(-5.0, -5.0, 5.0, 5.0))
        .with_matrix(Affine::translate((10.0, 10.0)));
    let leaf = PaintableNode {
        bounds: Rect::new(0.0, 0.0, 4.0, 2.0),
        ..PaintableNode::default()
    };

    build_outline(&mut ctx, &bounds);
    build_outline(&mut ctx, &leaf);
    assert_eq!(
        appended(&ctx),
        vec![Rect::new(5.0, 5.0, 15.0, 15.0), Rect::new(0.0, 0.0, 4.0, 2.0)]
    );
}

#[test]
fn nested_scopes_unwind_in_lifo_order() {
    let mut ctx = RecordingContext::create(10, 10).unwrap();
    let mut tracker = StateTracker::new();
    let mut stack = MaskStack::new();
    tracker.apply_alpha(0.5);

    stack.begin(&mut ctx, &mut tracker, &PaintableNode::shape(square(0.0, 0.0, 8.0)));
    tracker.apply_alpha(1.0);
    stack.begin(&mut ctx, &mut tracker, &PaintableNode::shape(square(2.0, 2.0, 8.0)));
    assert_eq!(stack.depth(), 2);
    assert_eq!(tracker.depth(), 2);

    stack.end(&mut ctx, &mut tracker).unwrap();
    assert_eq!(tracker.snapshot().alpha, 1.0);
    stack.end(&mut ctx, &mut tracker).unwrap();
    assert_eq!(tracker.snapshot().alpha, 0.5);
    assert_eq!(ctx.count(|c| matches!(c, Call::Save)), 2);
    assert_eq!(ctx.count(|c| matches!(c, Call::Restore)), 2);
}

#[test]
fn end_without_begin_is_a_lifecycle_error() {
    let mut ctx = RecordingContext::create(10, 10).unwrap();
    let mut tracker = StateTracker::new();
    let mut stack = MaskStack::new();

    let err = stack.end(&mut ctx, &mut tracker).unwrap_err();
    assert!(err.is_lifecycle());
    assert!(ctx.calls.is_empty());
}
