use super::*;

#[test]
fn premultiply_rounds_to_nearest() {
    let px = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(px.to_array(), [128, 64, 0, 128]);
}

#[test]
fn opaque_and_transparent_are_fixed_points() {
    assert_eq!(
        Rgba8Premul::from_straight_rgba(10, 20, 30, 255).to_array(),
        [10, 20, 30, 255]
    );
    assert_eq!(
        Rgba8Premul::from_straight_rgba(10, 20, 30, 0),
        Rgba8Premul::transparent()
    );
}

#[test]
fn unpremultiply_inverts_opaque_pixels() {
    assert_eq!(unpremul_channel(77, 255), 77);
    assert_eq!(unpremul_channel(64, 128), 128);
    assert_eq!(unpremul_channel(9, 0), 0);
}

#[test]
fn rebase_moves_negative_bounds_to_origin() {
    let v = rebase_origin(Rect::new(-4.0, -2.0, 4.0, 6.0));
    assert_eq!(v, Vec2::new(4.0, 2.0));
}
