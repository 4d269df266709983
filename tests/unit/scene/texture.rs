use super::*;

#[test]
fn solid_texture_reports_dimensions() {
    let t = Texture::solid(3, 2, Rgba8Premul::from_straight_rgba(255, 0, 0, 255)).unwrap();
    assert_eq!((t.width(), t.height()), (3, 2));
    assert!(!t.is_empty());
}

#[test]
fn zero_sized_textures_are_empty() {
    let t = Texture::from_premul_bytes(&[], 0, 5).unwrap();
    assert!(t.is_empty());
}

#[test]
fn byte_length_must_match_dimensions() {
    let err = Texture::from_premul_bytes(&[0; 12], 2, 2).unwrap_err();
    assert!(matches!(err, CompositorError::Validation(_)));
}

#[test]
fn oversized_textures_are_rejected() {
    let err = Texture::from_premul_bytes(&[], 70_000, 0).unwrap_err();
    assert!(err.to_string().contains("exceeds u16"));
}

#[test]
fn imports_image_buffers() {
    let img = image::RgbaImage::from_pixel(4, 1, image::Rgba([0, 0, 255, 128]));
    let t = Texture::from_rgba_image(&img).unwrap();
    assert_eq!((t.width(), t.height()), (4, 1));
}

#[test]
fn solid_rejects_oversized_dimensions_up_front() {
    let err = Texture::solid(u32::MAX, u32::MAX, Rgba8Premul::transparent()).unwrap_err();
    assert!(matches!(err, CompositorError::Validation(_)));
    assert!(err.to_string().contains("exceeds u16"));
}
