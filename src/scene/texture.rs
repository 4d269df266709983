use crate::foundation::core::{Rgba8Premul, premul_channel};
use crate::foundation::error::{CompositorError, CompositorResult};
use std::sync::Arc;

/// A node's cached bitmap: immutable premultiplied RGBA8 pixels.
///
/// Cloning is cheap; the pixels are shared. The scene graph owns texture generation and hands
/// the finished bitmap to the compositor.
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    paint: vello_cpu::Image,
}

impl Texture {
    /// Wrap tightly packed, row-major, premultiplied RGBA8 bytes.
    pub fn from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> CompositorResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            width,
            height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    /// Wrap straight-alpha RGBA8 bytes, premultiplying them.
    pub fn from_straight_rgba(bytes: &[u8], width: u32, height: u32) -> CompositorResult<Self> {
        let mut tmp = bytes.to_vec();
        for px in tmp.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = premul_channel(px[0], a);
            px[1] = premul_channel(px[1], a);
            px[2] = premul_channel(px[2], a);
        }
        Self::from_premul_bytes(&tmp, width, height)
    }

    /// Import a decoded `image` buffer (straight alpha).
    pub fn from_rgba_image(img: &image::RgbaImage) -> CompositorResult<Self> {
        Self::from_straight_rgba(img.as_raw(), img.width(), img.height())
    }

    /// A texture filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> CompositorResult<Self> {
        checked_texture_dims(width, height)?;
        let bytes = color
            .to_array()
            .repeat((width as usize).saturating_mul(height as usize));
        Self::from_premul_bytes(&bytes, width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when either dimension is zero; such textures are never drawn.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub(crate) fn paint(&self) -> &vello_cpu::Image {
        &self.paint
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn checked_texture_dims(width: u32, height: u32) -> CompositorResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CompositorError::validation("texture width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CompositorError::validation("texture height exceeds u16"))?;
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CompositorResult<vello_cpu::Pixmap> {
    let (w, h) = checked_texture_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CompositorError::validation("texture byte len mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/texture.rs"]
mod tests;
