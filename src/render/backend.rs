use crate::foundation::core::unpremul_channel;
use crate::foundation::error::{CompositorError, CompositorResult};

/// A read-back frame as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha** by default; the `premultiplied` flag makes that explicit at
/// API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// The pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert into a straight-alpha `image` buffer, e.g. for PNG dumps.
    pub fn to_rgba_image(&self) -> CompositorResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let a = px[3];
                px[0] = unpremul_channel(px[0], a);
                px[1] = unpremul_channel(px[1], a);
                px[2] = unpremul_channel(px[2], a);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| CompositorError::validation("frame byte len mismatch"))
    }

    /// Write the frame as a PNG file.
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> CompositorResult<()> {
        let path = path.as_ref();
        self.to_rgba_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| {
                CompositorError::Other(anyhow::anyhow!(
                    "failed to write png '{}': {e}",
                    path.display()
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
