use crate::foundation::core::Rect;
use crate::foundation::error::{CompositorError, CompositorResult};
use crate::render::context::DrawContext;

/// Host drawing surface record: an id plus physical and display sizes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    /// Identifier tagged on attach; `None` while detached.
    pub id: Option<String>,
    /// Backing store width in physical pixels.
    pub pixel_width: u32,
    /// Backing store height in physical pixels.
    pub pixel_height: u32,
    /// Width in display units.
    pub display_width: u32,
    /// Height in display units.
    pub display_height: u32,
}

impl Surface {
    /// An untagged surface whose display size equals its pixel size.
    pub fn new(pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            id: None,
            pixel_width,
            pixel_height,
            display_width: pixel_width,
            display_height: pixel_height,
        }
    }
}

/// Host display tree that attached surfaces are appended to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostContainer {
    children: Vec<String>,
}

impl HostContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a surface id.
    pub fn append_child(&mut self, id: impl Into<String>) {
        self.children.push(id.into());
    }

    /// Whether a surface with `id` was appended.
    pub fn contains(&self, id: &str) -> bool {
        self.children.iter().any(|c| c == id)
    }

    /// Appended ids in order.
    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// A surface, the drawing context sized to it, and the logical viewport.
#[derive(Debug)]
pub struct RenderTarget<C> {
    surface: Surface,
    ctx: C,
    viewport: Rect,
    device_pixel_ratio: f64,
}

impl<C: DrawContext> RenderTarget<C> {
    /// Tag `surface` with `id`, append it to `host` and create a context of the surface's size.
    pub fn attach(
        mut surface: Surface,
        host: &mut HostContainer,
        id: &str,
        device_pixel_ratio: f64,
    ) -> CompositorResult<Self> {
        if let Some(existing) = &surface.id {
            return Err(CompositorError::lifecycle(format!(
                "surface is already attached as \"{existing}\""
            )));
        }
        let ctx = C::create(surface.pixel_width, surface.pixel_height)?;
        surface.id = Some(id.to_owned());
        host.append_child(id);
        Ok(Self {
            viewport: Rect::new(
                0.0,
                0.0,
                f64::from(surface.pixel_width),
                f64::from(surface.pixel_height),
            ),
            surface,
            ctx,
            device_pixel_ratio,
        })
    }

    /// Resize the backing store to `width x height` pixels and derive the display size.
    ///
    /// The context is reset, so any frame in progress is lost.
    pub fn resize(&mut self, width: u32, height: u32) -> CompositorResult<()> {
        self.ctx.resize(width, height)?;
        self.surface.pixel_width = width;
        self.surface.pixel_height = height;
        self.surface.display_width = display_dim(width, self.device_pixel_ratio);
        self.surface.display_height = display_dim(height, self.device_pixel_ratio);
        self.viewport = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Logical drawing area, `(0, 0, pixel_width, pixel_height)`.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }
}

fn display_dim(pixels: u32, device_pixel_ratio: f64) -> u32 {
    (f64::from(pixels) / device_pixel_ratio).ceil() as u32
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
