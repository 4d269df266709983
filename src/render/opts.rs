use crate::foundation::error::{CompositorError, CompositorResult};

/// Identifier written onto surfaces attached by [`crate::CanvasRenderer::init`].
pub const DEFAULT_SURFACE_ID: &str = "compositor_canvas";

/// Environment variable overriding the device pixel ratio.
pub const ENV_DEVICE_PIXEL_RATIO: &str = "COMPOSITOR_DEVICE_PIXEL_RATIO";

/// Environment variable enabling the bounds debug overlay.
pub const ENV_DEBUG_BOUNDS: &str = "COMPOSITOR_DEBUG_BOUNDS";

/// Options for a [`crate::CanvasRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOpts {
    pub(crate) device_pixel_ratio: f64,
    pub(crate) surface_id: String,
    pub(crate) debug_bounds: bool,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            surface_id: DEFAULT_SURFACE_ID.to_owned(),
            debug_bounds: false,
        }
    }
}

impl RendererOpts {
    /// Ratio between physical surface pixels and display pixels.
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Identifier tagged onto the attached surface.
    pub fn with_surface_id(mut self, id: impl Into<String>) -> Self {
        self.surface_id = id.into();
        self
    }

    /// Stroke each drawn node's bounds after blitting it.
    pub fn with_debug_bounds(mut self, enabled: bool) -> Self {
        self.debug_bounds = enabled;
        self
    }

    /// Configured device pixel ratio.
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Configured surface identifier.
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// Whether the bounds overlay is enabled.
    pub fn debug_bounds(&self) -> bool {
        self.debug_bounds
    }

    /// Defaults overridden by `COMPOSITOR_DEVICE_PIXEL_RATIO` and `COMPOSITOR_DEBUG_BOUNDS`.
    pub fn from_env() -> CompositorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`RendererOpts::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CompositorResult<Self> {
        let mut opts = Self::default();
        if let Some(raw) = lookup(ENV_DEVICE_PIXEL_RATIO) {
            opts.device_pixel_ratio = raw.trim().parse::<f64>().map_err(|_| {
                CompositorError::validation(format!("{ENV_DEVICE_PIXEL_RATIO}: invalid number \"{raw}\""))
            })?;
        }
        if let Some(raw) = lookup(ENV_DEBUG_BOUNDS) {
            opts.debug_bounds = parse_flag(&raw).ok_or_else(|| {
                CompositorError::validation(format!("{ENV_DEBUG_BOUNDS}: invalid flag \"{raw}\""))
            })?;
        }
        opts.validate()?;
        Ok(opts)
    }

    /// Check option invariants.
    pub fn validate(&self) -> CompositorResult<()> {
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(CompositorError::validation(
                "device pixel ratio must be finite and > 0",
            ));
        }
        if self.surface_id.trim().is_empty() {
            return Err(CompositorError::validation("surface id must be non-empty"));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/opts.rs"]
mod tests;
