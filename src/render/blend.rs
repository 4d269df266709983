use serde::{Deserialize, Serialize};

/// Pixel compositing operator applied when a node is drawn over existing content.
///
/// The discriminant is the stable integer id scene graphs store; [`BLEND_MODE_NAMES`] maps it
/// to the host compositing-operation name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal = 0,
    /// Additive (`lighter`).
    Add = 1,
    /// Punch the source shape out of the destination.
    Erase = 2,
    /// Keep the destination only where the source is opaque.
    Alpha = 3,
    Multiply = 4,
    Screen = 5,
    Overlay = 6,
    Darken = 7,
    Lighten = 8,
    ColorDodge = 9,
    ColorBurn = 10,
    HardLight = 11,
    SoftLight = 12,
    Difference = 13,
    Exclusion = 14,
    Hue = 15,
    Saturation = 16,
    Color = 17,
    Luminosity = 18,
}

/// Host compositing-operation names, indexed by [`BlendMode`] id.
pub const BLEND_MODE_NAMES: [&str; 19] = [
    "source-over",
    "lighter",
    "destination-out",
    "destination-in",
    "multiply",
    "screen",
    "overlay",
    "darken",
    "lighten",
    "color-dodge",
    "color-burn",
    "hard-light",
    "soft-light",
    "difference",
    "exclusion",
    "hue",
    "saturation",
    "color",
    "luminosity",
];

const ALL: [BlendMode; 19] = [
    BlendMode::Normal,
    BlendMode::Add,
    BlendMode::Erase,
    BlendMode::Alpha,
    BlendMode::Multiply,
    BlendMode::Screen,
    BlendMode::Overlay,
    BlendMode::Darken,
    BlendMode::Lighten,
    BlendMode::ColorDodge,
    BlendMode::ColorBurn,
    BlendMode::HardLight,
    BlendMode::SoftLight,
    BlendMode::Difference,
    BlendMode::Exclusion,
    BlendMode::Hue,
    BlendMode::Saturation,
    BlendMode::Color,
    BlendMode::Luminosity,
];

impl BlendMode {
    /// Look up a mode by its integer id.
    pub fn from_id(id: u8) -> Option<Self> {
        ALL.get(usize::from(id)).copied()
    }

    /// Look up a mode by its host compositing-operation name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLEND_MODE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| ALL[i])
    }

    /// Stable integer id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Host compositing-operation name, e.g. `"source-over"`.
    pub fn operation_name(self) -> &'static str {
        BLEND_MODE_NAMES[usize::from(self.id())]
    }

    /// The raster backend's side of [`BLEND_MODE_NAMES`]: each host operation name resolves to
    /// the `Mix`/`Compose` pair that produces it (`lighter` is `Plus`, `destination-out` is
    /// `DestOut`, separable and non-separable modes composite source-over).
    pub(crate) fn to_peniko(self) -> vello_cpu::peniko::BlendMode {
        use vello_cpu::peniko::{BlendMode as PenikoBlend, Compose, Mix};

        let (mix, compose) = match self {
            Self::Normal => (Mix::Normal, Compose::SrcOver),
            Self::Add => (Mix::Normal, Compose::Plus),
            Self::Erase => (Mix::Normal, Compose::DestOut),
            Self::Alpha => (Mix::Normal, Compose::DestIn),
            Self::Multiply => (Mix::Multiply, Compose::SrcOver),
            Self::Screen => (Mix::Screen, Compose::SrcOver),
            Self::Overlay => (Mix::Overlay, Compose::SrcOver),
            Self::Darken => (Mix::Darken, Compose::SrcOver),
            Self::Lighten => (Mix::Lighten, Compose::SrcOver),
            Self::ColorDodge => (Mix::ColorDodge, Compose::SrcOver),
            Self::ColorBurn => (Mix::ColorBurn, Compose::SrcOver),
            Self::HardLight => (Mix::HardLight, Compose::SrcOver),
            Self::SoftLight => (Mix::SoftLight, Compose::SrcOver),
            Self::Difference => (Mix::Difference, Compose::SrcOver),
            Self::Exclusion => (Mix::Exclusion, Compose::SrcOver),
            Self::Hue => (Mix::Hue, Compose::SrcOver),
            Self::Saturation => (Mix::Saturation, Compose::SrcOver),
            Self::Color => (Mix::Color, Compose::SrcOver),
            Self::Luminosity => (Mix::Luminosity, Compose::SrcOver),
        };
        PenikoBlend::new(mix, compose)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
