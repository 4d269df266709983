/// Result alias used throughout the crate.
pub type CompositorResult<T> = Result<T, CompositorError>;

/// Errors reported by the compositor.
///
/// Skippable conditions (a node without a texture, a zero-sized texture) are never errors.
/// `Lifecycle` covers caller contract violations such as drawing outside a frame or calling into a
/// destroyed renderer.
#[derive(thiserror::Error, Debug)]
pub enum CompositorError {
    /// Invalid dimensions or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// A call made in the wrong lifecycle or frame state.
    #[error("lifecycle error: {0}")]
    Lifecycle(String),

    /// A color string the host syntax does not accept.
    #[error("color error: {0}")]
    Color(String),

    /// Failure reported by a collaborator (image export, IO).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompositorError {
    /// Build a [`CompositorError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CompositorError::Lifecycle`].
    pub fn lifecycle(msg: impl Into<String>) -> Self {
        Self::Lifecycle(msg.into())
    }

    /// Build a [`CompositorError::Color`].
    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }

    /// Return `true` for caller contract violations.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Lifecycle(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
