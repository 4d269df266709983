use crate::render::blend::BlendMode;

/// Alpha and blend mode as last written to the drawing context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceState {
    /// Last applied global alpha.
    pub alpha: f32,
    /// Last applied blend mode.
    pub blend_mode: BlendMode,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// Remembers the device state of one render target so redundant writes can be skipped.
///
/// The tracker mirrors the context's save/restore stack: a mask scope that overrides alpha is
/// undone on restore, and the tracker must undo it too or the next draw would skip a needed
/// write.
#[derive(Clone, Debug, Default)]
pub struct StateTracker {
    current: DeviceState,
    saved: Vec<DeviceState>,
}

impl StateTracker {
    /// A tracker matching a freshly reset context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; the context was reset to defaults.
    pub fn reset(&mut self) {
        self.current = DeviceState::default();
        self.saved.clear();
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> DeviceState {
        self.current
    }

    /// Record `alpha`; returns `true` when the context needs the write.
    pub fn apply_alpha(&mut self, alpha: f32) -> bool {
        if self.current.alpha == alpha {
            return false;
        }
        self.current.alpha = alpha;
        true
    }

    /// Record `mode`; returns `true` when the context needs the write.
    pub fn apply_blend_mode(&mut self, mode: BlendMode) -> bool {
        if self.current.blend_mode == mode {
            return false;
        }
        self.current.blend_mode = mode;
        true
    }

    /// Mirror a context save.
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Mirror a context restore. Unbalanced restores leave the snapshot alone.
    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    /// Number of mirrored saves.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/state.rs"]
mod tests;
