//! Clamped scrolling for a centred item column

/// Scroll offset with symmetric bounds
///
/// A positive offset moves the column up, revealing later items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    offset: f32,
    min: f32,
    max: f32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute bounds for a rebuilt list and return to the centre
    pub fn rebuild(&mut self, item_count: usize, item_height: f32, viewport_height: f32) {
        let content_height = item_count as f32 * item_height;
        self.max = (content_height / 2.0 - viewport_height / 2.0).max(0.0);
        self.min = -self.max;
        self.offset = 0.0;
    }

    /// Add `delta` and clamp; returns the offset actually moved
    pub fn scroll(&mut self, delta: f32) -> f32 {
        if !delta.is_finite() {
            return 0.0;
        }
        let before = self.offset;
        self.offset = (self.offset + delta).clamp(self.min, self.max);
        self.offset - before
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Whether the list is long enough to scroll at all
    pub fn can_scroll(&self) -> bool {
        self.max > 0.0
    }
}
