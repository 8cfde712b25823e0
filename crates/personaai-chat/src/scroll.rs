/// Distance from the bottom, in pixels, within which the view still
/// follows new content.
pub const SCROLL_THRESHOLD_PX: f64 = 60.0;

/// Tracks whether the reader was near the bottom of the scroll region
/// before new content arrived. Only then does the view auto-scroll, so a
/// reader who scrolled up to read history is never yanked back down.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    near_bottom: bool,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        // A fresh view sits at the bottom
        Self { near_bottom: true }
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the scroll position observed before a content update.
    pub fn observe(&mut self, scroll_top: f64, viewport_height: f64, content_height: f64) {
        self.near_bottom = content_height - scroll_top - viewport_height < SCROLL_THRESHOLD_PX;
    }

    /// Whether the next content update should scroll the newest message
    /// into view.
    pub fn should_follow(&self) -> bool {
        self.near_bottom
    }
}
