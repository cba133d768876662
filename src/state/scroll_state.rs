//! Scroll-driven state
//!
//! Active outline tracking and navigation chrome are recomputed from live
//! geometry on every frame. Scroll notifications only raise a pending flag;
//! the frame callback clears it, so a burst of scrolls costs one recompute.

use crate::config::LayoutConfig;
use crate::surface::ChromeState;

/// Index of the last heading whose top the scroll offset has reached.
///
/// A heading counts as reached once `scroll_offset >= top - threshold`.
/// Returns `None` while above the first heading.
pub fn active_heading_index(
    heading_tops: &[f64],
    scroll_offset: f64,
    threshold: f64,
) -> Option<usize> {
    heading_tops
        .iter()
        .rposition(|&top| scroll_offset >= top - threshold)
}

/// Navbar mode and scroll-to-top visibility for a scroll offset
pub fn chrome_for(scroll_offset: f64, hero_height: f64, layout: &LayoutConfig) -> ChromeState {
    ChromeState {
        navbar_mode: scroll_offset > hero_height * layout.navbar_threshold_ratio,
        scroll_to_top_visible: scroll_offset > hero_height * layout.scroll_to_top_ratio,
    }
}

/// Where the scroll-to-top control scrolls: just past the hero
pub fn scroll_to_top_target(hero_height: f64, navbar_height: f64) -> f64 {
    (hero_height - navbar_height).max(0.0)
}

/// Collapses bursts of scroll events into one frame request
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCoalescer {
    pending: bool,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a scroll; returns `true` if a frame must be requested
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Called from the frame callback; returns whether work was pending
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Everything the frame callback maintains
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub frames: FrameCoalescer,
    pub active_entry: Option<usize>,
    pub chrome: ChromeState,
    /// Number of recomputes performed
    pub recomputes: u64,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute from scratch. Returns `(active_changed, chrome_changed)`.
    pub fn recompute(
        &mut self,
        heading_tops: &[f64],
        scroll_offset: f64,
        hero_height: f64,
        layout: &LayoutConfig,
    ) -> (bool, bool) {
        self.recomputes += 1;

        let active =
            active_heading_index(heading_tops, scroll_offset, layout.active_heading_threshold);
        let chrome = chrome_for(scroll_offset, hero_height, layout);

        let active_changed = active != self.active_entry;
        let chrome_changed = chrome != self.chrome;
        self.active_entry = active;
        self.chrome = chrome;
        (active_changed, chrome_changed)
    }

    /// Forget the active entry after the outline is rebuilt
    pub fn reset_active(&mut self) {
        self.active_entry = None;
    }
}
