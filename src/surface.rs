//! Host page boundary
//!
//! The preview pane, outline panel and chrome live in a host page (a browser
//! DOM in production). Everything the editing logic needs from that page
//! goes through [`PreviewSurface`]. [`MemorySurface`] keeps the same state in
//! plain fields for headless use and tests.
//!
//! Interaction hooks in the committed markup are `data-action` attributes
//! (`toggle-collapse`, `copy-code`, `outline-jump`) rather than links. The
//! host delegates clicks on them to the matching messages and suppresses
//! the element's default action, so activating an outline entry never
//! navigates or rewrites the location.

use crate::config::LayoutConfig;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Visual state of a copy button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyFeedback {
    #[default]
    Idle,
    Copied,
    Failed,
}

impl CopyFeedback {
    /// Icon markup shown on the button
    pub fn icon(&self) -> &'static str {
        match self {
            CopyFeedback::Idle => crate::icons::COPY,
            CopyFeedback::Copied => crate::icons::COPIED,
            CopyFeedback::Failed => crate::icons::COPY_FAILED,
        }
    }
}

/// Scroll-driven navigation chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChromeState {
    /// Logo docked into the navbar and navbar opaque
    pub navbar_mode: bool,
    /// Scroll-to-top control shown
    pub scroll_to_top_visible: bool,
}

/// Operations the editing logic performs on the host page.
///
/// Methods that address a code block return `false` when the block no
/// longer exists, so callers can treat stale ids as a no-op.
pub trait PreviewSurface {
    /// Replace the preview pane content
    fn commit_preview(&mut self, html: &str);

    /// Replace the outline panel content
    fn commit_outline(&mut self, html: &str);

    /// Absolute top offsets of the live h1-h3 elements in document order
    fn heading_tops(&self) -> Vec<f64>;

    /// Absolute top offset of the element with this id
    fn element_top(&self, id: &str) -> Option<f64>;

    /// Current vertical scroll offset
    fn scroll_offset(&self) -> f64;

    /// Measured navbar height, or 0 when the host cannot measure it
    fn navbar_height(&self) -> f64;

    /// Measured hero banner height
    fn hero_height(&self) -> f64;

    /// Smoothly scroll the page to `top`
    fn scroll_to(&mut self, top: f64);

    /// Highlight one outline link, or none
    fn set_active_outline_entry(&mut self, index: Option<usize>);

    fn set_block_collapsed(&mut self, block_id: &str, collapsed: bool) -> bool;

    fn set_copy_feedback(&mut self, block_id: &str, feedback: CopyFeedback) -> bool;

    fn set_chrome(&mut self, chrome: ChromeState);

    fn set_input_pane_width(&mut self, percent: f64);

    fn set_resize_cursor(&mut self, resizing: bool);

    fn set_drawer_open(&mut self, open: bool);

    fn set_editor_visible(&mut self, visible: bool);
}

fn block_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"id="content-([^"]+)""#).expect("block id pattern is valid")
    })
}

/// In-memory surface with settable geometry
#[derive(Debug, Clone)]
pub struct MemorySurface {
    pub preview_html: String,
    pub outline_html: String,
    pub heading_tops: Vec<f64>,
    pub element_tops: HashMap<String, f64>,
    pub scroll_offset: f64,
    pub navbar_height: f64,
    pub hero_height: f64,
    pub active_outline_entry: Option<usize>,
    pub collapsed: HashMap<String, bool>,
    pub copy_feedback: HashMap<String, CopyFeedback>,
    /// Every feedback change in order
    pub feedback_history: Vec<(String, CopyFeedback)>,
    pub chrome: ChromeState,
    pub input_pane_width: Option<f64>,
    pub resize_cursor: bool,
    pub drawer_open: bool,
    pub editor_visible: bool,
    /// Programmatic scrolls in order
    pub scrolls: Vec<f64>,
    pub preview_commits: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::from_layout(&LayoutConfig::default())
    }

    /// Surface whose chrome is sized from the layout config
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            preview_html: String::new(),
            outline_html: String::new(),
            heading_tops: Vec::new(),
            element_tops: HashMap::new(),
            scroll_offset: 0.0,
            navbar_height: layout.navbar_height,
            hero_height: 0.0,
            active_outline_entry: None,
            collapsed: HashMap::new(),
            copy_feedback: HashMap::new(),
            feedback_history: Vec::new(),
            chrome: ChromeState::default(),
            input_pane_width: None,
            resize_cursor: false,
            drawer_open: false,
            editor_visible: true,
            scrolls: Vec::new(),
            preview_commits: 0,
        }
    }

    /// Lay headings out at the given offsets, naming them `heading-{n}`
    pub fn set_heading_tops(&mut self, tops: &[f64]) {
        self.heading_tops = tops.to_vec();
        self.element_tops = tops
            .iter()
            .enumerate()
            .map(|(i, top)| (crate::markdown::anchor_id(i), *top))
            .collect();
    }

    pub fn has_block(&self, block_id: &str) -> bool {
        self.collapsed.contains_key(block_id)
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewSurface for MemorySurface {
    fn commit_preview(&mut self, html: &str) {
        self.preview_html = html.to_string();
        self.preview_commits += 1;
        self.collapsed = block_id_pattern()
            .captures_iter(html)
            .map(|caps| (caps[1].to_string(), false))
            .collect();
        self.copy_feedback.clear();
    }

    fn commit_outline(&mut self, html: &str) {
        self.outline_html = html.to_string();
        self.active_outline_entry = None;
    }

    fn heading_tops(&self) -> Vec<f64> {
        self.heading_tops.clone()
    }

    fn element_top(&self, id: &str) -> Option<f64> {
        self.element_tops.get(id).copied()
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn navbar_height(&self) -> f64 {
        self.navbar_height
    }

    fn hero_height(&self) -> f64 {
        self.hero_height
    }

    fn scroll_to(&mut self, top: f64) {
        self.scrolls.push(top);
        self.scroll_offset = top;
    }

    fn set_active_outline_entry(&mut self, index: Option<usize>) {
        self.active_outline_entry = index;
    }

    fn set_block_collapsed(&mut self, block_id: &str, collapsed: bool) -> bool {
        match self.collapsed.get_mut(block_id) {
            Some(state) => {
                *state = collapsed;
                true
            }
            None => false,
        }
    }

    fn set_copy_feedback(&mut self, block_id: &str, feedback: CopyFeedback) -> bool {
        if !self.has_block(block_id) {
            return false;
        }
        self.copy_feedback.insert(block_id.to_string(), feedback);
        self.feedback_history.push((block_id.to_string(), feedback));
        true
    }

    fn set_chrome(&mut self, chrome: ChromeState) {
        self.chrome = chrome;
    }

    fn set_input_pane_width(&mut self, percent: f64) {
        self.input_pane_width = Some(percent);
    }

    fn set_resize_cursor(&mut self, resizing: bool) {
        self.resize_cursor = resizing;
    }

    fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }

    fn set_editor_visible(&mut self, visible: bool) {
        self.editor_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_discovers_blocks() {
        let mut surface = MemorySurface::new();
        surface.commit_preview(r#"<div id="content-code-a"></div><div id="content-code-b"></div>"#);
        assert!(surface.has_block("code-a"));
        assert!(surface.set_block_collapsed("code-b", true));
        assert!(!surface.set_block_collapsed("code-z", true));
        assert!(!surface.set_copy_feedback("code-z", CopyFeedback::Copied));
    }

    #[test]
    fn test_recommit_forgets_old_blocks() {
        let mut surface = MemorySurface::new();
        surface.commit_preview(r#"<div id="content-code-a"></div>"#);
        surface.commit_preview("<p>no code</p>");
        assert!(!surface.has_block("code-a"));
    }

    #[test]
    fn test_navbar_height_comes_from_layout() {
        let layout = LayoutConfig {
            navbar_height: 48.0,
            ..LayoutConfig::default()
        };
        assert_eq!(MemorySurface::from_layout(&layout).navbar_height(), 48.0);
        assert_eq!(
            MemorySurface::new().navbar_height(),
            crate::config::DEFAULT_NAVBAR_HEIGHT
        );
    }

    #[test]
    fn test_scroll_to_moves_offset() {
        let mut surface = MemorySurface::new();
        surface.scroll_to(300.0);
        assert_eq!(surface.scroll_offset(), 300.0);
        assert_eq!(surface.scrolls, [300.0]);
    }

    #[test]
    fn test_feedback_icons() {
        assert_eq!(CopyFeedback::default(), CopyFeedback::Idle);
        assert_ne!(CopyFeedback::Copied.icon(), CopyFeedback::Failed.icon());
    }
}
