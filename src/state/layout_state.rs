//! Layout state
//!
//! Pane divider dragging, the outline drawer and the editor pane toggle.

use crate::config::LayoutConfig;

/// Input pane width for a pointer position, clamped to `[min, max]` percent.
///
/// Returns `None` for a container without a usable width.
pub fn pane_percent(
    pointer_x: f64,
    container_left: f64,
    container_width: f64,
    min: f64,
    max: f64,
) -> Option<f64> {
    if !(container_width.is_finite() && container_width > 0.0)
        || !pointer_x.is_finite()
        || !container_left.is_finite()
    {
        return None;
    }
    let percent = (pointer_x - container_left) / container_width * 100.0;
    Some(percent.clamp(min, max))
}

/// Draggable divider between the input and preview panes
#[derive(Debug, Clone)]
pub struct PaneResizer {
    resizing: bool,
    width_percent: f64,
    min_percent: f64,
    max_percent: f64,
}

impl PaneResizer {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            resizing: false,
            width_percent: 50.0,
            min_percent: layout.min_pane_percent,
            max_percent: layout.max_pane_percent,
        }
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    pub fn width_percent(&self) -> f64 {
        self.width_percent
    }

    /// Mouse down on the divider
    pub fn begin(&mut self) {
        self.resizing = true;
    }

    /// Pointer moved; returns the new width while a drag is active
    pub fn drag(
        &mut self,
        pointer_x: f64,
        container_left: f64,
        container_width: f64,
    ) -> Option<f64> {
        if !self.resizing {
            return None;
        }
        let percent = pane_percent(
            pointer_x,
            container_left,
            container_width,
            self.min_percent,
            self.max_percent,
        )?;
        self.width_percent = percent;
        Some(percent)
    }

    /// Mouse up anywhere; returns whether a drag was in progress
    pub fn end(&mut self) -> bool {
        std::mem::replace(&mut self.resizing, false)
    }
}

/// Outline drawer with its dimming overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawerState {
    open: bool,
}

impl DrawerState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns whether the state changed
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.open, true)
    }

    /// Returns whether the state changed
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// All layout state owned by the editor
#[derive(Debug, Clone)]
pub struct LayoutState {
    pub resizer: PaneResizer,
    pub drawer: DrawerState,
    pub editor_visible: bool,
}

impl LayoutState {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            resizer: PaneResizer::new(layout),
            drawer: DrawerState::default(),
            editor_visible: true,
        }
    }

    /// Flip editor pane visibility, returning the new value
    pub fn toggle_editor(&mut self) -> bool {
        self.editor_visible = !self.editor_visible;
        self.editor_visible
    }
}
