//! Application message types
//!
//! Defines all messages that can be sent to the editor's update function.
//! Messages are organized by category for clear handling and routing.

use crate::error::ClipboardError;

/// Main message enum
#[derive(Debug, Clone)]
pub enum Message {
    /// Input pane operations
    Editor(EditorMessage),

    /// Preview pane interactions
    Preview(PreviewMessage),

    /// Scroll, layout and drawer events
    View(ViewMessage),

    /// Timers and lifecycle
    System(SystemMessage),
}

/// Input pane messages
#[derive(Debug, Clone)]
pub enum EditorMessage {
    /// The document text was replaced (every keystroke)
    TextChanged(String),

    /// The custom title was edited
    TitleChanged(String),

    /// Explicit save request
    Save,

    /// Hide or show the input pane
    ToggleEditor,
}

/// Preview pane messages
#[derive(Debug, Clone)]
pub enum PreviewMessage {
    /// Code block header clicked
    ToggleCollapse(String),

    /// Copy button clicked
    CopyCode(String),

    /// Clipboard write finished
    CopyFinished {
        block_id: String,
        generation: u64,
        result: Result<(), ClipboardError>,
    },

    /// Copy feedback should revert to the idle icon
    CopyFeedbackExpired { block_id: String, generation: u64 },

    /// Outline link activated; carries the heading anchor id
    OutlineLinkActivated(String),
}

/// Key presses the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Scroll and layout messages
#[derive(Debug, Clone)]
pub enum ViewMessage {
    /// Window scrolled
    Scrolled,

    /// Display refresh callback
    AnimationFrame,

    /// Scroll-to-top control clicked
    ScrollToTop,

    /// Hamburger button clicked
    OpenDrawer,

    /// Drawer close button clicked
    CloseDrawer,

    /// Dimming overlay clicked
    OverlayClicked,

    /// Key pressed anywhere on the page
    KeyPressed(Key),

    /// Mouse down on the pane divider
    DividerPressed,

    /// Mouse moved anywhere on the page
    PointerMoved {
        x: f64,
        container_left: f64,
        container_width: f64,
    },

    /// Mouse released anywhere on the page
    PointerReleased,
}

/// Timer and lifecycle messages
#[derive(Debug, Clone)]
pub enum SystemMessage {
    /// Autosave interval elapsed
    AutosaveTick,

    /// Stop the event loop
    Shutdown,
}

impl From<EditorMessage> for Message {
    fn from(message: EditorMessage) -> Self {
        Message::Editor(message)
    }
}

impl From<PreviewMessage> for Message {
    fn from(message: PreviewMessage) -> Self {
        Message::Preview(message)
    }
}

impl From<ViewMessage> for Message {
    fn from(message: ViewMessage) -> Self {
        Message::View(message)
    }
}

impl From<SystemMessage> for Message {
    fn from(message: SystemMessage) -> Self {
        Message::System(message)
    }
}
