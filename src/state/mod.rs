//! State management module for uwu-markdown
//!
//! State types organized by concern:
//! - `scroll_state`: active outline entry, navigation chrome, frame coalescing
//! - `layout_state`: pane divider, outline drawer, editor pane visibility
//! - `session_state`: key-value persistence of the document and title

mod layout_state;
mod scroll_state;
mod session_state;

pub use layout_state::*;
pub use scroll_state::*;
pub use session_state::*;
