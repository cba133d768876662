//! Editor module for uwu-markdown
//!
//! Contains the interactive side of the editing surface:
//! - `controller`: document state and message handling
//! - `clipboard`: clipboard writers and copy feedback generations
//! - `runtime`: tokio event loop executing controller effects

pub mod clipboard;
pub mod controller;
pub mod runtime;

pub use clipboard::{
    write_text_async, ClipboardWriter, CopyFeedbackTracker, RecordingClipboard, SystemClipboard,
};
pub use controller::{EditorController, Effect};
pub use runtime::Runtime;
