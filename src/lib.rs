//! uwu-markdown - a live markdown editing surface
//!
//! Raw markdown is rendered into an annotated preview with interactive code
//! blocks and an outline of its headings. The host page is reached through
//! [`surface::PreviewSurface`]; everything else is plain Rust.

pub mod config;
pub mod editor;
pub mod error;
pub mod icons;
pub mod markdown;
pub mod message;
pub mod state;
pub mod surface;

pub use config::Config;
pub use editor::{EditorController, Effect, Runtime};
pub use error::{AppError, AppResult};
pub use markdown::{RenderPipeline, RenderState, RenderedPreview};
pub use message::Message;
pub use surface::{MemorySurface, PreviewSurface};
