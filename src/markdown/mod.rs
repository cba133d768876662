//! Markdown module for uwu-markdown
//!
//! Turns editor text into interactive preview markup:
//! - Parsing (delegated to a parser collaborator)
//! - Code block annotation (collapse, copy, language label)
//! - Table of contents with document-order anchors
//! - Optional syntax highlighting
//! - Standalone HTML export

pub mod annotate;
pub mod entities;
pub mod export;
pub mod highlight;
pub mod outline;
pub mod parser;
pub mod pipeline;

pub use annotate::{
    AnnotatedFragment, CodeBlock, CodeBlockAnnotator, PatternAnnotator, Segment,
    PLAIN_TEXT_LANGUAGE,
};
pub use export::{HtmlExportOptions, PreviewExporter};
pub use highlight::{default_highlighter, Highlighter};
pub use outline::{
    anchor_id, scroll_target, Outline, OutlineEntry, OutlinePlaceholder, TableOfContentsBuilder,
};
pub use parser::{MarkdownParser, PulldownParser};
pub use pipeline::{RenderPipeline, RenderState, RenderedPreview};
