//! Render pipeline
//!
//! raw text -> parser HTML -> annotated code blocks -> heading anchors ->
//! highlighting -> commit to the surface. Every call builds a fresh
//! [`RenderedPreview`]; nothing is carried over from the previous render.

use super::annotate::{AnnotatedFragment, CodeBlockAnnotator, PatternAnnotator};
use super::highlight::{default_highlighter, Highlighter};
use super::outline::{Outline, OutlinePlaceholder, TableOfContentsBuilder};
use super::parser::{MarkdownParser, PulldownParser};
use crate::config::{Config, FallbackMode};
use crate::surface::PreviewSurface;

/// Sample document rendered while the editor is empty
pub const FALLBACK_MARKDOWN: &str = r#"# markdown goes here~

## some stuff you can do
- **bold** and *italic* text
- [links](https://example.com)
- `code snippets` and blocks
- > quotes look nice too
- tables, lists, whatever

```js
// syntax highlighting works
const editor = 'pretty neat';
console.log(editor);
```

just start typing :3"#;

/// Welcome fragment committed without going through the parser
pub const STATIC_WELCOME_HTML: &str = r#"<div class="welcome"><p class="welcome-title">markdown goes here~</p><p>just start typing :3</p></div>"#;

/// Shown when no markdown parser is available
pub const PARSER_UNAVAILABLE_HTML: &str = "<p>Error: markdown parser not loaded.</p>";

/// Which branch a render took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Input was empty or whitespace
    Fallback,
    /// No parser; an inline error was committed
    ParserUnavailable,
    /// Input parsed and annotated
    Normal,
}

/// Result of one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPreview {
    pub state: RenderState,
    pub fragment: AnnotatedFragment,
    /// `None` when the outline was skipped
    pub outline: Option<Outline>,
}

impl RenderedPreview {
    /// Preview pane markup
    pub fn html(&self) -> String {
        self.fragment.to_html()
    }

    /// Outline panel markup, if an outline was built
    pub fn outline_html(&self, active: Option<usize>) -> Option<String> {
        self.outline.as_ref().map(|outline| outline.to_html(active))
    }
}

/// Orchestrates one render cycle over its collaborators
pub struct RenderPipeline {
    parser: Option<Box<dyn MarkdownParser>>,
    annotator: Box<dyn CodeBlockAnnotator>,
    highlighter: Option<Box<dyn Highlighter>>,
    fallback: FallbackMode,
    table_of_contents: bool,
}

impl RenderPipeline {
    /// Pipeline with the built-in parser and whatever highlighter this build has
    pub fn new(config: &Config) -> Self {
        Self {
            parser: Some(Box::new(PulldownParser::new())),
            annotator: Box::new(PatternAnnotator::new(config.features.block_ids)),
            highlighter: default_highlighter(),
            fallback: config.features.fallback,
            table_of_contents: config.features.table_of_contents,
        }
    }

    pub fn with_parser(mut self, parser: Option<Box<dyn MarkdownParser>>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_annotator(mut self, annotator: Box<dyn CodeBlockAnnotator>) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Option<Box<dyn Highlighter>>) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn has_parser(&self) -> bool {
        self.parser.is_some()
    }

    pub fn highlighter(&self) -> Option<&dyn Highlighter> {
        self.highlighter.as_deref()
    }

    /// Build the preview for `text` without touching any surface
    pub fn prepare(&self, text: &str) -> RenderedPreview {
        if text.trim().is_empty() {
            return self.prepare_fallback();
        }

        let Some(parser) = self.parser.as_ref() else {
            log::warn!("Markdown parser unavailable, showing inline error");
            return RenderedPreview {
                state: RenderState::ParserUnavailable,
                fragment: AnnotatedFragment::from_markup(PARSER_UNAVAILABLE_HTML),
                outline: None,
            };
        };

        let (fragment, outline) = self.process(&parser.parse(text));
        RenderedPreview {
            state: RenderState::Normal,
            fragment,
            outline: self
                .table_of_contents
                .then(|| TableOfContentsBuilder::build(outline)),
        }
    }

    /// Render `text` and commit the result to `surface`
    pub fn render<S>(&self, text: &str, surface: &mut S) -> RenderedPreview
    where
        S: PreviewSurface + ?Sized,
    {
        let preview = self.prepare(text);

        surface.commit_preview(&preview.html());
        if let Some(outline_html) = preview.outline_html(None) {
            surface.commit_outline(&outline_html);
        }

        log::debug!(
            "Rendered {} bytes as {:?}: {} code block(s), {} outline entr(ies)",
            text.len(),
            preview.state,
            preview.fragment.blocks().len(),
            preview.outline.as_ref().map_or(0, Outline::len),
        );
        preview
    }

    fn prepare_fallback(&self) -> RenderedPreview {
        let fragment = match (self.fallback, self.parser.as_ref()) {
            (FallbackMode::ParsedSample, Some(parser)) => {
                self.process(&parser.parse(FALLBACK_MARKDOWN)).0
            }
            _ => AnnotatedFragment::from_markup(STATIC_WELCOME_HTML),
        };

        RenderedPreview {
            state: RenderState::Fallback,
            fragment,
            outline: self
                .table_of_contents
                .then_some(Outline::Placeholder(OutlinePlaceholder::NotYetTyped)),
        }
    }

    fn process(&self, html: &str) -> (AnnotatedFragment, Vec<super::OutlineEntry>) {
        let mut fragment = self.annotator.annotate(html);
        let entries = TableOfContentsBuilder::anchor_headings(&mut fragment);

        if let Some(highlighter) = self.highlighter.as_deref() {
            for block in fragment.blocks_mut() {
                highlighter.highlight(block);
            }
        }

        (fragment, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockIdStrategy;
    use crate::markdown::{CodeBlock, OutlineEntry};
    use crate::surface::MemorySurface;

    fn pipeline() -> RenderPipeline {
        let mut config = Config::default();
        config.features.block_ids = BlockIdStrategy::Positional;
        RenderPipeline::new(&config).with_highlighter(None)
    }

    #[test]
    fn test_blank_input_is_always_fallback() {
        let with_parser = pipeline();
        let without_parser = pipeline().with_parser(None);
        for input in ["", "   ", "\n\t \n"] {
            assert_eq!(with_parser.prepare(input).state, RenderState::Fallback);
            assert_eq!(without_parser.prepare(input).state, RenderState::Fallback);
        }
    }

    #[test]
    fn test_parsed_sample_fallback_has_blocks_and_anchors() {
        let preview = pipeline().prepare("");
        assert_eq!(preview.fragment.blocks().len(), 1);
        assert_eq!(preview.fragment.blocks()[0].language, "js");
        assert!(preview.html().contains(r#"<h1 id="heading-0">markdown goes here~</h1>"#));
        assert_eq!(
            preview.outline,
            Some(Outline::Placeholder(OutlinePlaceholder::NotYetTyped))
        );
    }

    #[test]
    fn test_static_welcome_fallback_skips_parser() {
        let mut config = Config::default();
        config.features.fallback = FallbackMode::StaticWelcome;
        let preview = RenderPipeline::new(&config).prepare("");
        assert_eq!(preview.html(), STATIC_WELCOME_HTML);
        assert!(preview.fragment.blocks().is_empty());
    }

    #[test]
    fn test_missing_parser_degrades() {
        let preview = pipeline().with_parser(None).prepare("# Hi\n\n```\nx\n```");
        assert_eq!(preview.state, RenderState::ParserUnavailable);
        assert_eq!(preview.html(), PARSER_UNAVAILABLE_HTML);
        assert!(preview.outline.is_none());
        assert!(preview.fragment.blocks().is_empty());
    }

    #[test]
    fn test_normal_render_counts() {
        let preview = pipeline().prepare("# A\n\nno code\n\n## B\n\n```rust\nx\n```\n\n#### C");
        assert_eq!(preview.state, RenderState::Normal);
        assert_eq!(preview.fragment.blocks().len(), 1);
        assert_eq!(preview.outline.as_ref().map(Outline::len), Some(2));
    }

    #[test]
    fn test_text_without_headings_shows_no_headings() {
        let preview = pipeline().prepare("just a paragraph");
        assert_eq!(
            preview.outline,
            Some(Outline::Placeholder(OutlinePlaceholder::NoHeadings))
        );
    }

    #[test]
    fn test_outline_disabled() {
        let mut config = Config::default();
        config.features.table_of_contents = false;
        let preview = RenderPipeline::new(&config).prepare("# A");
        assert!(preview.outline.is_none());
    }

    #[test]
    fn test_render_commits_to_surface() {
        let mut surface = MemorySurface::new();
        let preview = pipeline().render("# Title\n\n```\ncode\n```", &mut surface);
        assert_eq!(surface.preview_html, preview.html());
        assert!(surface.outline_html.contains("toc-link"));
        assert!(surface.has_block("code-0"));
    }

    #[test]
    fn test_parser_unavailable_leaves_outline_panel_alone() {
        let mut surface = MemorySurface::new();
        surface.outline_html = "previous".to_string();
        pipeline().with_parser(None).render("text", &mut surface);
        assert_eq!(surface.outline_html, "previous");
    }

    #[test]
    fn test_custom_parser_is_used() {
        let parser = |text: &str| format!("<h2>{}</h2>", text.trim());
        let preview = pipeline()
            .with_parser(Some(Box::new(parser)))
            .prepare("custom");
        let entries: Vec<OutlineEntry> = preview.outline.unwrap().entries().to_vec();
        assert_eq!(entries[0].text, "custom");
        assert_eq!(entries[0].level, 2);
    }

    #[test]
    fn test_highlighter_runs_over_every_block() {
        struct Marker;
        impl Highlighter for Marker {
            fn highlight(&self, block: &mut CodeBlock) {
                block.display_markup = format!("<span>{}</span>", block.display_markup);
            }
        }

        let preview = pipeline()
            .with_highlighter(Some(Box::new(Marker)))
            .prepare("```\na\n```\n\n```\nb\n```");
        assert!(preview
            .fragment
            .blocks()
            .iter()
            .all(|b| b.display_markup.starts_with("<span>")));
        assert_eq!(preview.fragment.blocks()[1].raw_text, "b\n");
    }
}
