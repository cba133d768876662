//! Code block annotation
//!
//! Rewrites the `<pre><code>` blocks emitted by the parser into interactive
//! wrappers with a language label, a collapse toggle and a copy button.
//! The rewrite is a best-effort pattern match over the parser output: fences
//! it does not recognise are passed through untouched.

use super::entities::{decode_entities, escape_attribute, escape_text};
use crate::config::BlockIdStrategy;
use crate::icons;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Language shown when a fence has no tag
pub const PLAIN_TEXT_LANGUAGE: &str = "text";

/// Length of the random part of a block id
const RANDOM_ID_LEN: usize = 7;

fn code_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#)
            .expect("code block pattern is valid")
    })
}

/// One code region found in a rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Identifier unique within one annotation pass
    pub id: String,
    /// Declared fence language or [`PLAIN_TEXT_LANGUAGE`]
    pub language: String,
    /// Escaped body shown inside `<code>`; the highlighter may replace it
    pub display_markup: String,
    /// Body with entities decoded, exactly what a copy puts on the clipboard
    pub raw_text: String,
    /// Presentational only
    pub collapsed: bool,
    /// Body as the parser escaped it, embedded in `data-raw-code`
    source_markup: String,
}

impl CodeBlock {
    fn new(id: String, language: String, escaped_body: &str) -> Self {
        Self {
            id,
            language,
            display_markup: escaped_body.to_string(),
            raw_text: decode_entities(escaped_body),
            collapsed: false,
            source_markup: escaped_body.to_string(),
        }
    }

    /// Flip the collapsed flag, returning the new value
    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    /// Write the wrapper markup for this block
    pub fn write_html(&self, out: &mut String) {
        let id = &self.id;
        let language = escape_text(&self.language);
        let collapsed = if self.collapsed { " collapsed" } else { "" };
        let max_height = if self.collapsed {
            r#" style="max-height: 0px""#
        } else {
            ""
        };

        let _ = write!(
            out,
            r#"
<div class="code-block" data-code-block-id="{id}">
    <div class="code-header" data-action="toggle-collapse" data-code-block-id="{id}">
        <div class="code-header-left">
            <div class="collapse-arrow{collapsed}" id="arrow-{id}"></div>
            <span class="language-label">{language}</span>
        </div>
        <button class="copy-button" data-action="copy-code" data-code-block-id="{id}" title="Copy code">{icon}</button>
    </div>
    <div class="code-content{collapsed}" id="content-{id}"{max_height} data-raw-code="{raw}">
        <pre><code class="language-{language}">{display}</code></pre>
    </div>
</div>
"#,
            icon = icons::COPY,
            raw = escape_attribute(&self.source_markup),
            display = self.display_markup,
        );
    }
}

/// A piece of an annotated fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Untouched parser markup
    Markup(String),
    /// Index into [`AnnotatedFragment::blocks`]
    Block(usize),
}

/// Parser output with its code blocks lifted out into [`CodeBlock`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedFragment {
    segments: Vec<Segment>,
    blocks: Vec<CodeBlock>,
}

impl AnnotatedFragment {
    /// A fragment with no code blocks
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Markup(markup.into())],
            blocks: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn blocks(&self) -> &[CodeBlock] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [CodeBlock] {
        &mut self.blocks
    }

    pub fn block(&self, id: &str) -> Option<&CodeBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut CodeBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Non-code markup in document order
    pub fn markup_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Markup(markup) => Some(markup),
            Segment::Block(_) => None,
        })
    }

    /// Serialise back into a single HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markup(markup) => out.push_str(markup),
                Segment::Block(index) => {
                    if let Some(block) = self.blocks.get(*index) {
                        block.write_html(&mut out);
                    }
                }
            }
        }
        out
    }
}

/// Turns parser HTML into an [`AnnotatedFragment`].
///
/// Callers only depend on this trait, so the pattern-based rewrite can be
/// swapped for a tree transform.
pub trait CodeBlockAnnotator {
    fn annotate(&self, html: &str) -> AnnotatedFragment;
}

/// Regex-based annotator over `<pre><code>` output
#[derive(Debug, Clone, Default)]
pub struct PatternAnnotator {
    strategy: BlockIdStrategy,
}

impl PatternAnnotator {
    pub fn new(strategy: BlockIdStrategy) -> Self {
        Self { strategy }
    }
}

impl CodeBlockAnnotator for PatternAnnotator {
    fn annotate(&self, html: &str) -> AnnotatedFragment {
        let mut ids = BlockIdGenerator::new(self.strategy);
        let mut fragment = AnnotatedFragment::default();
        let mut last_end = 0;

        for captures in code_block_pattern().captures_iter(html) {
            let Some(whole) = captures.get(0) else {
                continue;
            };

            if whole.start() > last_end {
                fragment
                    .segments
                    .push(Segment::Markup(html[last_end..whole.start()].to_string()));
            }

            let language = captures
                .get(1)
                .map(|m| decode_entities(m.as_str()))
                .filter(|lang| !lang.is_empty())
                .unwrap_or_else(|| PLAIN_TEXT_LANGUAGE.to_string());
            let body = captures.get(2).map_or("", |m| m.as_str());

            fragment.segments.push(Segment::Block(fragment.blocks.len()));
            fragment
                .blocks
                .push(CodeBlock::new(ids.next_id(), language, body));

            last_end = whole.end();
        }

        if last_end < html.len() || fragment.segments.is_empty() {
            fragment
                .segments
                .push(Segment::Markup(html[last_end..].to_string()));
        }

        log::trace!("Annotated {} code block(s)", fragment.blocks.len());
        fragment
    }
}

/// Issues block ids for a single annotation pass
struct BlockIdGenerator {
    strategy: BlockIdStrategy,
    issued: HashSet<String>,
}

impl BlockIdGenerator {
    fn new(strategy: BlockIdStrategy) -> Self {
        Self {
            strategy,
            issued: HashSet::new(),
        }
    }

    fn next_id(&mut self) -> String {
        loop {
            let candidate = match self.strategy {
                BlockIdStrategy::Random => {
                    let token = uuid::Uuid::new_v4().simple().to_string();
                    format!("code-{}", &token[..RANDOM_ID_LEN])
                }
                BlockIdStrategy::Positional => format!("code-{}", self.issued.len()),
            };
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{MarkdownParser, PulldownParser};

    fn annotate(markdown: &str) -> AnnotatedFragment {
        let html = PulldownParser::new().parse(markdown);
        PatternAnnotator::new(BlockIdStrategy::Random).annotate(&html)
    }

    #[test]
    fn test_one_wrapper_per_block_with_distinct_ids() {
        let markdown = "```js\na\n```\n\ntext\n\n```\nb\n```\n\n    indented\n\n```py\nc\n```\n";
        let fragment = annotate(markdown);
        assert_eq!(fragment.blocks().len(), 4);

        let ids: HashSet<_> = fragment.blocks().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids.len(), 4);

        let html = fragment.to_html();
        assert_eq!(html.matches(r#"<div class="code-block""#).count(), 4);
        assert!(html.contains("<p>text</p>"));
    }

    #[test]
    fn test_language_defaults_to_text() {
        let fragment = annotate("```\nplain\n```\n\n```rust\nfn main() {}\n```");
        assert_eq!(fragment.blocks()[0].language, PLAIN_TEXT_LANGUAGE);
        assert_eq!(fragment.blocks()[1].language, "rust");
        assert!(fragment
            .to_html()
            .contains(r#"<span class="language-label">text</span>"#));
    }

    #[test]
    fn test_raw_text_matches_source_exactly() {
        let body = "if a && b { println!(\"<tag> & 'quote'\"); }\nlet s = \"&amp;\";\n";
        let fragment = annotate(&format!("```rust\n{}```\n", body));
        assert_eq!(fragment.blocks()[0].raw_text, body);
    }

    #[test]
    fn test_raw_code_attribute_stays_well_formed() {
        let fragment = annotate("```\nsay \"hi\" & bye\n```");
        let html = fragment.to_html();
        assert!(html.contains(r#"data-raw-code="say &quot;hi&quot; &amp; bye"#));
        assert!(!html.contains("&amp;quot;"));
    }

    #[test]
    fn test_unescaped_quotes_are_escaped_for_the_attribute() {
        let html = r#"<pre><code>a "b"</code></pre>"#;
        let fragment = PatternAnnotator::default().annotate(html);
        let out = fragment.to_html();
        assert!(out.contains(r#"data-raw-code="a &quot;b&quot;""#));
        assert_eq!(fragment.blocks()[0].raw_text, r#"a "b""#);
    }

    #[test]
    fn test_unmatched_markup_passes_through() {
        let html = "<p>before</p><pre><code class=\"language-js\">never closed";
        let fragment = PatternAnnotator::default().annotate(html);
        assert!(fragment.blocks().is_empty());
        assert_eq!(fragment.to_html(), html);
    }

    #[test]
    fn test_empty_input_yields_empty_markup() {
        let fragment = PatternAnnotator::default().annotate("");
        assert_eq!(fragment.segments(), &[Segment::Markup(String::new())]);
        assert_eq!(fragment.to_html(), "");
    }

    #[test]
    fn test_positional_ids_follow_document_order() {
        let html = PulldownParser::new().parse("```\na\n```\n\n```\nb\n```");
        let fragment = PatternAnnotator::new(BlockIdStrategy::Positional).annotate(&html);
        let ids: Vec<_> = fragment.blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["code-0", "code-1"]);
    }

    #[test]
    fn test_toggle_collapse_only_affects_one_block() {
        let html = PulldownParser::new().parse("```\na\n```\n\n```\nb\n```\n\n```\nc\n```");
        let mut fragment = PatternAnnotator::new(BlockIdStrategy::Positional).annotate(&html);

        let block = fragment.block_mut("code-1").unwrap();
        assert!(block.toggle_collapsed());

        let states: Vec<_> = fragment.blocks().iter().map(|b| b.collapsed).collect();
        assert_eq!(states, [false, true, false]);
        assert!(fragment.to_html().contains(r#"id="content-code-1" style="max-height: 0px""#));
        assert!(fragment.block_mut("code-9").is_none());
    }

    #[test]
    fn test_collapse_does_not_change_copy_text() {
        let mut fragment = annotate("```\nkeep me\n```");
        let before = fragment.blocks()[0].raw_text.clone();
        fragment.blocks_mut()[0].toggle_collapsed();
        assert_eq!(fragment.blocks()[0].raw_text, before);
    }
}
