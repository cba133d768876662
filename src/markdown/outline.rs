//! Table of contents
//!
//! Scans the rendered heading elements (levels 1 to 3), stamps each with a
//! document-order anchor id and builds the outline shown in the side panel.

use super::annotate::AnnotatedFragment;
use super::entities::{decode_entities, escape_text, strip_tags};
use regex::Regex;
use std::sync::OnceLock;

/// Placeholder shown before anything has been typed
pub const NOT_YET_TYPED_TEXT: &str = "start typing to see headings...";

/// Placeholder shown when the document has no headings
pub const NO_HEADINGS_TEXT: &str = "no headings found";

fn heading_open_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<h([1-6])(\s[^>]*)?>").expect("heading pattern is valid"))
}

/// Where a heading's content stops: its end tag, or the start of the next
/// heading, which implicitly closes an unterminated one.
fn heading_boundary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"</h[1-6]\s*>|<h[1-6][\s>]").expect("heading boundary pattern is valid")
    })
}

fn id_attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\s+id\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("id pattern is valid")
    })
}

/// Anchor id for the heading at `index` in document order
pub fn anchor_id(index: usize) -> String {
    format!("heading-{}", index)
}

/// One heading in the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// 1 to 3
    pub level: u8,
    /// Trimmed visible text
    pub text: String,
    /// `heading-{n}`
    pub anchor_id: String,
}

impl OutlineEntry {
    /// Presentational tier class
    pub fn level_class(&self) -> &'static str {
        match self.level {
            2 => "toc-level-2",
            3 => "toc-level-3",
            _ => "toc-level-1",
        }
    }
}

/// Why the outline panel is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlinePlaceholder {
    /// The document is empty
    NotYetTyped,
    /// The document has text but no level 1-3 headings
    NoHeadings,
}

impl OutlinePlaceholder {
    pub fn text(&self) -> &'static str {
        match self {
            OutlinePlaceholder::NotYetTyped => NOT_YET_TYPED_TEXT,
            OutlinePlaceholder::NoHeadings => NO_HEADINGS_TEXT,
        }
    }
}

/// Derived table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outline {
    Placeholder(OutlinePlaceholder),
    Entries(Vec<OutlineEntry>),
}

impl Outline {
    pub fn entries(&self) -> &[OutlineEntry] {
        match self {
            Outline::Entries(entries) => entries,
            Outline::Placeholder(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Render the side panel markup, marking `active` if given
    pub fn to_html(&self, active: Option<usize>) -> String {
        let entries = match self {
            Outline::Placeholder(placeholder) => {
                return format!(r#"<p class="toc-empty">{}</p>"#, placeholder.text());
            }
            Outline::Entries(entries) => entries,
        };

        let mut html = String::from(r#"<ul class="toc-list">"#);
        for (index, entry) in entries.iter().enumerate() {
            let active_class = if active == Some(index) { " active" } else { "" };
            html.push_str(&format!(
                r##"
    <li class="toc-item">
        <a class="toc-link {level}{active_class}" data-action="outline-jump" data-target="{id}">{text}</a>
    </li>"##,
                level = entry.level_class(),
                id = entry.anchor_id,
                text = escape_text(&entry.text),
            ));
        }
        html.push_str("\n</ul>");
        html
    }
}

/// Builds outlines from rendered fragments
#[derive(Debug, Clone, Copy, Default)]
pub struct TableOfContentsBuilder;

impl TableOfContentsBuilder {
    /// Assign `heading-{n}` ids to every level 1-3 heading in the fragment,
    /// replacing any id the parser emitted, and collect them in order.
    pub fn anchor_headings(fragment: &mut AnnotatedFragment) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();

        for markup in fragment.markup_mut() {
            if !markup.contains("<h") {
                continue;
            }

            let mut rewritten = String::with_capacity(markup.len() + 32);
            let mut copied = 0;
            for caps in heading_open_pattern().captures_iter(markup.as_str()) {
                let level: u8 = caps[1].parse().unwrap_or(1);
                let Some(tag) = caps.get(0).filter(|_| level <= 3) else {
                    continue;
                };

                let body_end = heading_boundary_pattern()
                    .find_at(markup, tag.end())
                    .map_or(markup.len(), |m| m.start());
                let attributes = caps.get(2).map_or("", |m| m.as_str());
                let attributes = id_attribute_pattern().replace_all(attributes, "");

                let entry = OutlineEntry {
                    level,
                    text: decode_entities(&strip_tags(&markup[tag.end()..body_end]))
                        .trim()
                        .to_string(),
                    anchor_id: anchor_id(entries.len()),
                };
                rewritten.push_str(&markup[copied..tag.start()]);
                rewritten.push_str(&format!(
                    r#"<h{level} id="{id}"{attributes}>"#,
                    id = entry.anchor_id,
                ));
                copied = tag.end();
                entries.push(entry);
            }
            rewritten.push_str(&markup[copied..]);

            *markup = rewritten;
        }

        entries
    }

    /// Outline for a document with text in it
    pub fn build(entries: Vec<OutlineEntry>) -> Outline {
        if entries.is_empty() {
            Outline::Placeholder(OutlinePlaceholder::NoHeadings)
        } else {
            Outline::Entries(entries)
        }
    }
}

/// Scroll offset that puts a heading just below the fixed navigation bar
pub fn scroll_target(heading_top: f64, navbar_height: f64, margin: f64) -> f64 {
    (heading_top - navbar_height - margin).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{CodeBlockAnnotator, MarkdownParser, PatternAnnotator, PulldownParser};

    fn fragment(markdown: &str) -> AnnotatedFragment {
        let html = PulldownParser::new().parse(markdown);
        PatternAnnotator::default().annotate(&html)
    }

    #[test]
    fn test_entries_follow_document_order() {
        let mut frag = fragment("# One\n\n## Two\n\n#### Skipped\n\n### Three\n\n# Four");
        let entries = TableOfContentsBuilder::anchor_headings(&mut frag);

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.level, e.text.as_str(), e.anchor_id.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                (1, "One", "heading-0"),
                (2, "Two", "heading-1"),
                (3, "Three", "heading-2"),
                (1, "Four", "heading-3"),
            ]
        );

        let html = frag.to_html();
        assert!(html.contains(r#"<h1 id="heading-0">One</h1>"#));
        assert!(html.contains(r#"<h3 id="heading-2">Three</h3>"#));
        assert!(html.contains("<h4>Skipped</h4>"));
    }

    #[test]
    fn test_headings_inside_code_blocks_are_ignored() {
        let mut frag = fragment("# Real\n\n```html\n<h1>fake</h1>\n```\n\n## Also real");
        let entries = TableOfContentsBuilder::anchor_headings(&mut frag);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].anchor_id, "heading-1");
    }

    #[test]
    fn test_heading_text_is_plain_and_trimmed() {
        let mut frag = fragment("##   Hello *big* `world` & co   ");
        let entries = TableOfContentsBuilder::anchor_headings(&mut frag);
        assert_eq!(entries[0].text, "Hello big world & co");
    }

    #[test]
    fn test_existing_id_is_replaced() {
        let mut frag = AnnotatedFragment::from_markup(r#"<h2 id="custom" class="x">T</h2>"#);
        TableOfContentsBuilder::anchor_headings(&mut frag);
        assert_eq!(frag.to_html(), r#"<h2 id="heading-0" class="x">T</h2>"#);
    }

    #[test]
    fn test_empty_states_are_distinct() {
        let none = TableOfContentsBuilder::build(Vec::new());
        assert_eq!(none, Outline::Placeholder(OutlinePlaceholder::NoHeadings));
        assert!(none.to_html(None).contains(NO_HEADINGS_TEXT));

        let untyped = Outline::Placeholder(OutlinePlaceholder::NotYetTyped);
        assert!(untyped.to_html(None).contains(NOT_YET_TYPED_TEXT));
        assert_ne!(none.to_html(None), untyped.to_html(None));
    }

    #[test]
    fn test_outline_markup_tiers_and_active() {
        let mut frag = fragment("# A\n\n## B < C\n\n### D");
        let entries = TableOfContentsBuilder::anchor_headings(&mut frag);
        let outline = TableOfContentsBuilder::build(entries);
        assert_eq!(outline.len(), 3);

        let html = outline.to_html(Some(1));
        assert!(html.contains(
            r#"class="toc-link toc-level-1" data-action="outline-jump" data-target="heading-0""#
        ));
        assert!(html.contains(r#"class="toc-link toc-level-2 active""#));
        assert!(html.contains(
            r#"class="toc-link toc-level-3" data-action="outline-jump" data-target="heading-2""#
        ));
        assert!(html.contains(">B &lt; C</a>"));
        assert!(!html.contains("href="));
    }

    #[test]
    fn test_unclosed_heading_ends_at_next_heading() {
        let mut frag = fragment("<h1>raw\n\n## Real\n\n### Third");
        let entries = TableOfContentsBuilder::anchor_headings(&mut frag);

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.level, e.text.as_str(), e.anchor_id.as_str()))
            .collect();
        assert_eq!(
            summary,
            [(1, "raw", "heading-0"), (2, "Real", "heading-1"), (3, "Third", "heading-2")]
        );

        let html = frag.to_html();
        assert!(html.contains(r#"<h1 id="heading-0">raw"#));
        assert!(html.contains(r#"<h2 id="heading-1">Real</h2>"#));
        assert!(html.contains(r#"<h3 id="heading-2">Third</h3>"#));
    }

    #[test]
    fn test_scroll_target_sits_below_navbar() {
        assert_eq!(scroll_target(1000.0, 64.0, 20.0), 916.0);
        assert_eq!(scroll_target(30.0, 64.0, 20.0), 0.0);
    }
}
