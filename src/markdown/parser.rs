//! Markdown parser collaborator
//!
//! The pipeline consumes a parser as a pure `text -> HTML` function. Whether
//! one is available is decided when the pipeline is built, so a missing
//! parser is an `Option::None`, not a runtime failure.

use pulldown_cmark::{html, Options, Parser};

/// Pure markdown to HTML conversion
pub trait MarkdownParser {
    /// Convert markdown text into an HTML fragment
    fn parse(&self, markdown: &str) -> String;
}

/// pulldown-cmark backed parser with the GFM extensions enabled
pub struct PulldownParser {
    options: Options,
}

impl PulldownParser {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }
}

impl Default for PulldownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser for PulldownParser {
    fn parse(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

impl<F> MarkdownParser for F
where
    F: Fn(&str) -> String,
{
    fn parse(&self, markdown: &str) -> String {
        self(markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_and_paragraph() {
        let html = PulldownParser::new().parse("# Hello\n\nWorld");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_fenced_code_carries_language_class() {
        let html = PulldownParser::new().parse("```rust\nlet x = \"y\";\n```");
        assert!(html.contains(r#"<pre><code class="language-rust">"#));
        assert!(html.contains("&quot;y&quot;"));
    }

    #[test]
    fn test_closure_is_a_parser() {
        let parser = |text: &str| format!("<p>{}</p>", text);
        assert_eq!(MarkdownParser::parse(&parser, "hi"), "<p>hi</p>");
    }
}
