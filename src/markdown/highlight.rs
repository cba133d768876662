//! Syntax highlighter collaborator
//!
//! Highlighting is best effort: a highlighter rewrites a block's display
//! markup in place and leaves the copy text alone. Without the
//! `code-highlight` feature there is no highlighter and the escaped code is
//! shown as is.

use super::annotate::CodeBlock;

/// In-place highlighting of a rendered code element
pub trait Highlighter {
    fn highlight(&self, block: &mut CodeBlock);

    /// Stylesheet for the markup this highlighter emits
    fn stylesheet(&self) -> Option<String> {
        None
    }
}

/// The highlighter compiled into this build, if any
pub fn default_highlighter() -> Option<Box<dyn Highlighter>> {
    #[cfg(feature = "code-highlight")]
    {
        Some(Box::new(syntect_backend::SyntectHighlighter::new()))
    }
    #[cfg(not(feature = "code-highlight"))]
    {
        log::debug!("Built without code-highlight, code blocks stay unhighlighted");
        None
    }
}

#[cfg(feature = "code-highlight")]
pub use syntect_backend::SyntectHighlighter;

#[cfg(feature = "code-highlight")]
mod syntect_backend {
    use super::{CodeBlock, Highlighter};
    use syntect::highlighting::ThemeSet;
    use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
    use syntect::parsing::SyntaxSet;
    use syntect::util::LinesWithEndings;

    const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };
    const THEME: &str = "base16-ocean.dark";

    /// Classed-HTML highlighter backed by syntect's bundled grammars
    pub struct SyntectHighlighter {
        syntaxes: SyntaxSet,
    }

    impl SyntectHighlighter {
        pub fn new() -> Self {
            Self {
                syntaxes: SyntaxSet::load_defaults_newlines(),
            }
        }

        fn render(&self, language: &str, source: &str) -> Option<String> {
            let syntax = self
                .syntaxes
                .find_syntax_by_token(language)
                .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

            let mut generator =
                ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
            for line in LinesWithEndings::from(source) {
                if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                    log::warn!("Highlighting {} failed: {}", language, e);
                    return None;
                }
            }
            Some(generator.finalize())
        }
    }

    impl Default for SyntectHighlighter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Highlighter for SyntectHighlighter {
        fn highlight(&self, block: &mut CodeBlock) {
            if let Some(markup) = self.render(&block.language, &block.raw_text) {
                block.display_markup = markup;
            }
        }

        fn stylesheet(&self) -> Option<String> {
            let themes = ThemeSet::load_defaults();
            let theme = themes
                .themes
                .get(THEME)
                .or_else(|| themes.themes.get("InspiredGitHub"))?;
            css_for_theme_with_class_style(theme, CLASS_STYLE).ok()
        }
    }
}
