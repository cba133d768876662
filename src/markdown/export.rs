//! Export functionality for rendered previews
//!
//! Wraps a [`RenderedPreview`] and its outline into a standalone HTML
//! document with embedded styles for code blocks and the outline panel.

use super::entities::escape_text;
use super::highlight::Highlighter;
use super::pipeline::RenderedPreview;
use crate::error::ExportError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct HtmlExportOptions {
    /// Include CSS styles inline
    pub include_styles: bool,
    /// Document title
    pub title: Option<String>,
    /// Use dark mode styles
    pub dark_mode: bool,
    /// Custom CSS to include
    pub custom_css: Option<String>,
    /// Include the outline panel
    pub include_toc: bool,
}

impl Default for HtmlExportOptions {
    fn default() -> Self {
        Self {
            include_styles: true,
            title: None,
            dark_mode: true,
            custom_css: None,
            include_toc: true,
        }
    }
}

/// Writes rendered previews as standalone pages
#[derive(Default)]
pub struct PreviewExporter {
    highlight_css: Option<String>,
}

impl PreviewExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed the stylesheet of the highlighter that produced the preview
    pub fn with_highlighter(mut self, highlighter: Option<&dyn Highlighter>) -> Self {
        self.highlight_css = highlighter.and_then(|h| h.stylesheet());
        self
    }

    /// Export a preview to an HTML string
    pub fn export_html(&self, preview: &RenderedPreview, options: &HtmlExportOptions) -> String {
        let title = options.title.as_deref().unwrap_or("Document");
        let styles = if options.include_styles {
            self.get_styles(options.dark_mode, options.custom_css.as_deref())
        } else {
            String::new()
        };

        let toc = match preview.outline_html(None) {
            Some(outline) if options.include_toc => format!(
                "<nav class=\"toc\" id=\"tocContent\">\n<h2>Table of Contents</h2>\n{}\n</nav>",
                outline
            ),
            _ => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="uwu-markdown">
    <title>{}</title>
    {}
</head>
<body>
    {}
    <article class="markdown-body" id="previewContent">
{}
    </article>
</body>
</html>"#,
            escape_text(title),
            styles,
            toc,
            preview.html()
        )
    }

    /// Export a preview to an HTML file
    pub fn export_html_file(
        &self,
        preview: &RenderedPreview,
        output_path: &Path,
        options: &HtmlExportOptions,
    ) -> ExportResult<()> {
        let html = self.export_html(preview, options);
        let mut file = fs::File::create(output_path)?;
        file.write_all(html.as_bytes())?;
        log::info!("Exported preview to {}", output_path.display());
        Ok(())
    }

    fn get_styles(&self, dark_mode: bool, custom_css: Option<&str>) -> String {
        let theme_styles = if dark_mode {
            r#"
        :root {
            --color-bg: #1e1e2e;
            --color-text: #cdd6f4;
            --color-muted: #a6adc8;
            --color-accent: #e07b53;
            --color-code-bg: #181825;
            --color-border: #313244;
        }"#
        } else {
            r#"
        :root {
            --color-bg: #ffffff;
            --color-text: #24292e;
            --color-muted: #6a737d;
            --color-accent: #d0643c;
            --color-code-bg: #f6f8fa;
            --color-border: #e1e4e8;
        }"#
        };

        format!(
            r#"<style>
        {}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: var(--color-text);
            background-color: var(--color-bg);
            max-width: 900px;
            margin: 0 auto;
            padding: 2rem;
        }}

        .markdown-body a {{ color: var(--color-accent); }}
        .markdown-body blockquote {{
            margin: 16px 0;
            padding: 0 1em;
            color: var(--color-muted);
            border-left: .25em solid var(--color-border);
        }}

        .toc {{
            background-color: var(--color-code-bg);
            padding: 16px 24px;
            border-radius: 6px;
            margin-bottom: 24px;
        }}
        .toc h2 {{ margin-top: 0; font-size: 1.1em; }}
        .toc-list {{ list-style: none; margin: 0; padding: 0; }}
        .toc-link {{ color: var(--color-text); text-decoration: none; display: block; }}
        .toc-link.active {{ color: var(--color-accent); }}
        .toc-level-2 {{ padding-left: 1em; }}
        .toc-level-3 {{ padding-left: 2em; font-size: .9em; }}
        .toc-empty {{ color: var(--color-muted); font-style: italic; }}

        .code-block {{
            background-color: var(--color-code-bg);
            border: 1px solid var(--color-border);
            border-radius: 6px;
            margin: 16px 0;
            overflow: hidden;
        }}
        .code-header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 6px 12px;
            border-bottom: 1px solid var(--color-border);
            cursor: pointer;
        }}
        .code-header-left {{ display: flex; align-items: center; gap: 8px; }}
        .collapse-arrow {{
            width: 0;
            height: 0;
            border-left: 5px solid transparent;
            border-right: 5px solid transparent;
            border-top: 6px solid var(--color-muted);
            transition: transform .2s;
        }}
        .collapse-arrow.collapsed {{ transform: rotate(-90deg); }}
        .language-label {{ color: var(--color-muted); font-size: .85em; }}
        .copy-button {{ background: none; border: none; cursor: pointer; color: var(--color-muted); }}
        .copy-button.copied {{ color: var(--color-accent); }}
        .copy-icon {{ width: 16px; height: 16px; fill: currentColor; }}
        .code-content {{ overflow: hidden; transition: max-height .2s; }}
        .code-content.collapsed {{ max-height: 0; }}
        .code-content pre {{ margin: 0; padding: 16px; overflow: auto; }}
        .code-content code {{ font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace; }}

        {}

        {}
    </style>"#,
            theme_styles,
            self.highlight_css.as_deref().unwrap_or(""),
            custom_css.unwrap_or("")
        )
    }
}
