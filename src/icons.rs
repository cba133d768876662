// SPDX-License-Identifier: GPL-3.0-only
//! Bundled SVG icons for code block controls.
//!
//! Icons use `currentColor` through the `copy-icon` class so the host
//! stylesheet decides their colour.

/// Copy button at rest
pub const COPY: &str = r#"<svg class="copy-icon" viewBox="0 0 16 16"><path d="M0 6.75C0 5.784.784 5 1.75 5h1.5a.75.75 0 0 1 0 1.5h-1.5a.25.25 0 0 0-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 0 0 .25-.25v-1.5a.75.75 0 0 1 1.5 0v1.5A1.75 1.75 0 0 1 9.25 16h-7.5A1.75 1.75 0 0 1 0 14.25Z"></path><path d="M5 1.75C5 .784 5.784 0 6.75 0h7.5C15.216 0 16 .784 16 1.75v7.5A1.75 1.75 0 0 1 14.25 11h-7.5A1.75 1.75 0 0 1 5 9.25Zm1.75-.25a.25.25 0 0 0-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 0 0 .25-.25v-7.5a.25.25 0 0 0-.25-.25Z"></path></svg>"#;

/// Shown after a successful copy
pub const COPIED: &str = r#"<svg class="copy-icon" viewBox="0 0 16 16"><path d="M13.78 4.22a.75.75 0 0 1 0 1.06l-7.25 7.25a.75.75 0 0 1-1.06 0L2.22 9.28a.75.75 0 0 1 1.06-1.06L6 11.94l6.72-6.72a.75.75 0 0 1 1.06 0Z"></path></svg>"#;

/// Shown after a failed copy
pub const COPY_FAILED: &str = r#"<svg class="copy-icon" viewBox="0 0 16 16"><path d="M3.72 3.72a.75.75 0 0 1 1.06 0L8 6.94l3.22-3.22a.75.75 0 1 1 1.06 1.06L9.06 8l3.22 3.22a.75.75 0 1 1-1.06 1.06L8 9.06l-3.22 3.22a.75.75 0 0 1-1.06-1.06L6.94 8 3.72 4.78a.75.75 0 0 1 0-1.06Z"></path></svg>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_are_distinct_svgs() {
        for icon in [COPY, COPIED, COPY_FAILED] {
            assert!(icon.starts_with("<svg") && icon.ends_with("</svg>"));
        }
        assert_ne!(COPY, COPIED);
        assert_ne!(COPIED, COPY_FAILED);
    }
}
