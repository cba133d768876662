//! HTML entity escaping and decoding
//!
//! The parser escapes code bodies once. Embedding a body in an attribute
//! must only neutralise double quotes, otherwise `&amp;` would become
//! `&amp;amp;` and the clipboard copy would no longer match the source.

/// Longest entity body we try to decode, e.g. `#x10FFFF`
const MAX_ENTITY_LEN: usize = 10;

/// Escape text for use in element content or a double-quoted attribute
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make already-escaped markup safe inside a double-quoted attribute.
///
/// Ampersands are left alone, so applying this to markup that is already
/// attribute-safe changes nothing.
pub fn escape_attribute(markup: &str) -> String {
    markup.replace('"', "&quot;")
}

/// Decode HTML entities in a single pass.
///
/// Unknown or malformed entities are kept verbatim, and decoded output is
/// never rescanned: `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_entities(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the entity at the start of `tail` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_one(tail: &str) -> Option<(char, usize)> {
    let semi = tail[1..].find(';')? + 1;
    if semi > MAX_ENTITY_LEN + 1 {
        return None;
    }

    let name = &tail[1..semi];
    let ch = match name.strip_prefix('#') {
        Some(body) => decode_numeric(body)?,
        None => named_entity(name)?,
    };

    Some((ch, semi + 1))
}

/// Named entities a code body is likely to carry: the markup escapes,
/// Latin-1 symbols, typographic punctuation, arrows and math operators.
/// Anything else is left for the caller to keep verbatim.
fn named_entity(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "iexcl" => '¡',
        "cent" => '¢',
        "pound" => '£',
        "curren" => '¤',
        "yen" => '¥',
        "brvbar" => '¦',
        "sect" => '§',
        "uml" => '¨',
        "copy" => '©',
        "ordf" => 'ª',
        "laquo" => '«',
        "not" => '¬',
        "shy" => '\u{ad}',
        "reg" => '®',
        "macr" => '¯',
        "deg" => '°',
        "plusmn" => '±',
        "sup2" => '²',
        "sup3" => '³',
        "acute" => '´',
        "micro" => 'µ',
        "para" => '¶',
        "middot" => '·',
        "cedil" => '¸',
        "sup1" => '¹',
        "ordm" => 'º',
        "raquo" => '»',
        "frac14" => '¼',
        "frac12" => '½',
        "frac34" => '¾',
        "iquest" => '¿',
        "times" => '×',
        "divide" => '÷',
        "szlig" => 'ß',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "sbquo" => '‚',
        "ldquo" => '“',
        "rdquo" => '”',
        "bdquo" => '„',
        "dagger" => '†',
        "Dagger" => '‡',
        "bull" => '•',
        "hellip" => '…',
        "permil" => '‰',
        "prime" => '′',
        "Prime" => '″',
        "lsaquo" => '‹',
        "rsaquo" => '›',
        "euro" => '€',
        "trade" => '™',
        "larr" => '←',
        "uarr" => '↑',
        "rarr" => '→',
        "darr" => '↓',
        "harr" => '↔',
        "lArr" => '⇐',
        "rArr" => '⇒',
        "hArr" => '⇔',
        "forall" => '∀',
        "exist" => '∃',
        "empty" => '∅',
        "isin" => '∈',
        "notin" => '∉',
        "sum" => '∑',
        "minus" => '−',
        "lowast" => '∗',
        "radic" => '√',
        "infin" => '∞',
        "and" => '∧',
        "or" => '∨',
        "cap" => '∩',
        "cup" => '∪',
        "ne" => '≠',
        "equiv" => '≡',
        "le" => '≤',
        "ge" => '≥',
        "sub" => '⊂',
        "sup" => '⊃',
        "alpha" => 'α',
        "beta" => 'β',
        "gamma" => 'γ',
        "delta" => 'δ',
        "lambda" => 'λ',
        "mu" => 'μ',
        "pi" => 'π',
        "sigma" => 'σ',
        "omega" => 'ω',
        "Delta" => 'Δ',
        "Sigma" => 'Σ',
        "Omega" => 'Ω',
        "zwj" => '\u{200d}',
        "zwnj" => '\u{200c}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        _ => return None,
    };
    Some(ch)
}

fn decode_numeric(body: &str) -> Option<char> {
    let code = match body.strip_prefix(['x', 'X']) {
        Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) => {
            body.parse::<u32>().ok()?
        }
        None => return None,
    };
    char::from_u32(code)
}

/// Remove tags from an HTML fragment, keeping only text content
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_inverts_escape() {
        let samples = [
            "plain",
            r#"say "hi" & <wave>"#,
            "&amp; already looks escaped",
            "a && b || c < d > e",
            "",
        ];
        for sample in samples {
            assert_eq!(decode_entities(&escape_text(sample)), sample);
        }
    }

    #[test]
    fn test_decode_is_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&amp;quot;"), "&quot;");
    }

    #[test]
    fn test_decode_named_symbols() {
        assert_eq!(
            decode_entities("&copy; 2024 &mdash; a &rarr; b &hellip;"),
            "© 2024 — a → b …"
        );
        assert_eq!(decode_entities("x &le; y &ne; z"), "x ≤ y ≠ z");
        assert_eq!(decode_entities("&notanentity; &COPY;"), "&notanentity; &COPY;");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("&#39;&#x27;&#X41;&#65;"), "''AA");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&#;"), "&#;");
    }

    #[test]
    fn test_decode_leaves_unknown_entities() {
        assert_eq!(decode_entities("&bogus; & &"), "&bogus; & &");
        assert_eq!(decode_entities("a & b;"), "a & b;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn test_escape_attribute_does_not_touch_ampersands() {
        let escaped = "x = &quot;a&quot; &amp;&amp; y";
        assert_eq!(escape_attribute(escaped), escaped);
        assert_eq!(escape_attribute(r#"raw "quote""#), "raw &quot;quote&quot;");
        assert_eq!(
            escape_attribute(&escape_attribute(r#"a "b""#)),
            escape_attribute(r#"a "b""#)
        );
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("Hello <em>big</em> <code>world</code>"), "Hello big world");
    }
}
