//! Sanitizers for text lifted out of the specification into generated files
//!
//! Vault descriptions are free-form prose: they span lines, carry typographic
//! quotes and occasionally backslashes. Go code embeds them inside
//! double-quoted literals and the doc stubs embed them in single Markdown
//! lines, so both need normalising first.

use once_cell::sync::Lazy;
use regex::Regex;

static TYPOGRAPHIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalises a description into one plain-ASCII-punctuation line
///
/// This function:
/// - Replaces smart quotes with regular quotes
/// - Replaces en and em dashes with regular dashes
/// - Collapses every whitespace run (newlines included) into a single space
///
/// # Examples
/// ```
/// use providergen::generation::sanitizers::sanitize_description;
///
/// let input = "The \u{201C}name\u{201D} of the role\u{2014}always\n  required.";
/// assert_eq!(sanitize_description(input), "The \"name\" of the role-always required.");
/// ```
pub fn sanitize_description(input: &str) -> String {
    let plain = TYPOGRAPHIC_RE.replace_all(input, |caps: &regex::Captures| match &caps[0] {
        "\u{2018}" | "\u{2019}" => "'",
        "\u{201C}" | "\u{201D}" => "\"",
        _ => "-",
    });
    WHITESPACE_RE.replace_all(plain.trim(), " ").into_owned()
}

/// Escapes text for the inside of a Go interpreted string literal.
///
/// # Examples
/// ```
/// use providergen::generation::sanitizers::escape_go_string;
///
/// assert_eq!(escape_go_string(r#"a "quoted" \path"#), r#"a \"quoted\" \\path"#);
/// ```
pub fn escape_go_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Escapes Markdown table and emphasis characters in a doc stub line.
pub fn escape_markdown(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '|' | '*' | '_' | '`' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
