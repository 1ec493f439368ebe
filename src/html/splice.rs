//! Placeholder replacement in raw HTML text.
//!
//! Splicing is substring based: the first literal occurrence of each
//! placeholder is swapped for its rendered tags. No HTML parsing happens, so a
//! placeholder that also appears as ordinary text will be matched too.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// Indentation used when the document's `<head>` layout can't be detected.
pub const DEFAULT_INDENT: &str = "  ";

/// `<head>`, one or more line breaks, then whitespace up to the next tag.
/// ASCII-only whitespace class; the regex build has no Unicode tables.
static RE_HEAD_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<head>\r?\n+((?-u:\s)*)<").unwrap());

/// Detect the indentation of the first element inside `<head>`.
///
/// Line breaks inside the captured whitespace are dropped. Returns `None` when
/// `<head>` isn't followed by a line break or the captured run is empty.
pub fn detect_head_indent(html: &str) -> Option<String> {
    let caps = RE_HEAD_INDENT.captures(html)?;
    let indent: String = caps[1].chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    (!indent.is_empty()).then_some(indent)
}

/// Separator placed between tags that share one placeholder.
pub fn join_separator(html: &str) -> String {
    let indent = detect_head_indent(html);
    format!("\n{}", indent.as_deref().unwrap_or(DEFAULT_INDENT))
}

/// Replace the first occurrence of every placeholder with its tags.
///
/// Keys are visited in map order. Keys missing from the document are skipped.
pub fn splice(html: &str, placeholders: &IndexMap<String, Vec<String>>) -> String {
    if placeholders.is_empty() {
        return html.to_owned();
    }

    let separator = join_separator(html);
    placeholders
        .iter()
        .fold(html.to_owned(), |doc, (placeholder, tags)| {
            doc.replacen(placeholder.as_str(), &tags.join(&separator), 1)
        })
}

// ============================================================================
// Tests
// ============================================================================
