//! Bare `ID[label]` node labels may only hold plain text; parentheses, slashes, colons and the
//! like make the Mermaid flowchart parser fail. LLM-written diagrams use them all the time.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn square_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z0-9_]+)\[([^\[\]]*)\]").expect("valid regex"))
}

fn is_plain_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || c == '\t' || matches!(c, '_' | '-' | '.' | ',' | '?' | '!')
}

// `[(db)]`, `[/in/]`, `[\out\]` and `["quoted"]` are shapes or already-safe labels.
fn is_shape_or_quoted(label: &str) -> bool {
    matches!(label.chars().next(), Some('"' | '(' | '/' | '\\'))
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('"', "#quot;")
}

/// Wraps square-bracket node labels containing special characters in double quotes.
///
/// Line breaks and whitespace runs inside a rewritten label collapse to single spaces and inner
/// `"` become `#quot;`. Labels that are plain text, already quoted, or use a bracketed shape form
/// are left untouched.
pub fn sanitize_node_labels(src: &str) -> String {
    square_label_regex()
        .replace_all(src, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let id = &caps[1];
            let label = &caps[2];
            if is_shape_or_quoted(label) || label.chars().all(is_plain_label_char) {
                return whole.to_string();
            }
            let normalized = normalize_label(label);
            tracing::trace!(id, label = %normalized, "quoting node label");
            format!("{id}[\"{normalized}\"]")
        })
        .into_owned()
}
