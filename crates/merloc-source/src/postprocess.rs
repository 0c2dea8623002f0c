//! Cleanup for diagram text produced by a chat completion.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn click_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"click ([^\s"]+)\s+"([^"]+)""#).expect("valid regex"))
}

/// Removes Markdown code fences (```` ```mermaid ```` / ```` ``` ````) and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```mermaid", "").replace("```", "").trim().to_string()
}

/// Resolves relative `click <id> "<path>"` targets against `base_url`.
///
/// Targets that already carry a scheme (`https://…`, `file://…`) are kept as they are.
pub fn rewrite_click_targets(diagram: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    click_regex()
        .replace_all(diagram, |caps: &Captures<'_>| {
            let id = &caps[1];
            let path = caps[2].trim_matches(|c| c == '"' || c == '\'');
            if path.contains("://") {
                return caps[0].to_string();
            }
            let path = path.trim_start_matches('/');
            format!("click {id} \"{base}/{path}\"")
        })
        .into_owned()
}

/// Returns the `<tag>…</tag>` section of `text` (markers included), or all of `text` when either
/// marker is missing.
pub fn extract_tagged_section<'a>(text: &'a str, tag: &str) -> &'a str {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let Some(start) = text.find(&open) else {
        return text;
    };
    match text[start..].find(&close) {
        Some(rel) => &text[start..start + rel + close.len()],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_and_trims() {
        let raw = "Here you go:\n```mermaid\nflowchart TD\n  A --> B\n```\n";
        assert_eq!(strip_code_fences(raw), "Here you go:\n\nflowchart TD\n  A --> B");
        assert_eq!(strip_code_fences("  graph LR\n"), "graph LR");
    }

    #[test]
    fn click_paths_become_absolute_urls() {
        let src = "flowchart TD\n  A[Api]\n  click A \"src/api/main.rs\"\n  click B \"/docs\"";
        let out = rewrite_click_targets(src, "file:///work/repo/");
        assert!(out.contains("click A \"file:///work/repo/src/api/main.rs\""), "{out}");
        assert!(out.contains("click B \"file:///work/repo/docs\""), "{out}");
    }

    #[test]
    fn absolute_click_targets_are_kept() {
        let src = "click A \"https://example.com/x\"";
        assert_eq!(rewrite_click_targets(src, "file:///repo"), src);
    }

    #[test]
    fn tagged_section_includes_markers() {
        let text = "intro\n<component_mapping>\n1. API: src/api\n</component_mapping>\noutro";
        assert_eq!(
            extract_tagged_section(text, "component_mapping"),
            "<component_mapping>\n1. API: src/api\n</component_mapping>"
        );
        assert_eq!(extract_tagged_section("no tags", "component_mapping"), "no tags");
        assert_eq!(
            extract_tagged_section("<component_mapping> open only", "component_mapping"),
            "<component_mapping> open only"
        );
    }
}
