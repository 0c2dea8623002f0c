use roxmltree::Node;

fn trimmed_text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

/// Returns the first non-empty label text in the subtree of `node`.
///
/// Walks descendants depth-first and stops at the first `text` element whose direct text (or,
/// when that is blank, the text of its first child element such as a `tspan`) is non-empty.
/// Fragments are never concatenated. Returns an empty string when nothing is found.
pub fn first_label(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "text")
        .find_map(|text| {
            trimmed_text(text).or_else(|| text.first_element_child().and_then(trimmed_text))
        })
        .unwrap_or_default()
        .to_string()
}
