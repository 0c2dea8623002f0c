//! Local-space bounding boxes for the shape primitives Mermaid emits inside node groups.

use crate::geom::{Rect, parse_number_list, rect};
use regex::Regex;
use roxmltree::Node;
use std::sync::OnceLock;

fn path_move_to_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[Mm]\s*([-\d.]+)\s*[, ]\s*([-\d.]+)").expect("valid regex"))
}

fn attr_f64(node: Node<'_, '_>, name: &str) -> Option<f64> {
    match node.attribute(name) {
        None => Some(0.0),
        Some(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

fn rect_bbox(node: Node<'_, '_>) -> Option<Rect> {
    let x = attr_f64(node, "x")?;
    let y = attr_f64(node, "y")?;
    let width = attr_f64(node, "width")?;
    let height = attr_f64(node, "height")?;
    Some(rect(x, y, width, height))
}

fn points_bbox(node: Node<'_, '_>) -> Option<Rect> {
    let nums = parse_number_list(node.attribute("points")?)?;
    if nums.len() < 4 {
        return None;
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for pair in nums.chunks_exact(2) {
        min_x = min_x.min(pair[0]);
        max_x = max_x.max(pair[0]);
        min_y = min_y.min(pair[1]);
        max_y = max_y.max(pair[1]);
    }
    Some(rect(min_x, min_y, max_x - min_x, max_y - min_y))
}

// Only the first move-to is read; the result is a 1x1 box anchored there.
fn path_bbox(node: Node<'_, '_>) -> Option<Rect> {
    let caps = path_move_to_regex().captures(node.attribute("d")?)?;
    let x = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let y = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(rect(x, y, 1.0, 1.0))
}

/// Returns the bounding box of a single shape element, in its own coordinate space.
///
/// Supports `rect`, `polygon`, `polyline` and (first move-to only) `path`. Other elements, and
/// shapes whose geometry attributes do not parse, have no box.
pub fn element_bbox(node: Node<'_, '_>) -> Option<Rect> {
    if !node.is_element() {
        return None;
    }
    match node.tag_name().name() {
        "rect" => rect_bbox(node),
        "polygon" | "polyline" => points_bbox(node),
        "path" => path_bbox(node),
        _ => None,
    }
}

/// Returns the box of the first child shape of `group`, in the group's local space.
///
/// Direct children are checked in document order; a child `g` is searched one level deep (its
/// own children only). The first hit wins. Transforms on the shape or on the nested group are not
/// applied.
pub fn group_bbox(group: Node<'_, '_>) -> Option<Rect> {
    for child in group.children().filter(|c| c.is_element()) {
        if let Some(bbox) = element_bbox(child) {
            return Some(bbox);
        }
        if child.tag_name().name() == "g" {
            let nested = child
                .children()
                .filter(|c| c.is_element())
                .find_map(element_bbox);
            if nested.is_some() {
                return nested;
            }
        }
    }
    None
}
