//! `transform` attribute resolution.
//!
//! Only the translation part of a transform list is kept. Diagram nodes are axis-aligned, so
//! `rotate`, `scale`, `skewX`/`skewY` and the linear terms of `matrix(a b c d e f)` are dropped.

use crate::geom::{Vector, parse_number_list, vector};
use regex::Regex;
use std::sync::OnceLock;

fn transform_fn_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").expect("valid regex"))
}

/// Resolves a `transform` attribute value into a translation offset.
///
/// A missing, empty, or unparseable attribute yields `(0, 0)`. When the attribute holds a list
/// of functions, the translations of each `translate`/`matrix` entry are summed.
pub fn parse_translation(raw: Option<&str>) -> Vector {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vector::zero();
    };

    transform_fn_regex()
        .captures_iter(raw)
        .map(|caps| {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let args = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            function_translation(name, args)
        })
        .fold(Vector::zero(), |acc, v| acc + v)
}

fn function_translation(name: &str, args: &str) -> Vector {
    let Some(nums) = parse_number_list(args) else {
        tracing::trace!(name, args, "ignoring transform with non-numeric arguments");
        return Vector::zero();
    };
    match (name, nums.as_slice()) {
        ("translate", [tx]) => vector(*tx, 0.0),
        ("translate", [tx, ty]) => vector(*tx, *ty),
        ("matrix", [_a, _b, _c, _d, e, f]) => vector(*e, *f),
        _ => Vector::zero(),
    }
}
