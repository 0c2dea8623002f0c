use serde::{Deserialize, Serialize};

/// One diagram node or cluster located on the output raster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentPosition {
    pub id: String,
    pub label: String,
    pub x: u32,
    pub y: u32,
}

/// What made a group eligible for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Node,
    Cluster,
}

impl ComponentKind {
    /// Classifies a `class` attribute token list. A group that is both a node and a cluster is
    /// reported as a node.
    pub fn classify(class: &str) -> Option<Self> {
        let mut kind = None;
        for token in class.split_whitespace() {
            match token {
                "node" => return Some(Self::Node),
                "cluster" | "clusterRow" => kind = Some(Self::Cluster),
                _ => {}
            }
        }
        kind
    }
}

/// Shortens a Mermaid element id to the user-facing node id.
///
/// Mermaid emits ids such as `flowchart-Frontend-0` or `mermaid-svg-cluster-Backend`: the last
/// `-` segment is used, or the one before it when the last segment is a numeric counter.
pub fn short_id(raw: &str) -> &str {
    let mut parts = raw.rsplit('-');
    let last = parts.next().unwrap_or(raw);
    let is_counter = !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit());
    match parts.next() {
        Some(prev) if is_counter => prev,
        Some(_) => last,
        None => raw,
    }
}
