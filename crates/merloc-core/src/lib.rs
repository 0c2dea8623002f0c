#![forbid(unsafe_code)]

//! Locate Mermaid diagram components in rendered SVG.
//!
//! Given the SVG a Mermaid renderer produced for a diagram, this crate finds every group tagged
//! as a diagram node (`class="node"`) or subgraph cluster (`class="cluster"`/`"clusterRow"`),
//! takes the center of its first shape, resolves it into root user space through the ancestor
//! `transform`s, and maps it onto a fixed-size raster (1920×1080 by default).
//!
//! Extraction is pure and synchronous: no I/O, no shared state, safe to call from any thread.

pub mod error;
pub mod geom;
pub mod label;
pub mod position;
pub mod shape;
pub mod transform;
pub mod viewport;
mod walk;

pub use error::{Error, Result};
pub use position::{ComponentKind, ComponentPosition};
pub use viewport::{PixelMapper, ViewBox};

use crate::geom::Vector;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Output raster dimensions used for coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ExtractOptions {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Parses `svg` with the options extraction uses (DTDs allowed).
pub fn parse_document(svg: &str) -> Result<roxmltree::Document<'_>> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    Ok(roxmltree::Document::parse_with_options(svg, opts)?)
}

/// Extracts the pixel position of every diagram node and cluster in `svg`.
///
/// Results follow document order (depth-first). Groups without a resolvable shape are skipped;
/// the only failure is malformed XML.
pub fn extract_positions(svg: &str, options: &ExtractOptions) -> Result<Vec<ComponentPosition>> {
    let doc = parse_document(svg)?;
    let root = doc.root_element();

    let view_box = ViewBox::from_root(root, options);
    let mapper = PixelMapper::new(view_box, options.width, options.height);

    let mut walker = walk::Walker::new(&mapper);
    walker.walk(root, Vector::zero());
    let out = walker.finish();
    tracing::debug!(count = out.len(), "extracted component positions");
    Ok(out)
}

/// Same as [`extract_positions`], for raw bytes (must be UTF-8).
pub fn extract_positions_from_bytes(
    svg: &[u8],
    options: &ExtractOptions,
) -> Result<Vec<ComponentPosition>> {
    let text = std::str::from_utf8(svg)?;
    extract_positions(text, options)
}

#[cfg(test)]
mod tests;
