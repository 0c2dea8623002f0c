#![forbid(unsafe_code)]

//! `merloc` maps the nodes and clusters of a rendered Mermaid diagram onto the pixels of the
//! raster image made from the same SVG.
//!
//! # Features
//!
//! - `raster`: rasterize the SVG to a PNG of the exact output size (`merloc::raster`)

pub use merloc_core::*;

#[cfg(feature = "raster")]
pub mod raster;
