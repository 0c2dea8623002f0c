#![forbid(unsafe_code)]

//! SVG → PNG rasterization at the dimensions used for position extraction.
//!
//! The root view box is resolved with [`ViewBox::from_root`] and stretched onto the full
//! `width × height` pixmap, which is the same mapping [`merloc_core::PixelMapper`] applies, so
//! extracted positions line up with the image.

use merloc_core::{ComponentPosition, ExtractOptions, ViewBox, extract_positions, parse_document};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Extract(#[from] merloc_core::Error),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color: {0}")]
    InvalidBackground(String),
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub extract: ExtractOptions,
    /// CSS-ish color (`white`, `transparent`, `#rgb`, `#rrggbbaa`, ...). `None` leaves the
    /// pixmap transparent.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            background: Some("white".to_string()),
        }
    }
}

/// A rendered diagram image together with the located components.
#[derive(Debug, Clone)]
pub struct RasterOutput {
    pub png: Vec<u8>,
    pub positions: Vec<ComponentPosition>,
}

/// Rasterizes `svg` and extracts component positions for the same output size.
pub fn render_with_positions(svg: &str, options: &RasterOptions) -> Result<RasterOutput> {
    let positions = extract_positions(svg, &options.extract)?;
    let png = svg_to_png(svg, options)?;
    Ok(RasterOutput { png, positions })
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let ExtractOptions { width, height } = options.extract;

    let background = match options.background.as_deref() {
        None => None,
        Some(raw) => Some(
            parse_color(raw).ok_or_else(|| RasterError::InvalidBackground(raw.to_string()))?,
        ),
    };

    let mut opt = usvg::Options::default();
    // Keep output stable-ish across environments while still using system fonts.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let stretched = stretch_root(svg, &options.extract)?;
    let tree = usvg::Tree::from_str(&stretched, &opt).map_err(|_| RasterError::SvgParse)?;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;
    if let Some(color) = background {
        pixmap.fill(color);
    }

    tracing::debug!(width, height, "rasterizing SVG");
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    Ok(pixmap)
}

const ROOT_GEOMETRY_ATTRS: [&str; 4] = ["viewBox", "width", "height", "preserveAspectRatio"];

// Rewrites the root start tag so usvg maps the resolved view box non-uniformly onto exactly
// `width × height` user units.
fn stretch_root(svg: &str, options: &ExtractOptions) -> Result<String> {
    let doc = parse_document(svg)?;
    let root = doc.root_element();
    let vb = ViewBox::from_root(root, options);

    let mut replaced: Vec<_> = root
        .attributes()
        .filter(|a| a.namespace().is_none() && ROOT_GEOMETRY_ATTRS.contains(&a.name()))
        .map(|a| a.range())
        .collect();
    replaced.sort_by_key(|r| r.start);

    let mut out = svg.to_string();
    for range in replaced.into_iter().rev() {
        out.replace_range(range, "");
    }

    // Attributes all follow the tag name, so this offset is unaffected by the removals.
    let tag_start = root.range().start + 1;
    let name_end = svg[tag_start..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map_or(svg.len(), |i| tag_start + i);
    out.insert_str(
        name_end,
        &format!(
            r#" viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="none""#,
            vb.min_x, vb.min_y, vb.width, vb.height, options.width, options.height
        ),
    );
    Ok(out)
}

fn parse_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::TRANSPARENT),
        "white" => return Some(tiny_skia::Color::WHITE),
        "black" => return Some(tiny_skia::Color::BLACK),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 | 4 => {
            let a = if hex.len() == 4 { nibble(3)? * 17 } else { 255 };
            (nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17, a)
        }
        6 | 8 => {
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            (byte(0)?, byte(2)?, byte(4)?, a)
        }
        _ => return None,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, b, a))
}
