//! Mapping from root SVG user space to output raster pixels.

use crate::ExtractOptions;
use crate::geom::{Point, parse_number_list};
use roxmltree::Node;

/// The visible region of the document in root user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parses a `viewBox` value (`"min-x min-y width height"`, comma or whitespace separated).
    pub fn parse(raw: &str) -> Option<Self> {
        match parse_number_list(raw)?.as_slice() {
            [min_x, min_y, width, height] => Some(Self {
                min_x: *min_x,
                min_y: *min_y,
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }

    /// Resolves the view box of a root `<svg>` element.
    ///
    /// Uses `viewBox` when present and well-formed. A malformed `viewBox` is replaced by the
    /// output size with its origin at `(0, 0)`, so user units map one-to-one onto pixels. Without
    /// a `viewBox`, the root's `width`/`height` are used, falling back to the output size for
    /// either dimension that is missing or not a plain number.
    pub fn from_root(root: Node<'_, '_>, options: &ExtractOptions) -> Self {
        let output = Self {
            min_x: 0.0,
            min_y: 0.0,
            width: f64::from(options.width),
            height: f64::from(options.height),
        };

        if let Some(raw) = root.attribute("viewBox") {
            if let Some(vb) = Self::parse(raw) {
                tracing::debug!(?vb, "using root viewBox");
                return vb;
            }
            tracing::warn!(view_box = raw, "malformed root viewBox; using the output size");
            return output;
        }

        let vb = Self {
            width: length_attr(root, "width").unwrap_or(output.width),
            height: length_attr(root, "height").unwrap_or(output.height),
            ..output
        };
        tracing::debug!(?vb, "root has no viewBox; using width/height");
        vb
    }
}

// Accepts plain numbers and `px` lengths; percentages and other units are not resolvable here.
fn length_attr(node: Node<'_, '_>, name: &str) -> Option<f64> {
    let raw = node.attribute(name)?.trim();
    let raw = raw.strip_suffix("px").unwrap_or(raw).trim_end();
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Converts root user-space points into clamped pixel coordinates of a `width × height` raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapper {
    view_box: ViewBox,
    width: u32,
    height: u32,
}

impl PixelMapper {
    pub fn new(view_box: ViewBox, width: u32, height: u32) -> Self {
        Self {
            view_box,
            width,
            height,
        }
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Maps `p` to a pixel. Never fails: a zero-sized view box axis maps to `0`, and anything
    /// outside the raster is pinned to the nearest edge pixel.
    pub fn to_pixel(&self, p: Point) -> (u32, u32) {
        let vb = &self.view_box;
        let px = scale_axis(p.x - vb.min_x, vb.width, self.width);
        let py = scale_axis(p.y - vb.min_y, vb.height, self.height);
        (px, py)
    }
}

fn scale_axis(offset: f64, extent: f64, pixels: u32) -> u32 {
    if extent == 0.0 {
        return 0;
    }
    let v = (offset / extent * f64::from(pixels)).round();
    let max = f64::from(pixels.saturating_sub(1));
    // NaN clamps to NaN; `as` turns that into 0.
    v.clamp(0.0, max) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;

    fn mapper(vb: (f64, f64, f64, f64), w: u32, h: u32) -> PixelMapper {
        PixelMapper::new(
            ViewBox {
                min_x: vb.0,
                min_y: vb.1,
                width: vb.2,
                height: vb.3,
            },
            w,
            h,
        )
    }

    fn view_box_of(svg: &str) -> ViewBox {
        let doc = roxmltree::Document::parse(svg).expect("valid svg");
        ViewBox::from_root(doc.root_element(), &ExtractOptions::default())
    }

    #[test]
    fn view_box_parses_whitespace_and_commas() {
        let vb = ViewBox::parse("-8 -8, 216.5 100").expect("viewBox");
        assert_eq!((vb.min_x, vb.min_y, vb.width, vb.height), (-8.0, -8.0, 216.5, 100.0));
        assert_eq!(ViewBox::parse("0 0 100"), None);
        assert_eq!(ViewBox::parse("0 0 a 100"), None);
    }

    #[test]
    fn root_without_view_box_uses_width_and_height() {
        let vb = view_box_of(r#"<svg width="400" height="300px"/>"#);
        assert_eq!((vb.min_x, vb.min_y, vb.width, vb.height), (0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn root_falls_back_to_output_size_for_unresolvable_lengths() {
        let vb = view_box_of(r#"<svg width="100%"/>"#);
        assert_eq!((vb.width, vb.height), (1920.0, 1080.0));
    }

    #[test]
    fn malformed_view_box_uses_output_size_not_root_lengths() {
        let vb = view_box_of(r#"<svg viewBox="0 0 100" width="100" height="100"/>"#);
        assert_eq!((vb.min_x, vb.min_y, vb.width, vb.height), (0.0, 0.0, 1920.0, 1080.0));
    }

    #[test]
    fn maps_and_rounds_into_pixel_space() {
        let m = mapper((0.0, 0.0, 100.0, 100.0), 200, 200);
        assert_eq!(m.to_pixel(point(20.0, 15.0)), (40, 30));
        assert_eq!(m.to_pixel(point(20.26, 15.24)), (41, 30));

        let m = mapper((-50.0, -10.0, 100.0, 20.0), 1000, 200);
        assert_eq!(m.to_pixel(point(0.0, 0.0)), (500, 100));
    }

    #[test]
    fn out_of_range_points_are_clamped() {
        let m = mapper((0.0, 0.0, 100.0, 100.0), 200, 100);
        assert_eq!(m.to_pixel(point(-30.0, -1.0)), (0, 0));
        assert_eq!(m.to_pixel(point(100.0, 100.0)), (199, 99));
        assert_eq!(m.to_pixel(point(1e12, f64::NAN)), (199, 0));
    }

    #[test]
    fn zero_sized_view_box_maps_to_zero() {
        let m = mapper((0.0, 0.0, 0.0, 50.0), 200, 100);
        assert_eq!(m.to_pixel(point(30.0, 25.0)), (0, 50));
    }
}
