use crate::geom::Vector;
use crate::label::first_label;
use crate::position::{ComponentKind, ComponentPosition, short_id};
use crate::shape::group_bbox;
use crate::transform::parse_translation;
use crate::viewport::PixelMapper;
use roxmltree::Node;

/// Single depth-first pass over the document that emits one [`ComponentPosition`] per node or
/// cluster group with a resolvable bounding box.
pub(crate) struct Walker<'m> {
    mapper: &'m PixelMapper,
    out: Vec<ComponentPosition>,
}

impl<'m> Walker<'m> {
    pub(crate) fn new(mapper: &'m PixelMapper) -> Self {
        Self {
            mapper,
            out: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<ComponentPosition> {
        self.out
    }

    /// `offset` is the summed translation of every ancestor group of `node`.
    pub(crate) fn walk(&mut self, node: Node<'_, '_>, offset: Vector) {
        let mut offset = offset;
        if node.tag_name().name() == "g" {
            offset += parse_translation(node.attribute("transform"));
            if let Some(kind) = node.attribute("class").and_then(ComponentKind::classify) {
                self.visit_component(node, kind, offset);
            }
        }

        for child in node.children().filter(|c| c.is_element()) {
            self.walk(child, offset);
        }
    }

    fn visit_component(&mut self, group: Node<'_, '_>, kind: ComponentKind, offset: Vector) {
        let Some(bbox) = group_bbox(group) else {
            tracing::trace!(
                id = group.attribute("id").unwrap_or_default(),
                ?kind,
                "skipping group without a shape"
            );
            return;
        };

        let center = bbox.center() + offset;
        let (x, y) = self.mapper.to_pixel(center);

        let label = first_label(group);
        let raw_id = group.attribute("id").map(str::trim).unwrap_or_default();
        let id = if !raw_id.is_empty() {
            short_id(raw_id).to_string()
        } else if !label.is_empty() {
            label.clone()
        } else {
            format!("node_{}", self.out.len())
        };
        let label = if label.is_empty() { id.clone() } else { label };

        tracing::debug!(%id, %label, ?kind, x, y, "located component");
        self.out.push(ComponentPosition { id, label, x, y });
    }
}
