//! Bounding boxes for geometry tests.

use trellis_dom::{Document, NodeId, Rect};

/// Give `node` a box of `width` x `height` at (`x`, `y`).
pub fn place(doc: &mut Document, node: NodeId, x: f64, y: f64, width: f64, height: f64) {
    doc.set_rect(node, Rect::new(x, y, x + width, y + height));
}

/// Move `node` so its box starts at (`x`, `y`), keeping its size.
pub fn move_to(doc: &mut Document, node: NodeId, x: f64, y: f64) {
    let current = doc.bounding_rect(node);
    place(doc, node, x, y, current.width(), current.height());
}
