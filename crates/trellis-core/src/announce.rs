//! Live announcement region.

use trellis_config::{Politeness, SortDirection};
use trellis_dom::{Document, DomError, DomResult, NodeId};

/// Class identifying the region.
pub const REGION_CLASS: &str = "usa-table__announcement-region";
/// Visually hidden utility class.
pub const SR_ONLY_CLASS: &str = "usa-sr-only";

/// Sentence describing a completed sort.
#[must_use]
pub fn sort_sentence(caption: Option<&str>, column: &str, direction: SortDirection) -> String {
    let direction = direction.as_aria();
    match caption {
        Some(caption) => format!(
            r#"The table named "{caption}" is now sorted by {column} in {direction} order."#
        ),
        None => format!("The table is now sorted by {column} in {direction} order."),
    }
}

/// Region placed directly after `anchor`, skipping non-element siblings.
#[must_use]
pub fn find_region(doc: &Document, anchor: NodeId) -> Option<NodeId> {
    let mut cursor = doc.next_sibling(anchor);
    while let Some(node) = cursor {
        if doc.is_element(node) {
            return doc.has_class(node, REGION_CLASS).then_some(node);
        }
        cursor = doc.next_sibling(node);
    }
    None
}

/// Region after `anchor`, created when missing.
///
/// # Errors
///
/// Returns [`DomError::HierarchyRequest`] when `anchor` has no parent to
/// hold the region.
pub fn ensure_region(doc: &mut Document, anchor: NodeId, politeness: Politeness) -> DomResult<NodeId> {
    if let Some(region) = find_region(doc, anchor) {
        doc.set_attribute(region, "aria-live", politeness.as_str());
        return Ok(region);
    }
    let region = doc.create_element("div");
    doc.set_attribute(region, "class", &format!("{REGION_CLASS} {SR_ONLY_CLASS}"));
    doc.set_attribute(region, "aria-live", politeness.as_str());
    let parent = doc.parent(anchor).ok_or(DomError::HierarchyRequest {
        parent: anchor,
        child: region,
    })?;
    let next = doc.next_sibling(anchor);
    doc.insert_before(parent, region, next)?;
    Ok(region)
}

/// Replace the region's text.
pub fn announce(doc: &mut Document, region: NodeId, text: &str) {
    tracing::trace!(text, "announce");
    doc.set_text_content(region, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_mentions_caption_when_present() {
        assert_eq!(
            sort_sentence(Some("Planets"), "Mass", SortDirection::Descending),
            r#"The table named "Planets" is now sorted by Mass in descending order."#
        );
        assert_eq!(
            sort_sentence(None, "Name", SortDirection::Ascending),
            "The table is now sorted by Name in ascending order."
        );
    }

    #[test]
    fn region_is_created_once_after_anchor_and_text_is_replaced() {
        let mut doc = Document::new();
        let table = doc.create_element("table");
        let footer = doc.create_element("p");
        doc.append_child(doc.root(), table).expect("append");
        doc.append_child(doc.root(), footer).expect("append");

        let region = ensure_region(&mut doc, table, Politeness::Polite).expect("region");
        assert_eq!(doc.next_sibling(table), Some(region));
        assert_eq!(doc.next_sibling(region), Some(footer));
        assert_eq!(
            ensure_region(&mut doc, table, Politeness::Polite).expect("region"),
            region
        );

        announce(&mut doc, region, "first");
        announce(&mut doc, region, "second");
        assert_eq!(
            doc.outer_html(region),
            r#"<div class="usa-table__announcement-region usa-sr-only" aria-live="polite">second</div>"#
        );
    }

    #[test]
    fn detached_anchor_cannot_hold_a_region() {
        let mut doc = Document::new();
        let table = doc.create_element("table");
        assert!(ensure_region(&mut doc, table, Politeness::Polite).is_err());
    }
}
