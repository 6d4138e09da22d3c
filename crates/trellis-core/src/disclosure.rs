//! Toggle/disclosure engine.
//!
//! Items are `button.usa-accordion__button` triggers whose `aria-controls`
//! names the content element. The item id is that content id. A group is
//! every trigger whose nearest `.usa-accordion` is the group root, so nested
//! accordions form separate groups. Groups without `data-allow-multiple` are
//! exclusive: at most one member is expanded.

use trellis_dom::{Document, NodeId, Selector};
use trellis_events::ChangeEvent;

/// Class of the group root.
pub const ROOT_CLASS: &str = "usa-accordion";
/// Class of item triggers.
pub const BUTTON_CLASS: &str = "usa-accordion__button";
/// Attribute that lifts the exclusivity constraint.
pub const MULTISELECTABLE: &str = "data-allow-multiple";

const EXPANDED: &str = "aria-expanded";
const CONTROLS: &str = "aria-controls";

/// Trigger/content pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosureItem {
    /// Content element id.
    pub id: String,
    /// Trigger button.
    pub trigger: NodeId,
    /// Content element, if present in the group.
    pub content: Option<NodeId>,
}

/// Members of the group rooted at `root`, in document order.
#[must_use]
pub fn items(doc: &Document, root: NodeId) -> Vec<DisclosureItem> {
    let root_selector = Selector::class(ROOT_CLASS);
    doc.query_all(root, &Selector::tag("button").with_class(BUTTON_CLASS))
        .into_iter()
        .filter(|button| doc.closest(*button, &root_selector) == Some(root))
        .filter_map(|trigger| {
            let id = doc.attribute(trigger, CONTROLS)?.to_string();
            let content = doc.element_by_id_within(root, &id);
            Some(DisclosureItem {
                id,
                trigger,
                content,
            })
        })
        .collect()
}

/// Whether the group allows at most one expanded member.
#[must_use]
pub fn is_exclusive(doc: &Document, root: NodeId) -> bool {
    !doc.has_attribute(root, MULTISELECTABLE)
}

/// Expanded state of an item; `None` for unknown ids.
#[must_use]
pub fn is_expanded(doc: &Document, root: NodeId, item_id: &str) -> Option<bool> {
    items(doc, root)
        .into_iter()
        .find(|item| item.id == item_id)
        .map(|item| trigger_expanded(doc, item.trigger))
}

/// Ids of expanded members.
#[must_use]
pub fn expanded_ids(doc: &Document, root: NodeId) -> Vec<String> {
    items(doc, root)
        .into_iter()
        .filter(|item| trigger_expanded(doc, item.trigger))
        .map(|item| item.id)
        .collect()
}

fn trigger_expanded(doc: &Document, trigger: NodeId) -> bool {
    doc.attribute(trigger, EXPANDED) == Some("true")
}

fn apply(doc: &mut Document, item: &DisclosureItem, expanded: bool) {
    doc.set_attribute(item.trigger, EXPANDED, if expanded { "true" } else { "false" });
    if let Some(content) = item.content {
        doc.toggle_attribute(content, "hidden", !expanded);
    }
}

/// Flip an item. Unknown ids change nothing.
pub fn toggle(doc: &mut Document, root: NodeId, item_id: &str) -> Vec<ChangeEvent> {
    match is_expanded(doc, root, item_id) {
        Some(expanded) => set_expanded(doc, root, item_id, !expanded),
        None => Vec::new(),
    }
}

/// Expand an item, collapsing the rest of an exclusive group in the same
/// step.
pub fn expand(doc: &mut Document, root: NodeId, item_id: &str) -> Vec<ChangeEvent> {
    set_expanded(doc, root, item_id, true)
}

/// Collapse an item.
pub fn collapse(doc: &mut Document, root: NodeId, item_id: &str) -> Vec<ChangeEvent> {
    set_expanded(doc, root, item_id, false)
}

/// Drive an item to `expanded` and return one change per item that flipped.
pub fn set_expanded(
    doc: &mut Document,
    root: NodeId,
    item_id: &str,
    expanded: bool,
) -> Vec<ChangeEvent> {
    let _span = tracing::trace_span!("disclosure", item = item_id, expanded).entered();
    let members = items(doc, root);
    let Some(target) = members.iter().find(|item| item.id == item_id) else {
        tracing::trace!("unknown disclosure item");
        return Vec::new();
    };

    let mut changes = Vec::new();
    if expanded && is_exclusive(doc, root) {
        for other in members.iter().filter(|item| item.id != item_id) {
            if trigger_expanded(doc, other.trigger) {
                apply(doc, other, false);
                changes.push(ChangeEvent::DisclosureChanged {
                    item_id: other.id.clone(),
                    expanded: false,
                });
            }
        }
    }
    if trigger_expanded(doc, target.trigger) != expanded {
        changes.push(ChangeEvent::DisclosureChanged {
            item_id: target.id.clone(),
            expanded,
        });
    }
    // Content visibility is re-synced even when the trigger state holds.
    apply(doc, target, expanded);
    changes
}

/// Bring markup in line with the group rules: content visibility follows
/// `aria-expanded`, triggers without a state become collapsed, and an
/// exclusive group keeps only its first expanded member.
pub fn normalize(doc: &mut Document, root: NodeId) {
    let exclusive = is_exclusive(doc, root);
    let mut seen_expanded = false;
    for item in items(doc, root) {
        let mut expanded = trigger_expanded(doc, item.trigger);
        if expanded && exclusive && seen_expanded {
            expanded = false;
        }
        seen_expanded |= expanded;
        apply(doc, &item, expanded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(doc: &mut Document, multiple: bool, expanded: &[&str]) -> NodeId {
        let root = doc.create_element("div");
        doc.add_class(root, ROOT_CLASS);
        if multiple {
            doc.set_attribute(root, MULTISELECTABLE, "");
        }
        doc.append_child(doc.root(), root).expect("append");
        let mut markup = String::new();
        for id in ["a", "b", "c"] {
            let open = expanded.contains(&id);
            markup.push_str(&format!(
                r#"<h4 class="usa-accordion__heading"><button type="button" class="usa-accordion__button" aria-expanded="{open}" aria-controls="{id}">{id}</button></h4><div id="{id}" class="usa-accordion__content"{}>{id} body</div>"#,
                if open { "" } else { " hidden" }
            ));
        }
        doc.set_inner_html(root, &markup).expect("markup");
        root
    }

    #[test]
    fn exclusive_expand_collapses_siblings_in_one_step() {
        let mut doc = Document::new();
        let root = group(&mut doc, false, &[]);

        let changes = expand(&mut doc, root, "a");
        assert_eq!(changes.len(), 1);
        assert_eq!(expanded_ids(&doc, root), vec!["a"]);

        let changes = expand(&mut doc, root, "b");
        assert_eq!(
            changes,
            vec![
                ChangeEvent::DisclosureChanged {
                    item_id: "a".into(),
                    expanded: false
                },
                ChangeEvent::DisclosureChanged {
                    item_id: "b".into(),
                    expanded: true
                },
            ]
        );
        assert_eq!(expanded_ids(&doc, root), vec!["b"]);
        let a = doc.element_by_id("a").expect("a");
        assert!(doc.has_attribute(a, "hidden"));
        let b = doc.element_by_id("b").expect("b");
        assert!(!doc.has_attribute(b, "hidden"));
    }

    #[test]
    fn toggling_the_open_item_leaves_none_open() {
        let mut doc = Document::new();
        let root = group(&mut doc, false, &["b"]);
        toggle(&mut doc, root, "b");
        assert!(expanded_ids(&doc, root).is_empty());
    }

    #[test]
    fn multiselectable_group_keeps_siblings() {
        let mut doc = Document::new();
        let root = group(&mut doc, true, &["a"]);
        expand(&mut doc, root, "c");
        assert_eq!(expanded_ids(&doc, root), vec!["a", "c"]);
    }

    #[test]
    fn no_change_no_notification_and_unknown_id_is_ignored() {
        let mut doc = Document::new();
        let root = group(&mut doc, false, &["a"]);
        assert!(expand(&mut doc, root, "a").is_empty());
        assert!(collapse(&mut doc, root, "b").is_empty());
        assert!(toggle(&mut doc, root, "zzz").is_empty());
        assert_eq!(is_expanded(&doc, root, "zzz"), None);
    }

    #[test]
    fn normalize_keeps_first_expanded_member() {
        let mut doc = Document::new();
        let root = group(&mut doc, false, &["a", "c"]);
        let c = doc.element_by_id("c").expect("c");
        doc.toggle_attribute(c, "hidden", false);
        normalize(&mut doc, root);
        assert_eq!(expanded_ids(&doc, root), vec!["a"]);
        assert!(doc.has_attribute(c, "hidden"));
    }

    #[test]
    fn nested_groups_are_separate() {
        let mut doc = Document::new();
        let outer = group(&mut doc, false, &["a"]);
        let a = doc.element_by_id("a").expect("a");
        let inner = doc.create_element("div");
        doc.add_class(inner, ROOT_CLASS);
        doc.append_child(a, inner).expect("append");
        doc.set_inner_html(
            inner,
            r#"<button class="usa-accordion__button" aria-expanded="false" aria-controls="n1">n</button><div id="n1" hidden></div>"#,
        )
        .expect("markup");

        assert_eq!(items(&doc, outer).len(), 3);
        expand(&mut doc, inner, "n1");
        assert_eq!(expanded_ids(&doc, outer), vec!["a"]);
        assert_eq!(expanded_ids(&doc, inner), vec!["n1"]);
    }
}
