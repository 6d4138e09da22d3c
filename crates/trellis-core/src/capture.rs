//! Author content capture and reapplication.
//!
//! On first attachment the host's children are serialized into snapshots and
//! removed, so the template's placeholders are the only content the render
//! pass sees. Each later pass replaces placeholders with the matching
//! snapshot, which is then dropped. Placeholders that do not exist yet are
//! skipped and retried on the next pass.
//!
//! The default slot remembers where its content landed. When the content
//! override changes after that, the slot's nodes are swapped in place: author
//! nodes are parked while an override is shown and put back when it clears.

use std::collections::BTreeMap;

use trellis_dom::{Document, DomResult, NodeId, Selector};

/// Slot used for children without a `slot` attribute.
pub const DEFAULT_SLOT: &str = "content";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Filled {
    Author,
    Override(String),
}

/// Where the default slot's content lives after its placeholder is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DefaultRegion {
    parent: NodeId,
    next: Option<NodeId>,
    nodes: Vec<NodeId>,
    filled: Filled,
}

/// Snapshots of author content keyed by slot name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCapture {
    snapshots: BTreeMap<String, String>,
    content_override: Option<String>,
    attempted: bool,
    region: Option<DefaultRegion>,
    parked: Vec<NodeId>,
}

impl ContentCapture {
    /// Empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize and clear the host's children.
    ///
    /// Runs at most once per capture; later calls, hosts without children and
    /// hosts with a content override return `false` and leave the tree alone.
    pub fn capture(&mut self, doc: &mut Document, host: NodeId) -> bool {
        if std::mem::replace(&mut self.attempted, true) {
            return false;
        }
        if self.content_override.is_some() || doc.children(host).is_empty() {
            return false;
        }
        for child in doc.children(host).to_vec() {
            let slot = doc
                .attribute(child, "slot")
                .filter(|slot| !slot.is_empty())
                .unwrap_or(DEFAULT_SLOT)
                .to_string();
            let markup = doc.outer_html(child);
            self.snapshots.entry(slot).or_default().push_str(&markup);
        }
        doc.clear_children(host);
        tracing::trace!(slots = self.snapshots.len(), "captured author content");
        true
    }

    /// Replace placeholders under `scope` with pending content, then bring an
    /// already filled default slot in line with the content override.
    ///
    /// The default slot takes the content override when one is set; its
    /// snapshot then stays unconsumed. Returns the number of slots filled or
    /// swapped.
    ///
    /// # Errors
    ///
    /// Propagates markup and tree errors. A snapshot is only dropped once its
    /// nodes are in place.
    pub fn reapply(
        &mut self,
        doc: &mut Document,
        scope: NodeId,
        placeholder_attribute: &str,
    ) -> DomResult<usize> {
        let mut applied = 0;
        for placeholder in doc.query_all(scope, &Selector::attr(placeholder_attribute)) {
            let slot = doc
                .attribute(placeholder, placeholder_attribute)
                .filter(|slot| !slot.is_empty())
                .unwrap_or(DEFAULT_SLOT)
                .to_string();
            let from_override = slot == DEFAULT_SLOT && self.content_override.is_some();
            let markup = if from_override {
                self.content_override.clone()
            } else {
                self.snapshots.get(&slot).cloned()
            };
            let Some(markup) = markup else {
                continue;
            };
            let nodes = doc.parse_fragment(&markup)?;
            let parent = doc.parent(placeholder);
            let next = doc.next_sibling(placeholder);
            doc.replace_with(placeholder, &nodes)?;
            if slot == DEFAULT_SLOT {
                self.region = parent.map(|parent| DefaultRegion {
                    parent,
                    next,
                    nodes,
                    filled: if from_override {
                        Filled::Override(markup)
                    } else {
                        Filled::Author
                    },
                });
            }
            if !from_override {
                self.snapshots.remove(&slot);
            }
            applied += 1;
        }
        if self.sync_default(doc)? {
            applied += 1;
        }
        Ok(applied)
    }

    fn sync_default(&mut self, doc: &mut Document) -> DomResult<bool> {
        let wanted = self
            .content_override
            .clone()
            .map_or(Filled::Author, Filled::Override);
        let Some(region) = self.region.as_mut() else {
            return Ok(false);
        };
        if region.filled == wanted {
            return Ok(false);
        }
        let parent = region.parent;
        let current = outermost(doc, parent, &region.nodes);
        let incoming = match &wanted {
            Filled::Override(markup) => doc.parse_fragment(markup)?,
            Filled::Author if !self.parked.is_empty() => std::mem::take(&mut self.parked),
            Filled::Author => match self.snapshots.get(DEFAULT_SLOT) {
                Some(markup) => doc.parse_fragment(markup)?,
                None => Vec::new(),
            },
        };
        let reference = current
            .first()
            .copied()
            .or_else(|| region.next.filter(|next| doc.parent(*next) == Some(parent)));
        for node in &incoming {
            doc.insert_before(parent, *node, reference)?;
        }
        for node in &current {
            doc.remove(*node);
        }
        if region.filled == Filled::Author {
            self.parked = current;
        }
        if wanted == Filled::Author {
            self.snapshots.remove(DEFAULT_SLOT);
        }
        region.nodes = incoming;
        region.filled = wanted;
        tracing::trace!(nodes = region.nodes.len(), "default slot swapped");
        Ok(true)
    }

    /// Set or clear the explicit content override.
    pub fn set_override(&mut self, markup: Option<String>) {
        self.content_override = markup;
    }

    /// Drop a slot's snapshot without placing it. Returns whether one was
    /// pending.
    pub fn discard(&mut self, slot: &str) -> bool {
        self.snapshots.remove(slot).is_some()
    }

    /// Explicit content override, if any.
    #[must_use]
    pub fn content_override(&self) -> Option<&str> {
        self.content_override.as_deref()
    }

    /// Pending snapshot for a slot.
    #[must_use]
    pub fn snapshot(&self, slot: &str) -> Option<&str> {
        self.snapshots.get(slot).map(String::as_str)
    }

    /// Whether any snapshot is still waiting for its placeholder.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.snapshots.is_empty()
    }
}

/// The children of `parent` that hold `nodes`, in tree order. Enhancement
/// may have wrapped a node, so each one is walked up to its ancestor directly
/// under `parent`; detached nodes are skipped.
fn outermost(doc: &Document, parent: NodeId, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut found: Vec<NodeId> = Vec::new();
    for node in nodes {
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            let above = doc.parent(current);
            if above == Some(parent) {
                if !found.contains(&current) {
                    found.push(current);
                }
                break;
            }
            cursor = above;
        }
    }
    let siblings = doc.children(parent);
    found.sort_by_key(|node| siblings.iter().position(|child| child == node));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTR: &str = "data-trellis-placeholder";

    fn host_with(markup: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let host = doc.create_element("trellis-demo");
        doc.append_child(doc.root(), host).expect("append");
        doc.set_inner_html(host, markup).expect("markup");
        (doc, host)
    }

    #[test]
    fn capture_splits_named_slots_and_clears_children() {
        let (mut doc, host) = host_with(r#"<p>one</p><b slot="body">rich</b>tail"#);
        let mut capture = ContentCapture::new();
        assert!(capture.capture(&mut doc, host));
        assert!(doc.children(host).is_empty());
        assert_eq!(capture.snapshot(DEFAULT_SLOT), Some("<p>one</p>tail"));
        assert_eq!(capture.snapshot("body"), Some(r#"<b slot="body">rich</b>"#));
        assert!(!capture.capture(&mut doc, host));
    }

    #[test]
    fn reapply_consumes_snapshot_once() {
        let (mut doc, host) = host_with("<p>kept</p>");
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);
        doc.set_inner_html(host, &format!(r#"<div class="wrap"><span {ATTR}="content"></span></div>"#))
            .expect("template");

        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(1));
        assert_eq!(doc.inner_html(host), r#"<div class="wrap"><p>kept</p></div>"#);
        assert!(!capture.has_pending());
        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(0));
        assert_eq!(doc.inner_html(host), r#"<div class="wrap"><p>kept</p></div>"#);
    }

    #[test]
    fn absent_placeholder_is_retried_later() {
        let (mut doc, host) = host_with(r#"<i slot="body">later</i>"#);
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);

        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(0));
        assert!(capture.has_pending());

        doc.set_inner_html(host, &format!(r#"<span {ATTR}="body"></span>"#))
            .expect("template");
        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(1));
        assert!(!capture.has_pending());
    }

    #[test]
    fn override_wins_and_leaves_snapshot_unconsumed() {
        let (mut doc, host) = host_with("<p>author</p>");
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);
        capture.set_override(Some("<em>override</em>".into()));
        doc.set_inner_html(host, &format!(r#"<span {ATTR}="content"></span>"#))
            .expect("template");

        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(1));
        assert_eq!(doc.inner_html(host), "<em>override</em>");
        assert_eq!(capture.snapshot(DEFAULT_SLOT), Some("<p>author</p>"));
    }

    #[test]
    fn late_override_swaps_author_nodes_and_clearing_restores_them() {
        let (mut doc, host) = host_with("<p>author</p><i>more</i>");
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);
        doc.set_inner_html(host, &format!(r#"<div class="wrap"><span {ATTR}="content"></span><hr></div>"#))
            .expect("template");
        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(1));
        let wrap = doc.element_children(host)[0];
        let author = doc.children(wrap)[0];

        capture.set_override(Some("<em>override</em>".into()));
        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(1));
        assert_eq!(doc.inner_html(host), r#"<div class="wrap"><em>override</em><hr></div>"#);
        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(0));

        capture.set_override(Some("<b>second</b>".into()));
        capture.reapply(&mut doc, host, ATTR).expect("swap");
        assert_eq!(doc.inner_html(host), r#"<div class="wrap"><b>second</b><hr></div>"#);

        capture.set_override(None);
        assert_eq!(capture.reapply(&mut doc, host, ATTR), Ok(1));
        assert_eq!(
            doc.inner_html(host),
            r#"<div class="wrap"><p>author</p><i>more</i><hr></div>"#
        );
        assert_eq!(doc.children(wrap)[0], author);
        assert!(!capture.has_pending());
    }

    #[test]
    fn clearing_an_early_override_consumes_the_snapshot() {
        let (mut doc, host) = host_with("<p>author</p>");
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);
        capture.set_override(Some("<em>override</em>".into()));
        doc.set_inner_html(host, &format!(r#"<span {ATTR}="content"></span>"#))
            .expect("template");
        capture.reapply(&mut doc, host, ATTR).expect("fill");

        capture.set_override(None);
        capture.reapply(&mut doc, host, ATTR).expect("restore");
        assert_eq!(doc.inner_html(host), "<p>author</p>");
        assert!(!capture.has_pending());
    }

    #[test]
    fn wrapped_author_nodes_are_swapped_by_their_wrapper() {
        let (mut doc, host) = host_with("<button>Info</button>");
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);
        doc.set_inner_html(host, &format!(r#"<span {ATTR}="content"></span>"#))
            .expect("template");
        capture.reapply(&mut doc, host, ATTR).expect("fill");
        let button = doc.children(host)[0];
        let wrapper = doc.create_element("span");
        doc.replace_with(button, &[wrapper]).expect("wrap");
        doc.append_child(wrapper, button).expect("wrap");

        capture.set_override(Some("plain".into()));
        capture.reapply(&mut doc, host, ATTR).expect("swap");
        assert_eq!(doc.inner_html(host), "plain");
        capture.set_override(None);
        capture.reapply(&mut doc, host, ATTR).expect("restore");
        assert_eq!(doc.inner_html(host), "<span><button>Info</button></span>");
    }

    #[test]
    fn discarded_slot_is_no_longer_pending() {
        let (mut doc, host) = host_with(r#"<b>trigger</b><i slot="body">unused</i>"#);
        let mut capture = ContentCapture::new();
        capture.capture(&mut doc, host);
        assert!(capture.discard("body"));
        assert!(!capture.discard("body"));
        assert_eq!(capture.snapshot(DEFAULT_SLOT), Some("<b>trigger</b>"));
        assert!(capture.has_pending());
    }

    #[test]
    fn override_before_first_attach_skips_capture() {
        let (mut doc, host) = host_with("<p>author</p>");
        let mut capture = ContentCapture::new();
        capture.set_override(Some("x".into()));
        assert!(!capture.capture(&mut doc, host));
        assert_eq!(doc.children(host).len(), 1);
    }
}
