//! Document arena: tree structure, attributes, class lists, inline styles and
//! host-supplied geometry.

use kurbo::Rect;

use crate::error::{DomError, DomResult};
use crate::event::Registration;
use crate::frame::FrameQueue;
use crate::node::{ElementData, Node, NodeId, NodeKind};
use crate::selector::Selector;

/// Viewport used until the host reports its own.
const DEFAULT_VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

/// Host document.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Rect,
    next_generated_id: u64,
    pub(crate) listeners: Vec<Registration>,
    pub(crate) next_listener: u64,
    pub(crate) frames: FrameQueue,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .field("pending_frames", &self.frames.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document whose root is a `body` element.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            viewport: DEFAULT_VIEWPORT,
            next_generated_id: 1,
            listeners: Vec::new(),
            next_listener: 1,
            frames: FrameQueue::default(),
        };
        doc.root = doc.push(NodeKind::Element(ElementData::new("body")));
        doc.nodes[doc.root.index()].rect = DEFAULT_VIEWPORT;
        doc
    }

    /// Root `body` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[allow(dead_code)]
    pub(crate) fn element_data(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).element()
    }

    // ----- creation ---------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_string()))
    }

    /// Attach (or return the existing) shadow root of an element.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        if let Some(existing) = self.node(host).shadow_root {
            return existing;
        }
        let shadow = self.push(NodeKind::ShadowRoot);
        self.node_mut(shadow).parent = Some(host);
        self.node_mut(host).shadow_root = Some(shadow);
        shadow
    }

    /// Shadow root of an element, if any.
    #[must_use]
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.node(host).shadow_root
    }

    /// Generate an element id that is not in use in the connected tree.
    pub fn generate_id(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{prefix}-{}", self.next_generated_id);
            self.next_generated_id += 1;
            if self.element_by_id(&candidate).is_none() {
                return candidate;
            }
        }
    }

    // ----- structure --------------------------------------------------------

    /// Node payload.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.node(node).kind
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        self.node(node).element().is_some()
    }

    /// Lowercase tag name of an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).element().map(ElementData::tag)
    }

    /// Parent node. A shadow root's parent is its host.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Parent element, skipping shadow roots.
    #[must_use]
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        if self.is_element(parent) {
            Some(parent)
        } else {
            self.parent(parent)
        }
    }

    /// Child nodes in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Child elements in order.
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Sibling immediately after `node`.
    #[must_use]
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|child| *child == node)?;
        siblings.get(index + 1).copied()
    }

    /// Whether `node` is `ancestor` or one of its descendants, shadow trees
    /// included.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether the node is reachable from the document root.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::HierarchyRequest`] when `parent` cannot hold
    /// children or when `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` (or last when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`DomError::HierarchyRequest`] for invalid parents or cycles and
    /// [`DomError::NotAChild`] when `reference` is not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.node(parent).is_container()
            || self.contains(child, parent)
            || matches!(self.node(child).kind, NodeKind::ShadowRoot)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if reference == Some(child) {
            return Ok(());
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild { parent, reference });
            }
        }
        self.remove(child);
        let index = match reference {
            Some(reference) => self
                .children(parent)
                .iter()
                .position(|node| *node == reference)
                .ok_or(DomError::NotAChild { parent, reference })?,
            None => self.children(parent).len(),
        };
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Detach a node from its parent. Detached nodes keep their subtree.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).parent else {
            return;
        };
        if matches!(self.node(node).kind, NodeKind::ShadowRoot) {
            return;
        }
        self.node_mut(parent).children.retain(|child| *child != node);
        self.node_mut(node).parent = None;
    }

    /// Replace `node` with `replacements`, in order.
    ///
    /// # Errors
    ///
    /// Propagates [`DomError`] from the insertions. A detached `node` is a
    /// no-op.
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) -> DomResult<()> {
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        for replacement in replacements {
            self.insert_before(parent, *replacement, Some(node))?;
        }
        self.remove(node);
        Ok(())
    }

    /// Detach every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.node_mut(node).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Light-tree descendants in document order, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    // ----- text -------------------------------------------------------------

    /// Concatenated text of the node and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.node(node).kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Comment(_) => String::new(),
            NodeKind::Element(_) | NodeKind::ShadowRoot => self
                .descendants(node)
                .into_iter()
                .filter_map(|child| match &self.node(child).kind {
                    NodeKind::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Replace all children with a single text node (none for empty text).
    /// Text and comment nodes have their data replaced instead.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(existing) | NodeKind::Comment(existing) =
            &mut self.node_mut(node).kind
        {
            text.clone_into(existing);
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            if let Err(err) = self.append_child(node, text_node) {
                tracing::warn!(error = %err, "node rejected its text content");
            }
        }
    }

    // ----- attributes -------------------------------------------------------

    /// Attribute value of an element.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).element()?.attribute(name)
    }

    /// Whether the element carries the attribute.
    #[must_use]
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Attributes of an element in insertion order (empty for non-elements).
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        self.node(node)
            .element()
            .map(ElementData::attributes)
            .unwrap_or_default()
    }

    /// Set an attribute. Ignored for non-elements. `style` is routed to the
    /// inline style declarations.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.node_mut(node).element_mut() {
            if name == "style" {
                data.set_style_text(value);
            } else {
                data.set_attribute(name, value);
            }
        }
    }

    /// Remove an attribute, returning whether it was present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        self.node_mut(node)
            .element_mut()
            .is_some_and(|data| data.remove_attribute(name))
    }

    /// Set or remove a boolean attribute.
    pub fn toggle_attribute(&mut self, node: NodeId, name: &str, present: bool) {
        if present {
            if !self.has_attribute(node, name) {
                self.set_attribute(node, name, "");
            }
        } else {
            self.remove_attribute(node, name);
        }
    }

    /// Element `id`.
    #[must_use]
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id")
    }

    /// First connected light-tree element with the given `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|node| self.id(*node) == Some(id))
    }

    /// First element with the given `id` inside `scope` (inclusive).
    #[must_use]
    pub fn element_by_id_within(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        std::iter::once(scope)
            .chain(self.descendants(scope))
            .find(|node| self.id(*node) == Some(id))
    }

    // ----- classes ----------------------------------------------------------

    /// Whether the element's class list contains `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .element()
            .is_some_and(|data| data.has_class(class))
    }

    /// Add a class if missing.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.is_element(node) || self.has_class(node, class) {
            return;
        }
        let next = match self.attribute(node, "class") {
            Some(list) if !list.trim().is_empty() => format!("{} {class}", list.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &next);
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(list) = self.attribute(node, "class") else {
            return;
        };
        let next = list
            .split_ascii_whitespace()
            .filter(|item| *item != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(node, "class", &next);
    }

    /// Add or remove a class.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, present: bool) {
        if present {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    // ----- inline style -----------------------------------------------------

    /// Inline style property value.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).element()?.style(property)
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.node_mut(node).element_mut() {
            data.set_style(property, value);
        }
    }

    /// Unset an inline style property, returning whether it was set.
    pub fn remove_style(&mut self, node: NodeId, property: &str) -> bool {
        self.node_mut(node)
            .element_mut()
            .is_some_and(|data| data.remove_style(property))
    }

    /// Serialized inline style (`prop: value;` pairs).
    #[must_use]
    pub fn style_text(&self, node: NodeId) -> String {
        self.node(node)
            .element()
            .map(ElementData::style_text)
            .unwrap_or_default()
    }

    // ----- geometry ---------------------------------------------------------

    /// Record the layout box of a node, as reported by the host layout.
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.node_mut(node).rect = rect;
    }

    /// Rendered bounding box; zero for nodes that are not visible.
    #[must_use]
    pub fn bounding_rect(&self, node: NodeId) -> Rect {
        if self.is_visible(node) {
            self.node(node).rect
        } else {
            Rect::ZERO
        }
    }

    /// Viewport rectangle.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Update the viewport rectangle.
    pub const fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Connected, and neither the node nor an ancestor is `hidden`.
    #[must_use]
    pub fn is_visible(&self, node: NodeId) -> bool {
        if !self.is_connected(node) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.has_attribute(current, "hidden") {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }

    // ----- queries ----------------------------------------------------------

    /// Whether an element matches the selector.
    #[must_use]
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.node(node)
            .element()
            .is_some_and(|data| selector.matches(data))
    }

    /// First matching light-tree descendant of `scope`.
    #[must_use]
    pub fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.matches(*node, selector))
    }

    /// Every matching light-tree descendant of `scope` in document order.
    #[must_use]
    pub fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    /// Nearest inclusive ancestor matching the selector.
    #[must_use]
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.matches(current, selector) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Like [`Document::closest`] but never walks above `boundary`.
    #[must_use]
    pub fn closest_within(
        &self,
        node: NodeId,
        selector: &Selector,
        boundary: NodeId,
    ) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.matches(current, selector) {
                return Some(current);
            }
            if current == boundary {
                return None;
            }
            cursor = self.parent(current);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let section = doc.create_element("section");
        let first = doc.create_element("p");
        let second = doc.create_element("p");
        doc.append_child(doc.root(), section).expect("append");
        doc.append_child(section, first).expect("append");
        doc.append_child(section, second).expect("append");
        (doc, section, first, second)
    }

    #[test]
    fn insert_before_reorders_existing_child() {
        let (mut doc, section, first, second) = tree();
        doc.insert_before(section, second, Some(first))
            .expect("insert");
        assert_eq!(doc.children(section), &[second, first]);
        assert_eq!(doc.next_sibling(second), Some(first));
    }

    #[test]
    fn cycles_are_rejected() {
        let (mut doc, section, first, _) = tree();
        assert_eq!(
            doc.append_child(first, section),
            Err(DomError::HierarchyRequest {
                parent: first,
                child: section
            })
        );
        let text = doc.create_text("x");
        assert!(doc.append_child(text, first).is_err());
    }

    #[test]
    fn replace_with_splices_in_order() {
        let (mut doc, section, first, second) = tree();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.replace_with(first, &[a, b]).expect("replace");
        assert_eq!(doc.children(section), &[a, b, second]);
        assert!(!doc.is_connected(first));
    }

    #[test]
    fn class_helpers_keep_list_tidy() {
        let (mut doc, section, ..) = tree();
        doc.add_class(section, "one");
        doc.add_class(section, "two");
        doc.add_class(section, "one");
        assert_eq!(doc.attribute(section, "class"), Some("one two"));
        doc.remove_class(section, "one");
        assert_eq!(doc.attribute(section, "class"), Some("two"));
        doc.toggle_class(section, "three", true);
        assert!(doc.has_class(section, "three"));
    }

    #[test]
    fn hidden_ancestor_zeroes_bounding_rect() {
        let (mut doc, section, first, _) = tree();
        doc.set_rect(first, Rect::new(10.0, 10.0, 50.0, 30.0));
        assert_eq!(doc.bounding_rect(first).width(), 40.0);
        doc.toggle_attribute(section, "hidden", true);
        assert!(!doc.is_visible(first));
        assert_eq!(doc.bounding_rect(first), Rect::ZERO);
    }

    #[test]
    fn style_attribute_routes_to_declarations() {
        let (mut doc, section, ..) = tree();
        doc.set_attribute(section, "style", "left: 3px");
        assert_eq!(doc.style(section, "left"), Some("3px"));
        assert!(doc.attribute(section, "style").is_none());
        assert!(doc.remove_style(section, "left"));
        assert_eq!(doc.style(section, "left"), None);
    }

    #[test]
    fn generated_ids_skip_existing() {
        let (mut doc, section, ..) = tree();
        doc.set_attribute(section, "id", "tip-1");
        assert_eq!(doc.generate_id("tip"), "tip-2");
        assert_eq!(doc.element_by_id("tip-1"), Some(section));
    }

    #[test]
    fn shadow_tree_is_outside_light_queries() {
        let (mut doc, section, ..) = tree();
        let shadow = doc.attach_shadow(section);
        let inner = doc.create_element("span");
        doc.append_child(shadow, inner).expect("append");
        assert!(doc.is_connected(inner));
        assert!(doc.query(section, &Selector::tag("span")).is_none());
        assert_eq!(doc.parent_element(inner), Some(section));
        assert_eq!(doc.attach_shadow(section), shadow);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (mut doc, section, first, second) = tree();
        doc.set_text_content(first, "Hello ");
        doc.set_text_content(second, "world");
        assert_eq!(doc.text_content(section), "Hello world");
        doc.set_text_content(section, "");
        assert!(doc.children(section).is_empty());
    }

    #[test]
    fn set_text_content_rewrites_comment_data_in_place() {
        let (mut doc, section, ..) = tree();
        let comment = doc.create_comment("old");
        doc.append_child(section, comment).expect("append");
        doc.set_text_content(comment, "new");
        assert!(doc.children(comment).is_empty());
        assert_eq!(doc.outer_html(comment), "<!--new-->");
        assert_eq!(doc.children(section).len(), 3);
    }
}
