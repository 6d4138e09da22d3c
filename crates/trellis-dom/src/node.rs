//! Node storage for the document arena.

use kurbo::Rect;

/// Handle to a node in a [`Document`](crate::Document).
///
/// Handles stay valid for the lifetime of the document; removed nodes are
/// detached rather than freed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "arena growth past u32::MAX nodes is not supported"
    )]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Element with tag, attributes and inline style.
    Element(ElementData),
    /// Text run.
    Text(String),
    /// Comment.
    Comment(String),
    /// Root of an element's shadow tree.
    ShadowRoot,
}

/// Element payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) style: Vec<(String, String)>,
}

impl ElementData {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: Vec::new(),
        }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|item| item == class))
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut slot.1);
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        before != self.attributes.len()
    }

    pub(crate) fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set_style(&mut self, property: &str, value: &str) {
        if let Some(slot) = self.style.iter_mut().find(|(key, _)| key == property) {
            value.clone_into(&mut slot.1);
        } else {
            self.style.push((property.to_string(), value.to_string()));
        }
    }

    pub(crate) fn remove_style(&mut self, property: &str) -> bool {
        let before = self.style.len();
        self.style.retain(|(key, _)| key != property);
        before != self.style.len()
    }

    pub(crate) fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(key, value)| format!("{key}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub(crate) fn set_style_text(&mut self, text: &str) {
        self.style.clear();
        for declaration in text.split(';') {
            if let Some((key, value)) = declaration.split_once(':') {
                let key = key.trim();
                if !key.is_empty() {
                    self.set_style(key, value.trim());
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) shadow_root: Option<NodeId>,
    pub(crate) rect: Rect,
}

impl Node {
    pub(crate) const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            shadow_root: None,
            rect: Rect::ZERO,
        }
    }

    pub(crate) const fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) const fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) const fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_) | NodeKind::ShadowRoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_lookup_splits_on_whitespace() {
        let mut data = ElementData::new("DIV");
        data.set_attribute("class", "usa-accordion  usa-accordion--bordered");
        assert_eq!(data.tag(), "div");
        assert!(data.has_class("usa-accordion--bordered"));
        assert!(!data.has_class("usa"));
    }

    #[test]
    fn style_text_round_trips_declarations() {
        let mut data = ElementData::new("span");
        data.set_style_text("left: 4px; margin:0 0 0 -2px;;");
        assert_eq!(data.style("margin"), Some("0 0 0 -2px"));
        assert_eq!(data.style_text(), "left: 4px; margin: 0 0 0 -2px;");
        assert!(data.remove_style("left"));
        assert!(!data.remove_style("left"));
    }
}
