//! `trellis-accordion`: disclosure engine behind a delegated click listener.

use trellis_config::AccordionConfig;
use trellis_dom::{Document, DomEvent, NodeId, Selector};
use trellis_events::ChangeEvent;

use crate::disclosure::{self, BUTTON_CLASS, MULTISELECTABLE, ROOT_CLASS};
use crate::error::EnhanceError;
use crate::lifecycle::{Component, ElementHost, Registrar, RenderContext};
use crate::notify;

/// Custom element tag.
pub const TAG: &str = "trellis-accordion";

const BORDERED_CLASS: &str = "usa-accordion--bordered";

/// Accordion element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accordion;

fn group_root(doc: &Document, host: NodeId) -> Option<NodeId> {
    doc.query(host, &Selector::class(ROOT_CLASS))
}

fn on_click(doc: &mut Document, host: NodeId, root: NodeId, event: &mut DomEvent) {
    let Some(button) = doc.closest_within(event.target, &Selector::class(BUTTON_CLASS), host)
    else {
        return;
    };
    if doc.closest(button, &Selector::class(ROOT_CLASS)) != Some(root) {
        return;
    }
    let Some(item_id) = doc.attribute(button, "aria-controls").map(str::to_string) else {
        return;
    };
    event.prevent_default();
    let changes = disclosure::toggle(doc, root, &item_id);
    notify::emit(doc, host, &changes);
}

impl Component for Accordion {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn template(&self, ctx: &RenderContext<'_>) -> String {
        format!(r#"<div class="{ROOT_CLASS}">{}</div>"#, ctx.content())
    }

    fn reflect(&self, doc: &mut Document, host: NodeId) {
        let Some(root) = group_root(doc, host) else {
            return;
        };
        let config = AccordionConfig::from_attributes(doc.attributes(host));
        doc.toggle_attribute(root, MULTISELECTABLE, config.multiselectable);
        doc.toggle_class(root, BORDERED_CLASS, config.bordered);
    }

    fn enhance(
        &self,
        doc: &mut Document,
        host: NodeId,
        registrar: &mut Registrar,
    ) -> Result<(), EnhanceError> {
        let root = group_root(doc, host).ok_or(EnhanceError::missing(TAG, ".usa-accordion"))?;
        if disclosure::items(doc, root).is_empty() {
            return Err(EnhanceError::missing(
                TAG,
                "button.usa-accordion__button[aria-controls]",
            ));
        }
        disclosure::normalize(doc, root);
        registrar.listen(host, "click", move |doc, event| {
            on_click(doc, host, root, event);
        });
        Ok(())
    }
}

impl ElementHost<Accordion> {
    fn run(
        &self,
        doc: &mut Document,
        item_id: &str,
        operation: fn(&mut Document, NodeId, &str) -> Vec<ChangeEvent>,
    ) -> Vec<ChangeEvent> {
        let host = self.node();
        let Some(root) = group_root(doc, host) else {
            return Vec::new();
        };
        let changes = operation(doc, root, item_id);
        notify::emit(doc, host, &changes);
        changes
    }

    /// Flip an item and notify.
    pub fn toggle(&self, doc: &mut Document, item_id: &str) -> Vec<ChangeEvent> {
        self.run(doc, item_id, disclosure::toggle)
    }

    /// Expand an item and notify.
    pub fn expand(&self, doc: &mut Document, item_id: &str) -> Vec<ChangeEvent> {
        self.run(doc, item_id, disclosure::expand)
    }

    /// Collapse an item and notify.
    pub fn collapse(&self, doc: &mut Document, item_id: &str) -> Vec<ChangeEvent> {
        self.run(doc, item_id, disclosure::collapse)
    }

    /// Ids of expanded items.
    #[must_use]
    pub fn expanded(&self, doc: &Document) -> Vec<String> {
        group_root(doc, self.node())
            .map(|root| disclosure::expanded_ids(doc, root))
            .unwrap_or_default()
    }
}
