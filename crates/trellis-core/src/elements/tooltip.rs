//! `trellis-tooltip`: wraps the author's trigger and shows a positioned body
//! on hover and focus.
//!
//! The body text comes from the `label` attribute, falling back to the
//! trigger's `title`. Without either, children with `slot="body"` fill the
//! body once enhancement has created it.

use trellis_config::{Settings, TooltipConfig};
use trellis_dom::{Document, DomEvent, NodeId, Selector};
use trellis_events::ChangeEvent;

use crate::error::EnhanceError;
use crate::lifecycle::{Component, ElementHost, Registrar, RenderContext};
use crate::notify;
use crate::positioning::{self, BODY_CLASS, TRIGGER_CLASS, WRAPPER_CLASS};

/// Custom element tag.
pub const TAG: &str = "trellis-tooltip";
/// Slot whose content fills an unlabelled body.
pub const BODY_SLOT: &str = "body";

const FOCUSABLE: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Tooltip element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    gap: f64,
}

impl Tooltip {
    /// Tooltip using the configured trigger gap.
    #[must_use]
    pub const fn new(settings: &Settings) -> Self {
        Self {
            gap: settings.tooltip_gap_px,
        }
    }

    /// Distance between trigger and body, in px.
    #[must_use]
    pub const fn gap(&self) -> f64 {
        self.gap
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

/// Enhanced structure of a tooltip host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipParts {
    /// `span.usa-tooltip` wrapper.
    pub wrapper: NodeId,
    /// Author trigger.
    pub trigger: NodeId,
    /// Floating body.
    pub body: NodeId,
}

/// Locate the enhanced structure under `host`.
#[must_use]
pub fn parts(doc: &Document, host: NodeId) -> Option<TooltipParts> {
    let wrapper = doc.query(host, &Selector::class(WRAPPER_CLASS))?;
    Some(TooltipParts {
        wrapper,
        trigger: doc.query(wrapper, &Selector::class(TRIGGER_CLASS))?,
        body: doc.query(wrapper, &Selector::class(BODY_CLASS))?,
    })
}

/// Show the body of the tooltip under `host` and notify.
pub fn show_panel(doc: &mut Document, host: NodeId, gap: f64) -> Option<ChangeEvent> {
    let parts = parts(doc, host)?;
    let config = TooltipConfig::from_attributes(doc.attributes(host));
    let change = positioning::show(doc, Some(parts.trigger), parts.body, &config.position, gap);
    notify::emit(doc, host, change.as_slice());
    change
}

/// Hide the body of the tooltip under `host` and notify.
pub fn hide_panel(doc: &mut Document, host: NodeId) -> Option<ChangeEvent> {
    let parts = parts(doc, host)?;
    let change = positioning::hide(doc, parts.body);
    notify::emit(doc, host, change.as_slice());
    change
}

fn within_trigger(doc: &Document, host: NodeId, node: NodeId) -> bool {
    doc.closest_within(node, &Selector::class(TRIGGER_CLASS), host)
        .is_some()
}

fn build(
    doc: &mut Document,
    host: NodeId,
    registrar: &mut Registrar,
) -> Result<(), EnhanceError> {
    let trigger = doc
        .element_children(host)
        .into_iter()
        .find(|child| !doc.has_attribute(*child, registrar.placeholder_attribute()))
        .ok_or(EnhanceError::missing(TAG, "trigger element"))?;

    let config = TooltipConfig::from_attributes(doc.attributes(host));
    let label = if config.label.is_empty() {
        doc.attribute(trigger, "title").unwrap_or_default().to_string()
    } else {
        config.label
    };

    let wrapper = doc.create_element("span");
    doc.set_attribute(wrapper, "class", WRAPPER_CLASS);
    doc.replace_with(trigger, &[wrapper])?;
    doc.append_child(wrapper, trigger)?;
    doc.add_class(trigger, TRIGGER_CLASS);
    doc.remove_attribute(trigger, "title");
    if !doc.tag(trigger).is_some_and(|tag| FOCUSABLE.contains(&tag)) {
        doc.set_attribute(trigger, "tabindex", "0");
    }

    let body = doc.create_element("span");
    let body_id = doc.generate_id("tooltip");
    doc.set_attribute(body, "id", &body_id);
    doc.set_attribute(body, "class", BODY_CLASS);
    doc.set_attribute(body, "role", "tooltip");
    doc.set_attribute(body, "aria-hidden", "true");
    if label.is_empty() {
        let placeholder = registrar.placeholder(doc, BODY_SLOT);
        doc.append_child(body, placeholder)?;
    } else {
        registrar.discard(BODY_SLOT);
        doc.set_text_content(body, &label);
    }
    doc.append_child(wrapper, body)?;
    doc.set_attribute(trigger, "aria-describedby", &body_id);
    Ok(())
}

impl Component for Tooltip {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn template(&self, ctx: &RenderContext<'_>) -> String {
        ctx.content()
    }

    fn reflect(&self, doc: &mut Document, host: NodeId) {
        let Some(parts) = parts(doc, host) else {
            return;
        };
        let config = TooltipConfig::from_attributes(doc.attributes(host));
        doc.set_attribute(parts.trigger, "data-position", config.position.as_str());
        if !config.label.is_empty() && doc.text_content(parts.body) != config.label {
            doc.set_text_content(parts.body, &config.label);
        }
    }

    fn enhance(
        &self,
        doc: &mut Document,
        host: NodeId,
        registrar: &mut Registrar,
    ) -> Result<(), EnhanceError> {
        if parts(doc, host).is_none() {
            build(doc, host, registrar)?;
        }
        self.reflect(doc, host);

        let gap = self.gap;
        let show = move |doc: &mut Document, event: &mut DomEvent| {
            if within_trigger(doc, host, event.target) {
                show_panel(doc, host, gap);
            }
        };
        registrar.listen(host, "mouseover", show);
        registrar.listen(host, "focusin", show);
        registrar.listen(host, "mouseout", move |doc, event| {
            let leaving = within_trigger(doc, host, event.target)
                && !event
                    .related_target
                    .is_some_and(|related| within_trigger(doc, host, related));
            if leaving {
                hide_panel(doc, host);
            }
        });
        registrar.listen(host, "focusout", move |doc, _| {
            hide_panel(doc, host);
        });
        registrar.listen(host, "keydown", move |doc, event| {
            if event.key.as_deref() == Some("Escape") && hide_panel(doc, host).is_some() {
                event.prevent_default();
            }
        });
        Ok(())
    }
}

impl ElementHost<Tooltip> {
    /// Show the body, recomputing its placement.
    pub fn show(&self, doc: &mut Document) -> Option<ChangeEvent> {
        show_panel(doc, self.node(), self.component().gap())
    }

    /// Hide the body.
    pub fn hide(&self, doc: &mut Document) -> Option<ChangeEvent> {
        hide_panel(doc, self.node())
    }

    /// Enhanced structure, once enhancement has run.
    #[must_use]
    pub fn parts(&self, doc: &Document) -> Option<TooltipParts> {
        parts(doc, self.node())
    }

    /// Whether the body is shown.
    #[must_use]
    pub fn is_shown(&self, doc: &Document) -> bool {
        self.parts(doc)
            .is_some_and(|parts| positioning::is_shown(doc, parts.body))
    }
}
