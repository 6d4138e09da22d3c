//! Document harness: mounts elements, flushes frames and captures the change
//! notifications that reach the document root.

use anyhow::{Context, Result};
use trellis_config::Settings;
use trellis_core::{Component, ElementHost, Observer};
use trellis_dom::{Document, DomEvent, NodeId, Selector};
use trellis_events::{ChangeEvent, EventEnvelope, EventJournal};

/// Upper bound on frames run by [`Harness::flush`].
pub const FRAME_LIMIT: usize = 16;

/// A document with an attached notification observer.
#[derive(Debug)]
pub struct Harness {
    /// Document under test.
    pub doc: Document,
    /// Settings handed to mounted hosts.
    pub settings: Settings,
    observer: Observer,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Harness with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Harness with explicit settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        let mut doc = Document::new();
        let observer = Observer::new(EventJournal::new());
        observer.attach(&mut doc);
        Self {
            doc,
            settings,
            observer,
        }
    }

    /// Create a host with `attributes` and author `children`, connect it to
    /// the document root and attach it. Enhancement is still pending.
    ///
    /// # Errors
    ///
    /// Fails when the children do not parse or the host cannot be attached.
    pub fn mount<C: Component>(
        &mut self,
        component: C,
        attributes: &[(&str, &str)],
        children: &str,
    ) -> Result<ElementHost<C>> {
        let root = self.doc.root();
        self.mount_into(root, component, attributes, children)
    }

    /// Like [`Harness::mount`] under an explicit parent.
    ///
    /// # Errors
    ///
    /// Fails when the children do not parse or the host cannot be attached.
    pub fn mount_into<C: Component>(
        &mut self,
        parent: NodeId,
        component: C,
        attributes: &[(&str, &str)],
        children: &str,
    ) -> Result<ElementHost<C>> {
        let host = ElementHost::new(&mut self.doc, component, self.settings.clone());
        let node = host.node();
        for (name, value) in attributes {
            self.doc.set_attribute(node, name, value);
        }
        self.doc
            .set_inner_html(node, children)
            .context("author children must parse")?;
        self.doc.append_child(parent, node)?;
        self.observer.track(&host);
        host.attach(&mut self.doc)?;
        Ok(host)
    }

    /// Mount and run frames until enhancement has happened.
    ///
    /// # Errors
    ///
    /// See [`Harness::mount`].
    pub fn mount_enhanced<C: Component>(
        &mut self,
        component: C,
        attributes: &[(&str, &str)],
        children: &str,
    ) -> Result<ElementHost<C>> {
        let host = self.mount(component, attributes, children)?;
        self.flush();
        Ok(host)
    }

    /// Run queued animation frames. Returns the number of frames run.
    pub fn flush(&mut self) -> usize {
        self.doc.run_frames(FRAME_LIMIT)
    }

    /// First element under `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid selector or when nothing matches.
    pub fn find(&self, scope: NodeId, selector: &str) -> Result<NodeId> {
        let parsed = Selector::parse(selector)?;
        self.doc
            .query(scope, &parsed)
            .with_context(|| format!("no element matches {selector}"))
    }

    /// Element with `id` anywhere in the document.
    ///
    /// # Errors
    ///
    /// Fails when no element carries the id.
    pub fn by_id(&self, id: &str) -> Result<NodeId> {
        self.doc
            .element_by_id(id)
            .with_context(|| format!("no element with id {id}"))
    }

    /// Dispatch a click at `target`.
    pub fn click(&mut self, target: NodeId) -> DomEvent {
        self.doc.dispatch(DomEvent::click(target))
    }

    /// Dispatch a keydown for `key` at `target`.
    pub fn press(&mut self, target: NodeId, key: &str) -> DomEvent {
        self.doc.dispatch(DomEvent::keydown(target, key))
    }

    /// Dispatch a pointer entering `target`.
    pub fn hover(&mut self, target: NodeId) -> DomEvent {
        self.doc.dispatch(DomEvent::new("mouseover", target))
    }

    /// Dispatch a pointer leaving `target` for `to`, or for outside the
    /// document when `to` is `None`.
    pub fn leave(&mut self, target: NodeId, to: Option<NodeId>) -> DomEvent {
        let event = DomEvent::new("mouseout", target);
        let event = match to {
            Some(related) => event.with_related_target(related),
            None => event,
        };
        self.doc.dispatch(event)
    }

    /// Dispatch focus entering or leaving `target`.
    pub fn focus(&mut self, target: NodeId, entering: bool) -> DomEvent {
        let kind = if entering { "focusin" } else { "focusout" };
        self.doc.dispatch(DomEvent::new(kind, target))
    }

    /// Change payloads recorded so far.
    #[must_use]
    pub fn changes(&self) -> Vec<ChangeEvent> {
        self.observer.journal().events()
    }

    /// Take every recorded notification.
    pub fn drain(&mut self) -> Vec<EventEnvelope> {
        self.observer.journal().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Accordion;

    #[test]
    fn mount_enhanced_runs_the_deferred_frame() -> Result<()> {
        let mut harness = Harness::new();
        let host = harness.mount_enhanced(
            Accordion,
            &[],
            &crate::fixtures::accordion(&[("a", false)]),
        )?;
        assert!(host.is_initialized());
        assert_eq!(harness.doc.pending_frames(), 0);
        Ok(())
    }

    #[test]
    fn notifications_carry_the_host_instance() -> Result<()> {
        let mut harness = Harness::new();
        let host = harness.mount_enhanced(
            Accordion,
            &[],
            &crate::fixtures::accordion(&[("a", false)]),
        )?;
        let button = harness.find(host.node(), "button.usa-accordion__button")?;
        harness.click(button);
        let recorded = harness.drain();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].host, host.id());
        assert!(harness.changes().is_empty());
        Ok(())
    }
}
