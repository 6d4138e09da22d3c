//! Change notifications.
//!
//! Engines return the transitions they performed; elements dispatch them at
//! the host as composed, bubbling events so page code can listen anywhere
//! above the element. [`Observer`] is the page-side half: one listener on the
//! document root that records every notification into an [`EventJournal`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use trellis_dom::{Document, DomEvent, ListenerId, NodeId};
use trellis_events::{CHANGE_EVENT_TYPE, ChangeEvent, EventJournal};
use uuid::Uuid;

use crate::lifecycle::{Component, ElementHost};

/// Dispatch one change event per transition at `origin`.
pub fn emit(doc: &mut Document, origin: NodeId, changes: &[ChangeEvent]) {
    for change in changes {
        tracing::trace!(kind = change.kind(), subject = change.subject(), "notify");
        doc.dispatch(DomEvent::change(origin, change.clone()));
    }
}

/// Records notifications that reach the document root.
#[derive(Debug, Clone, Default)]
pub struct Observer {
    journal: EventJournal,
    hosts: Rc<RefCell<HashMap<NodeId, Uuid>>>,
}

impl Observer {
    /// Observer writing into `journal`.
    #[must_use]
    pub fn new(journal: EventJournal) -> Self {
        Self {
            journal,
            hosts: Rc::default(),
        }
    }

    /// Attribute notifications from `host`'s element to its instance id.
    /// Notifications from untracked elements are recorded with the nil id.
    pub fn track<C: Component>(&self, host: &ElementHost<C>) {
        self.hosts.borrow_mut().insert(host.node(), host.id());
    }

    /// Register the root listener.
    pub fn attach(&self, doc: &mut Document) -> ListenerId {
        let journal = self.journal.clone();
        let hosts = Rc::clone(&self.hosts);
        doc.add_listener(doc.root(), CHANGE_EVENT_TYPE, move |doc, event| {
            let Some(detail) = event.detail.clone() else {
                return;
            };
            let hosts = hosts.borrow();
            let mut cursor = Some(event.target);
            let mut instance = Uuid::nil();
            while let Some(node) = cursor {
                if let Some(id) = hosts.get(&node) {
                    instance = *id;
                    break;
                }
                cursor = doc.parent(node);
            }
            journal.record(instance, detail);
        })
    }

    /// Journal receiving the notifications.
    #[must_use]
    pub const fn journal(&self) -> &EventJournal {
        &self.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_notifications_use_nil_id() {
        let mut doc = Document::new();
        let item = doc.create_element("div");
        doc.append_child(doc.root(), item).expect("append");
        let observer = Observer::default();
        observer.attach(&mut doc);

        emit(
            &mut doc,
            item,
            &[ChangeEvent::PanelVisibilityChanged {
                panel_id: "tip".into(),
                visible: true,
            }],
        );

        let recorded = observer.journal().drain();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].host, Uuid::nil());
        assert_eq!(recorded[0].event.kind(), "panel_visibility_changed");
    }

    #[test]
    fn detached_origin_reaches_nobody() {
        let mut doc = Document::new();
        let loose = doc.create_element("div");
        let observer = Observer::default();
        observer.attach(&mut doc);
        emit(
            &mut doc,
            loose,
            &[ChangeEvent::DisclosureChanged {
                item_id: "a".into(),
                expanded: true,
            }],
        );
        assert!(observer.journal().is_empty());
    }
}
