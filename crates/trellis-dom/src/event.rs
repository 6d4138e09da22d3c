//! Event listeners and dispatch.
//!
//! Dispatch follows the DOM's target and bubble phases: listeners on the
//! target run first, then listeners on each ancestor. Events that are not
//! `composed` stop at the first shadow root on the path. Listeners receive
//! the document mutably, so delegated handlers can rewrite the tree they are
//! attached to.

use std::rc::Rc;

use trellis_events::{CHANGE_EVENT_TYPE, ChangeEvent};

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

/// Listener callback.
pub type Handler = Rc<dyn Fn(&mut Document, &mut DomEvent)>;

/// Handle returned by [`Document::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub(crate) struct Registration {
    id: ListenerId,
    node: NodeId,
    kind: String,
    handler: Handler,
}

/// Event travelling through the document.
#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    /// Event type, e.g. `click`.
    pub kind: String,
    /// Node the event was dispatched at.
    pub target: NodeId,
    /// Node whose listeners are currently running.
    pub current_target: NodeId,
    /// Whether the event continues past the target.
    pub bubbles: bool,
    /// Whether the event crosses shadow root boundaries.
    pub composed: bool,
    /// Key name for keyboard events.
    pub key: Option<String>,
    /// Node focus or the pointer moves to, for focus and pointer transitions.
    pub related_target: Option<NodeId>,
    /// Structured payload of change notifications.
    pub detail: Option<ChangeEvent>,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl DomEvent {
    /// Bubbling, non-composed event of the given type.
    #[must_use]
    pub fn new(kind: &str, target: NodeId) -> Self {
        Self {
            kind: kind.to_string(),
            target,
            current_target: target,
            bubbles: true,
            composed: false,
            key: None,
            related_target: None,
            detail: None,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Pointer activation.
    #[must_use]
    pub fn click(target: NodeId) -> Self {
        Self {
            composed: true,
            ..Self::new("click", target)
        }
    }

    /// Key press with the given key name.
    #[must_use]
    pub fn keydown(target: NodeId, key: &str) -> Self {
        Self {
            composed: true,
            key: Some(key.to_string()),
            ..Self::new("keydown", target)
        }
    }

    /// Change notification: bubbles and crosses shadow boundaries.
    #[must_use]
    pub fn change(target: NodeId, detail: ChangeEvent) -> Self {
        Self {
            composed: true,
            detail: Some(detail),
            ..Self::new(CHANGE_EVENT_TYPE, target)
        }
    }

    /// Make the event stop at its target.
    #[must_use]
    pub const fn non_bubbling(mut self) -> Self {
        self.bubbles = false;
        self
    }

    /// Set the related target.
    #[must_use]
    pub const fn with_related_target(mut self, related: NodeId) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Skip listeners on ancestors of the current target.
    pub const fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Mark the default action as cancelled.
    pub const fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a listener called [`DomEvent::prevent_default`].
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether a listener called [`DomEvent::stop_propagation`].
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

impl Document {
    /// Register a listener for `kind` events reaching `node`.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        kind: &str,
        handler: impl Fn(&mut Self, &mut DomEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Registration {
            id,
            node,
            kind: kind.to_string(),
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a listener, returning whether it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|registration| registration.id != id);
        before != self.listeners.len()
    }

    /// Number of listeners of `kind` registered directly on `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId, kind: &str) -> usize {
        self.listeners
            .iter()
            .filter(|registration| registration.node == node && registration.kind == kind)
            .count()
    }

    /// Total number of registered listeners.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    fn propagation_path(&self, event: &DomEvent) -> Vec<NodeId> {
        let mut path = vec![event.target];
        if !event.bubbles {
            return path;
        }
        let mut cursor = event.target;
        loop {
            if matches!(self.kind(cursor), NodeKind::ShadowRoot) && !event.composed {
                break;
            }
            let Some(parent) = self.parent(cursor) else {
                break;
            };
            path.push(parent);
            cursor = parent;
        }
        path
    }

    /// Dispatch an event and return it after every listener has run.
    ///
    /// Listeners added during dispatch do not run for this event; listeners
    /// removed during dispatch are skipped.
    pub fn dispatch(&mut self, mut event: DomEvent) -> DomEvent {
        let path = self.propagation_path(&event);
        tracing::trace!(kind = %event.kind, target = ?event.target, depth = path.len(), "dispatch");
        for node in path {
            let batch: Vec<(ListenerId, Handler)> = self
                .listeners
                .iter()
                .filter(|registration| registration.node == node && registration.kind == event.kind)
                .map(|registration| (registration.id, Rc::clone(&registration.handler)))
                .collect();
            event.current_target = node;
            for (id, handler) in batch {
                if self.listeners.iter().any(|registration| registration.id == id) {
                    handler(self, &mut event);
                }
            }
            if event.propagation_stopped {
                break;
            }
        }
        event
    }
}
