//! Lifecycle synchronizer.
//!
//! An [`ElementHost`] drives one element through
//! `Unattached -> Capturing -> Rendered -> Enhancing -> Enhanced -> Detaching`.
//! The initialization flag is set the moment enhancement is scheduled, so a
//! second request while the first is pending returns immediately. The
//! deferred callback holds a weak reference plus the attachment generation
//! and does nothing if the element was dropped, detached or re-attached in
//! the meantime. A host that is still disconnected when the frame arrives
//! returns to `Rendered` with the flag cleared.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use trellis_config::Settings;
use trellis_dom::{Document, DomEvent, DomResult, ListenerId, NodeId};
use uuid::Uuid;

use crate::capture::{ContentCapture, DEFAULT_SLOT};
use crate::error::EnhanceError;

/// Position of an element in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not attached to a document.
    Unattached,
    /// Author content is being captured.
    Capturing,
    /// Template rendered; enhancement not running. Also the resting state
    /// after a failed enhancement.
    Rendered,
    /// Enhancement scheduled and waiting for layout.
    Enhancing,
    /// Enhancement finished; listeners are live.
    Enhanced,
    /// Teardown in progress.
    Detaching,
}

impl LifecycleState {
    /// Stable label for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unattached => "unattached",
            Self::Capturing => "capturing",
            Self::Rendered => "rendered",
            Self::Enhancing => "enhancing",
            Self::Enhanced => "enhanced",
            Self::Detaching => "detaching",
        }
    }
}

/// Inputs available to a template.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    host: NodeId,
    placeholder_attribute: &'a str,
}

impl<'a> RenderContext<'a> {
    /// Context for rendering into `host`.
    #[must_use]
    pub const fn new(host: NodeId, placeholder_attribute: &'a str) -> Self {
        Self {
            host,
            placeholder_attribute,
        }
    }

    /// Host element.
    #[must_use]
    pub const fn host(&self) -> NodeId {
        self.host
    }

    /// Markup for a placeholder that receives the named slot's content.
    #[must_use]
    pub fn placeholder(&self, slot: &str) -> String {
        format!(r#"<span {}="{slot}"></span>"#, self.placeholder_attribute)
    }

    /// Placeholder for the default slot.
    #[must_use]
    pub fn content(&self) -> String {
        self.placeholder(DEFAULT_SLOT)
    }
}

/// Declarative half of an element plus its enhancement routine.
pub trait Component: 'static {
    /// Custom element tag.
    fn tag(&self) -> &'static str;

    /// Markup inserted on the first render pass.
    fn template(&self, ctx: &RenderContext<'_>) -> String;

    /// Mirror host attributes into the rendered subtree. Runs on every
    /// render pass and must tolerate a subtree that is not enhanced yet.
    fn reflect(&self, _doc: &mut Document, _host: NodeId) {}

    /// Transform the rendered subtree and stage delegated listeners.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::MissingAnchor`] when expected structure is
    /// absent. Implementations locate every anchor before mutating the tree.
    fn enhance(
        &self,
        doc: &mut Document,
        host: NodeId,
        registrar: &mut Registrar,
    ) -> Result<(), EnhanceError>;
}

type StagedHandler = Box<dyn Fn(&mut Document, &mut DomEvent)>;

/// Listener staging area handed to [`Component::enhance`].
///
/// Nothing reaches the document until enhancement returns `Ok`.
pub struct Registrar {
    placeholder_attribute: String,
    staged: Vec<(NodeId, String, StagedHandler)>,
    discarded: Vec<String>,
}

impl fmt::Debug for Registrar {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registrar")
            .field("placeholder_attribute", &self.placeholder_attribute)
            .field("staged", &self.staged.len())
            .field("discarded", &self.discarded)
            .finish()
    }
}

impl Registrar {
    /// Empty registrar creating placeholders with `placeholder_attribute`.
    #[must_use]
    pub fn new(placeholder_attribute: &str) -> Self {
        Self {
            placeholder_attribute: placeholder_attribute.to_string(),
            staged: Vec::new(),
            discarded: Vec::new(),
        }
    }

    /// Stage a delegated listener. A second listener for the same node and
    /// event type is refused and `false` is returned.
    pub fn listen(
        &mut self,
        node: NodeId,
        kind: &str,
        handler: impl Fn(&mut Document, &mut DomEvent) + 'static,
    ) -> bool {
        if self
            .staged
            .iter()
            .any(|(staged_node, staged_kind, _)| *staged_node == node && staged_kind == kind)
        {
            return false;
        }
        self.staged
            .push((node, kind.to_string(), Box::new(handler)));
        true
    }

    /// Create a detached placeholder for content that can only be placed
    /// once enhancement has built its container.
    pub fn placeholder(&self, doc: &mut Document, slot: &str) -> NodeId {
        let placeholder = doc.create_element("span");
        doc.set_attribute(placeholder, &self.placeholder_attribute, slot);
        placeholder
    }

    /// Mark a slot whose captured content will never be placed. Its
    /// snapshot is dropped once enhancement succeeds.
    pub fn discard(&mut self, slot: &str) {
        if !self.discarded.iter().any(|existing| existing == slot) {
            self.discarded.push(slot.to_string());
        }
    }

    /// Attribute marking placeholders.
    #[must_use]
    pub fn placeholder_attribute(&self) -> &str {
        &self.placeholder_attribute
    }

    /// Number of staged listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    fn commit(self, doc: &mut Document) -> Vec<ListenerId> {
        self.staged
            .into_iter()
            .map(|(node, kind, handler)| doc.add_listener(node, &kind, handler))
            .collect()
    }
}

struct HostInner<C> {
    id: Uuid,
    node: NodeId,
    component: Rc<C>,
    settings: Settings,
    capture: ContentCapture,
    state: LifecycleState,
    initialized: bool,
    generation: u64,
    rendered: bool,
    listeners: Vec<ListenerId>,
}

/// One element instance and the state that synchronizes it.
pub struct ElementHost<C: Component> {
    inner: Rc<RefCell<HostInner<C>>>,
}

impl<C: Component> Clone for ElementHost<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: Component> fmt::Debug for ElementHost<C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        formatter
            .debug_struct("ElementHost")
            .field("id", &inner.id)
            .field("tag", &inner.component.tag())
            .field("node", &inner.node)
            .field("state", &inner.state)
            .field("initialized", &inner.initialized)
            .finish_non_exhaustive()
    }
}

impl<C: Component> ElementHost<C> {
    /// Create a detached host element for `component`.
    pub fn new(doc: &mut Document, component: C, settings: Settings) -> Self {
        let node = doc.create_element(component.tag());
        Self::adopt(node, component, settings)
    }

    /// Drive an existing element, e.g. one produced by parsed markup.
    #[must_use]
    pub fn adopt(node: NodeId, component: C, settings: Settings) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostInner {
                id: Uuid::new_v4(),
                node,
                component: Rc::new(component),
                settings,
                capture: ContentCapture::new(),
                state: LifecycleState::Unattached,
                initialized: false,
                generation: 0,
                rendered: false,
                listeners: Vec::new(),
            })),
        }
    }

    /// Instance identifier carried by notifications.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.borrow().id
    }

    /// Host element.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.inner.borrow().node
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.inner.borrow().state
    }

    /// Initialization flag.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.borrow().initialized
    }

    /// Number of committed delegated listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Whether captured content is still waiting for a placeholder.
    #[must_use]
    pub fn has_pending_content(&self) -> bool {
        self.inner.borrow().capture.has_pending()
    }

    /// Shared handle to the component.
    #[must_use]
    pub fn component(&self) -> Rc<C> {
        Rc::clone(&self.inner.borrow().component)
    }

    /// Settings the host was created with.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.inner.borrow().settings.clone()
    }

    /// Set or clear the explicit content override, then run a render pass.
    ///
    /// # Errors
    ///
    /// Propagates markup errors from the override.
    pub fn set_content_override(&self, doc: &mut Document, markup: Option<String>) -> DomResult<()> {
        self.inner.borrow_mut().capture.set_override(markup);
        self.request_update(doc)
    }

    /// Capture content, render, and schedule enhancement. Ignored unless the
    /// host is unattached.
    ///
    /// # Errors
    ///
    /// Propagates template markup errors; the host is left rendered without
    /// enhancement.
    pub fn attach(&self, doc: &mut Document) -> DomResult<()> {
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if inner.state != LifecycleState::Unattached {
                return Ok(());
            }
            inner.state = LifecycleState::Capturing;
            inner.capture.capture(doc, inner.node);
            tracing::debug!(host = %inner.id, tag = inner.component.tag(), "attached");
        }
        let rendered = self.render(doc);
        self.inner.borrow_mut().state = LifecycleState::Rendered;
        rendered?;
        self.schedule_enhancement(doc);
        Ok(())
    }

    /// Property write: run a render pass and request enhancement, which is a
    /// no-op once the initialization flag is set.
    ///
    /// # Errors
    ///
    /// Propagates markup errors raised while reapplying content.
    pub fn request_update(&self, doc: &mut Document) -> DomResult<()> {
        if self.state() == LifecycleState::Unattached {
            return Ok(());
        }
        self.render(doc)?;
        self.schedule_enhancement(doc);
        Ok(())
    }

    /// Remove committed listeners and reset the initialization flag.
    /// Returns the number of listeners removed; repeated calls return zero.
    pub fn detach(&self, doc: &mut Document) -> usize {
        let (id, listeners) = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == LifecycleState::Unattached {
                return 0;
            }
            inner.state = LifecycleState::Detaching;
            inner.initialized = false;
            inner.generation += 1;
            (inner.id, std::mem::take(&mut inner.listeners))
        };
        let removed = listeners
            .into_iter()
            .filter(|listener| doc.remove_listener(*listener))
            .count();
        self.inner.borrow_mut().state = LifecycleState::Unattached;
        tracing::debug!(host = %id, removed, "detached");
        removed
    }

    fn render(&self, doc: &mut Document) -> DomResult<()> {
        let (component, node, attribute, first) = {
            let inner = self.inner.borrow();
            (
                Rc::clone(&inner.component),
                inner.node,
                inner.settings.placeholder_attribute.clone(),
                !inner.rendered,
            )
        };
        if first {
            let markup = component.template(&RenderContext::new(node, &attribute));
            doc.set_inner_html(node, &markup)?;
            self.inner.borrow_mut().rendered = true;
        }
        reapply(&self.inner, doc)?;
        component.reflect(doc, node);
        Ok(())
    }

    fn schedule_enhancement(&self, doc: &mut Document) {
        let (generation, frames) = {
            let mut inner = self.inner.borrow_mut();
            if inner.initialized || inner.state != LifecycleState::Rendered {
                return;
            }
            inner.initialized = true;
            inner.state = LifecycleState::Enhancing;
            (inner.generation, inner.settings.frame_deferral.max(1))
        };
        defer(doc, Rc::downgrade(&self.inner), generation, frames);
    }
}

fn reapply<C>(shared: &RefCell<HostInner<C>>, doc: &mut Document) -> DomResult<usize> {
    let mut guard = shared.borrow_mut();
    let inner = &mut *guard;
    inner
        .capture
        .reapply(doc, inner.node, &inner.settings.placeholder_attribute)
}

fn defer<C: Component>(
    doc: &mut Document,
    host: Weak<RefCell<HostInner<C>>>,
    generation: u64,
    remaining: u32,
) {
    doc.request_animation_frame(move |doc| {
        if remaining > 1 {
            defer(doc, host, generation, remaining - 1);
        } else {
            enhance_now(doc, &host, generation);
        }
    });
}

fn enhance_now<C: Component>(
    doc: &mut Document,
    host: &Weak<RefCell<HostInner<C>>>,
    generation: u64,
) {
    let Some(shared) = host.upgrade() else {
        return;
    };
    let (component, node, id, attribute) = {
        let mut inner = shared.borrow_mut();
        if inner.generation != generation || inner.state != LifecycleState::Enhancing {
            return;
        }
        if !doc.is_connected(inner.node) {
            // Back to rest so the next update after connecting schedules again.
            inner.state = LifecycleState::Rendered;
            inner.initialized = false;
            tracing::debug!(host = %inner.id, "host disconnected; enhancement postponed");
            return;
        }
        (
            Rc::clone(&inner.component),
            inner.node,
            inner.id,
            inner.settings.placeholder_attribute.clone(),
        )
    };

    let mut registrar = Registrar::new(&attribute);
    let _span = tracing::debug_span!("enhance", host = %id, tag = component.tag()).entered();
    match component.enhance(doc, node, &mut registrar) {
        Ok(()) => {
            let discarded = std::mem::take(&mut registrar.discarded);
            let listeners = registrar.commit(doc);
            let count = listeners.len();
            {
                let mut inner = shared.borrow_mut();
                inner.listeners = listeners;
                inner.state = LifecycleState::Enhanced;
                for slot in &discarded {
                    inner.capture.discard(slot);
                }
            }
            if let Err(err) = reapply(&shared, doc) {
                tracing::warn!(error = %err, "captured content could not be reapplied");
            }
            tracing::debug!(listeners = count, "enhanced");
        }
        Err(err) => {
            drop(registrar);
            shared.borrow_mut().state = LifecycleState::Rendered;
            tracing::warn!(error = %err, "enhancement aborted; element left rendered");
        }
    }
}
