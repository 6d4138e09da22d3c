#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Progressive enhancement of server-rendered markup.
//!
//! Each element captures the children an author wrote, renders its template,
//! and after the first animation frame attaches behavior to the rendered
//! structure exactly once per attachment. The behavior engines (disclosure,
//! floating-panel positioning, column sorting) operate on plain document
//! nodes and report what changed; the elements forward those changes as
//! bubbling `trellis:change` events from the host.
//!
//! Layout: `lifecycle.rs` (host state machine and deferred enhancement),
//! `capture.rs` (slotted content snapshots), `disclosure.rs`,
//! `positioning.rs`, `sort.rs` and `announce.rs` (engines), `notify.rs`
//! (change dispatch and journaling), `elements/` (accordion, tooltip,
//! table), `error.rs` (enhancement failures).

pub mod announce;
pub mod capture;
pub mod disclosure;
pub mod elements;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod positioning;
pub mod sort;

pub use capture::{ContentCapture, DEFAULT_SLOT};
pub use elements::{Accordion, SortableTable, Tooltip, TooltipParts};
pub use error::EnhanceError;
pub use lifecycle::{Component, ElementHost, LifecycleState, Registrar, RenderContext};
pub use notify::{Observer, emit};
