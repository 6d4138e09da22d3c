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

//! In-memory host document for enhanced elements.
//!
//! The document is an arena of element, text, comment and shadow-root nodes
//! with the pieces of a browser DOM that behavior code touches: attributes,
//! class lists, inline styles, bounding boxes supplied by the host layout,
//! delegated event listeners and an animation-frame queue. Everything is
//! single-threaded and deterministic so behaviors can be tested natively.
//!
//! Layout: `node.rs` (node storage), `document.rs` (tree, attribute and
//! geometry operations), `selector.rs` (compound selectors), `markup.rs`
//! (fragment parsing and serialization), `event.rs` (listeners and dispatch),
//! `frame.rs` (animation-frame queue), `error.rs` (typed failures).

pub mod document;
pub mod error;
pub mod event;
pub mod frame;
pub mod markup;
pub mod node;
pub mod selector;

pub use document::Document;
pub use error::{DomError, DomResult, MarkupError, SelectorError};
pub use event::{DomEvent, ListenerId};
pub use frame::FrameHandle;
pub use kurbo::Rect;
pub use node::{NodeId, NodeKind};
pub use selector::Selector;
