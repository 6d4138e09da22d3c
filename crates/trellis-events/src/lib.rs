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

//! Change notifications emitted by enhanced elements.
//!
//! Layout: `payloads.rs` (typed notification enum and envelope), `journal.rs`
//! (sequential ids and a bounded replay ring for observers), `error.rs`
//! (journal construction errors), `topics.rs` (stable kind strings).

pub mod error;
pub mod journal;
pub mod payloads;
pub mod topics;

pub use error::{JournalError, JournalResult};
pub use journal::EventJournal;
pub use payloads::{
    CHANGE_EVENT_TYPE, ChangeEvent, DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId,
    SortDirectionLabel,
};
