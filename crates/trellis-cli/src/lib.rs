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
    rustdoc::broken_intra_doc_links,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Scenario runner for enhanced elements.
//!
//! Layout:
//! - `cli.rs`: argument parsing, settings loading and command dispatch
//! - `error.rs`: exit-code aware errors
//! - `scenario.rs`: mounting an element and applying actions
//! - `output.rs`: text and JSON renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod error;
pub(crate) mod output;
pub(crate) mod scenario;

pub use cli::run;
