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

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (component markup), harness.rs (document, mounting and
//! notification capture), layout.rs (bounding boxes for geometry tests).

pub mod fixtures;
pub mod harness;
pub mod layout;

pub use harness::Harness;
