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

//! Declarative configuration surface for enhanced elements.
//!
//! Layout: `attributes.rs` (typed attribute values and the
//! [`AttributeSource`] seam), `components.rs` (per-element configs parsed from
//! attributes), `settings.rs` (runtime settings loaded from JSON),
//! `error.rs` (configuration errors).

pub mod attributes;
pub mod components;
pub mod error;
pub mod settings;

pub use attributes::{AttributeSource, Position, Side, SortDirection, SortType, flag};
pub use components::{AccordionConfig, ColumnConfig, TableConfig, TooltipConfig};
pub use error::{ConfigError, ConfigResult};
pub use settings::{Politeness, SETTINGS_ENV, Settings};
