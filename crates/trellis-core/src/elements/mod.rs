//! Concrete enhanced elements built on the lifecycle synchronizer.

pub mod accordion;
pub mod table;
pub mod tooltip;

pub use accordion::Accordion;
pub use table::SortableTable;
pub use tooltip::{Tooltip, TooltipParts};
