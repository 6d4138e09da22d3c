//! Per-element configuration parsed from host attributes.

use crate::attributes::{AttributeSource, Position, SortType, flag};

/// Configuration of an accordion host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccordionConfig {
    /// Allow several items to be expanded at once.
    pub multiselectable: bool,
    /// Render the bordered variant.
    pub bordered: bool,
}

impl AccordionConfig {
    /// Read `multiselectable` and `bordered` from the host.
    #[must_use]
    pub fn from_attributes(source: &(impl AttributeSource + ?Sized)) -> Self {
        Self {
            multiselectable: flag(source, "multiselectable"),
            bordered: flag(source, "bordered"),
        }
    }

    /// Whether the group allows at most one expanded item.
    #[must_use]
    pub const fn exclusive(&self) -> bool {
        !self.multiselectable
    }
}

/// Configuration of a tooltip host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TooltipConfig {
    /// Preferred side; authoritative even when it overflows the viewport.
    pub position: Position,
    /// Tooltip body text.
    pub label: String,
}

impl TooltipConfig {
    /// Read `position` and `label` from the host.
    #[must_use]
    pub fn from_attributes(source: &(impl AttributeSource + ?Sized)) -> Self {
        Self {
            position: source
                .attribute("position")
                .map(Position::parse)
                .unwrap_or_default(),
            label: source.attribute("label").unwrap_or_default().to_string(),
        }
    }
}

/// Configuration of a table host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConfig {
    /// Caption text; also used in sort announcements.
    pub caption: Option<String>,
    /// Zebra striping.
    pub striped: bool,
    /// Borderless variant.
    pub borderless: bool,
    /// Sticky header row.
    pub sticky_header: bool,
}

impl TableConfig {
    /// Read `caption`, `striped`, `borderless` and `sticky-header` from the host.
    #[must_use]
    pub fn from_attributes(source: &(impl AttributeSource + ?Sized)) -> Self {
        Self {
            caption: source
                .attribute("caption")
                .map(str::trim)
                .filter(|caption| !caption.is_empty())
                .map(str::to_string),
            striped: flag(source, "striped"),
            borderless: flag(source, "borderless"),
            sticky_header: flag(source, "sticky-header"),
        }
    }
}

/// Configuration of one table column, read from its header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    /// Stable key used by `sort_by`.
    pub key: String,
    /// Human-readable column name.
    pub label: String,
    /// Comparator family.
    pub sort_type: SortType,
    /// Whether the column accepts sorting.
    pub sortable: bool,
}

impl ColumnConfig {
    /// Read `data-key`, `data-sort-type` and `data-sortable` from a header.
    ///
    /// Columns without a key fall back to `column-{index}`.
    #[must_use]
    pub fn from_attributes(
        source: &(impl AttributeSource + ?Sized),
        label: &str,
        index: usize,
    ) -> Self {
        let key = source
            .attribute("data-key")
            .filter(|key| !key.is_empty())
            .map_or_else(|| format!("column-{index}"), str::to_string);
        Self {
            key,
            label: label.trim().to_string(),
            sort_type: source
                .attribute("data-sort-type")
                .map(SortType::parse)
                .unwrap_or_default(),
            sortable: flag(source, "data-sortable"),
        }
    }
}
