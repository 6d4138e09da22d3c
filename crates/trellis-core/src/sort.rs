//! Table sort engine.
//!
//! Sortable columns are header cells carrying `data-sortable`; their key is
//! `data-key` (or `column-{index}`) and their comparator family is
//! `data-sort-type`. A cell's `data-sort-value` overrides its text as the
//! sort key. Setting the indicator and moving the rows happen in one call,
//! and only one column carries `aria-sort` at a time.

use std::cmp::Ordering;

use trellis_config::{ColumnConfig, SortDirection, SortType};
use trellis_dom::{Document, DomResult, NodeId, Selector};
use trellis_events::{ChangeEvent, SortDirectionLabel};

/// Class of the button inserted into sortable headers.
pub const HEADER_BUTTON_CLASS: &str = "usa-table__header__button";
/// Per-cell sort key override.
pub const SORT_VALUE: &str = "data-sort-value";

const ARIA_SORT: &str = "aria-sort";

/// One header cell and its parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header cell.
    pub header: NodeId,
    /// Cell index within a row.
    pub index: usize,
    /// Parsed attributes.
    pub config: ColumnConfig,
}

/// Result of a sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Column key.
    pub column: String,
    /// Column label used in announcements.
    pub label: String,
    /// Direction applied.
    pub direction: SortDirection,
}

impl SortOutcome {
    /// Notification for this outcome.
    #[must_use]
    pub fn change(&self) -> ChangeEvent {
        ChangeEvent::SortChanged {
            column: self.column.clone(),
            direction: match self.direction {
                SortDirection::Ascending => SortDirectionLabel::Ascending,
                SortDirection::Descending => SortDirectionLabel::Descending,
            },
        }
    }
}

fn is_cell(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag(node), Some("th" | "td"))
}

fn cells(doc: &Document, row: NodeId) -> Vec<NodeId> {
    doc.element_children(row)
        .into_iter()
        .filter(|cell| is_cell(doc, *cell))
        .collect()
}

/// Header row: the first row of `thead`, else the table's first row.
#[must_use]
pub fn header_row(doc: &Document, table: NodeId) -> Option<NodeId> {
    let row = Selector::tag("tr");
    doc.query(table, &Selector::tag("thead"))
        .and_then(|head| doc.query(head, &row))
        .or_else(|| doc.query(table, &row))
}

/// Columns of the header row, in order.
#[must_use]
pub fn columns(doc: &Document, table: NodeId) -> Vec<Column> {
    let Some(row) = header_row(doc, table) else {
        return Vec::new();
    };
    cells(doc, row)
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let label = doc.text_content(header);
            Column {
                header,
                index,
                config: ColumnConfig::from_attributes(doc.attributes(header), &label, index),
            }
        })
        .collect()
}

/// First `tbody` of the table.
#[must_use]
pub fn body(doc: &Document, table: NodeId) -> Option<NodeId> {
    doc.query(table, &Selector::tag("tbody"))
}

/// Rows of a `tbody`, in document order. A header row placed in the body
/// is included; [`apply`] leaves it in place.
#[must_use]
pub fn rows(doc: &Document, tbody: NodeId) -> Vec<NodeId> {
    doc.element_children(tbody)
        .into_iter()
        .filter(|row| doc.tag(*row) == Some("tr"))
        .collect()
}

/// Sort key of a cell: its override value, else its trimmed text.
#[must_use]
pub fn cell_key(doc: &Document, row: NodeId, index: usize) -> String {
    cells(doc, row).get(index).map_or_else(String::new, |cell| {
        doc.attribute(*cell, SORT_VALUE)
            .map_or_else(|| doc.text_content(*cell).trim().to_string(), str::to_string)
    })
}

/// Caption text, if the table has a non-blank caption.
#[must_use]
pub fn caption(doc: &Document, table: NodeId) -> Option<String> {
    doc.query(table, &Selector::tag("caption"))
        .map(|caption| doc.text_content(caption).trim().to_string())
        .filter(|caption| !caption.is_empty())
}

/// Numeric value of a key; thousands separators are ignored.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Order two keys. Numeric columns put keys that are not numbers after the
/// numbers in both directions.
#[must_use]
pub fn compare(a: &str, b: &str, sort_type: &SortType, direction: SortDirection) -> Ordering {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };
    if !sort_type.is_numeric() {
        return directed(a.cmp(b));
    }
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => directed(x.total_cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => directed(a.cmp(b)),
    }
}

/// Stable ordering of `keys`; equal keys keep their relative order in both
/// directions.
#[must_use]
pub fn order(keys: &[String], sort_type: &SortType, direction: SortDirection) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..keys.len()).collect();
    indices.sort_by(|a, b| compare(&keys[*a], &keys[*b], sort_type, direction));
    indices
}

/// Column currently carrying a sort indicator.
#[must_use]
pub fn active(doc: &Document, table: NodeId) -> Option<(String, SortDirection)> {
    columns(doc, table).into_iter().find_map(|column| {
        doc.attribute(column.header, ARIA_SORT)
            .and_then(SortDirection::from_aria)
            .map(|direction| (column.config.key, direction))
    })
}

/// Title of a header button given the column's current direction.
#[must_use]
pub fn button_title(label: &str, current: Option<SortDirection>) -> String {
    let next = match current {
        Some(SortDirection::Ascending) => SortDirection::Descending,
        _ => SortDirection::Ascending,
    };
    format!("Click to sort by {label} in {} order.", next.as_aria())
}

/// Sort button of a header, inserted when missing.
pub fn ensure_button(doc: &mut Document, column: &Column) -> NodeId {
    if let Some(button) = doc.query(column.header, &Selector::class(HEADER_BUTTON_CLASS)) {
        return button;
    }
    let current = doc
        .attribute(column.header, ARIA_SORT)
        .and_then(SortDirection::from_aria);
    let button = doc.create_element("button");
    doc.set_attribute(button, "tabindex", "0");
    doc.set_attribute(button, "class", HEADER_BUTTON_CLASS);
    doc.set_attribute(button, "title", &button_title(&column.config.label, current));
    if doc.append_child(column.header, button).is_err() {
        tracing::warn!(column = %column.config.key, "header cell rejected its sort button");
    }
    button
}

fn retitle(doc: &mut Document, column: &Column, current: Option<SortDirection>) {
    if let Some(button) = doc.query(column.header, &Selector::class(HEADER_BUTTON_CLASS)) {
        doc.set_attribute(button, "title", &button_title(&column.config.label, current));
    }
}

/// Sort by `column_key`: ascending on first use, then alternating. Unknown
/// or unsortable columns are a no-op and return `None`.
///
/// # Errors
///
/// Propagates tree errors raised while moving rows.
pub fn sort_by(doc: &mut Document, table: NodeId, column_key: &str) -> DomResult<Option<SortOutcome>> {
    let _span = tracing::trace_span!("sort_by", column = column_key).entered();
    let columns = columns(doc, table);
    let Some(column) = columns
        .iter()
        .find(|column| column.config.sortable && column.config.key == column_key)
    else {
        tracing::trace!("unknown sort column");
        return Ok(None);
    };
    let direction = doc
        .attribute(column.header, ARIA_SORT)
        .and_then(SortDirection::from_aria)
        .map_or(SortDirection::Ascending, SortDirection::flipped);
    apply(doc, table, &columns, column, direction).map(Some)
}

/// Put `column` in `direction`: clear every other indicator, set this one
/// and reorder the body rows.
///
/// # Errors
///
/// Propagates tree errors raised while moving rows.
pub fn apply(
    doc: &mut Document,
    table: NodeId,
    columns: &[Column],
    column: &Column,
    direction: SortDirection,
) -> DomResult<SortOutcome> {
    for other in columns
        .iter()
        .filter(|other| other.config.sortable && other.header != column.header)
    {
        doc.remove_attribute(other.header, ARIA_SORT);
        retitle(doc, other, None);
    }
    doc.set_attribute(column.header, ARIA_SORT, direction.as_aria());
    retitle(doc, column, Some(direction));

    if let Some(tbody) = body(doc, table) {
        let header = header_row(doc, table);
        let rows: Vec<NodeId> = rows(doc, tbody)
            .into_iter()
            .filter(|row| Some(*row) != header)
            .collect();
        let keys: Vec<String> = rows
            .iter()
            .map(|row| cell_key(doc, *row, column.index))
            .collect();
        for index in order(&keys, &column.config.sort_type, direction) {
            doc.append_child(tbody, rows[index])?;
        }
    }
    Ok(SortOutcome {
        column: column.config.key.clone(),
        label: column.config.label.clone(),
        direction,
    })
}
