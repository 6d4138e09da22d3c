//! `trellis-table`: sortable table with a live announcement region.

use trellis_config::{Politeness, Settings, SortDirection, TableConfig};
use trellis_dom::{Document, DomEvent, DomResult, NodeId, Selector};
use trellis_events::ChangeEvent;

use crate::announce;
use crate::error::EnhanceError;
use crate::lifecycle::{Component, ElementHost, Registrar, RenderContext};
use crate::notify;
use crate::sort::{self, HEADER_BUTTON_CLASS};

/// Custom element tag.
pub const TAG: &str = "trellis-table";

const TABLE_CLASS: &str = "usa-table";

/// Sortable table element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortableTable {
    politeness: Politeness,
}

impl SortableTable {
    /// Table announcing with the configured politeness.
    #[must_use]
    pub const fn new(settings: &Settings) -> Self {
        Self {
            politeness: settings.announcement_politeness,
        }
    }
}

fn find_table(doc: &Document, host: NodeId) -> Option<NodeId> {
    doc.query(host, &Selector::tag("table"))
}

/// Sort the table under `host`, announce the result and notify.
///
/// # Errors
///
/// Propagates tree errors raised while moving rows or placing the region.
pub fn sort_and_announce(
    doc: &mut Document,
    host: NodeId,
    column_key: &str,
    politeness: Politeness,
) -> DomResult<Option<ChangeEvent>> {
    let Some(table) = find_table(doc, host) else {
        return Ok(None);
    };
    let Some(outcome) = sort::sort_by(doc, table, column_key)? else {
        return Ok(None);
    };
    let region = announce::ensure_region(doc, table, politeness)?;
    let sentence = announce::sort_sentence(
        sort::caption(doc, table).as_deref(),
        &outcome.label,
        outcome.direction,
    );
    announce::announce(doc, region, &sentence);
    let change = outcome.change();
    notify::emit(doc, host, std::slice::from_ref(&change));
    Ok(Some(change))
}

fn activate(doc: &mut Document, host: NodeId, politeness: Politeness, event: &mut DomEvent) {
    let Some(button) =
        doc.closest_within(event.target, &Selector::class(HEADER_BUTTON_CLASS), host)
    else {
        return;
    };
    let Some(table) = find_table(doc, host) else {
        return;
    };
    let Some(key) = sort::columns(doc, table)
        .into_iter()
        .find(|column| doc.contains(column.header, button))
        .map(|column| column.config.key)
    else {
        return;
    };
    event.prevent_default();
    if let Err(err) = sort_and_announce(doc, host, &key, politeness) {
        tracing::warn!(error = %err, column = %key, "sort failed");
    }
}

impl Component for SortableTable {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn template(&self, ctx: &RenderContext<'_>) -> String {
        format!(r#"<div class="usa-table-container">{}</div>"#, ctx.content())
    }

    fn reflect(&self, doc: &mut Document, host: NodeId) {
        let Some(table) = find_table(doc, host) else {
            return;
        };
        let config = TableConfig::from_attributes(doc.attributes(host));
        doc.add_class(table, TABLE_CLASS);
        doc.toggle_class(table, "usa-table--striped", config.striped);
        doc.toggle_class(table, "usa-table--borderless", config.borderless);
        doc.toggle_class(table, "usa-table--sticky-header", config.sticky_header);
        let Some(text) = config.caption else {
            return;
        };
        match doc.query(table, &Selector::tag("caption")) {
            Some(caption) => doc.set_text_content(caption, &text),
            None => {
                let caption = doc.create_element("caption");
                doc.set_text_content(caption, &text);
                let first = doc.children(table).first().copied();
                if let Err(err) = doc.insert_before(table, caption, first) {
                    tracing::warn!(error = %err, "caption could not be inserted");
                }
            }
        }
    }

    fn enhance(
        &self,
        doc: &mut Document,
        host: NodeId,
        registrar: &mut Registrar,
    ) -> Result<(), EnhanceError> {
        let table = find_table(doc, host).ok_or(EnhanceError::missing(TAG, "table"))?;
        sort::body(doc, table).ok_or(EnhanceError::missing(TAG, "tbody"))?;
        let columns = sort::columns(doc, table);
        if !columns.iter().any(|column| column.config.sortable) {
            return Err(EnhanceError::missing(TAG, "th[data-sortable]"));
        }

        for column in columns.iter().filter(|column| column.config.sortable) {
            sort::ensure_button(doc, column);
        }
        let region = announce::ensure_region(doc, table, self.politeness)?;
        if let Some((key, direction)) = sort::active(doc, table) {
            if let Some(column) = columns.iter().find(|column| column.config.key == key) {
                let outcome = sort::apply(doc, table, &columns, column, direction)?;
                let sentence = announce::sort_sentence(
                    sort::caption(doc, table).as_deref(),
                    &outcome.label,
                    outcome.direction,
                );
                announce::announce(doc, region, &sentence);
            }
        }

        let politeness = self.politeness;
        registrar.listen(host, "click", move |doc, event| {
            activate(doc, host, politeness, event);
        });
        registrar.listen(host, "keydown", move |doc, event| {
            if matches!(event.key.as_deref(), Some("Enter" | " ")) {
                activate(doc, host, politeness, event);
            }
        });
        Ok(())
    }
}

impl ElementHost<SortableTable> {
    /// Sort by a column key, announce and notify. Unknown columns return
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates tree errors raised while moving rows.
    pub fn sort_by(&self, doc: &mut Document, column_key: &str) -> DomResult<Option<ChangeEvent>> {
        let politeness = self.component().politeness;
        sort_and_announce(doc, self.node(), column_key, politeness)
    }

    /// Column currently carrying a sort indicator.
    #[must_use]
    pub fn active_sort(&self, doc: &Document) -> Option<(String, SortDirection)> {
        find_table(doc, self.node()).and_then(|table| sort::active(doc, table))
    }

    /// Current text of the announcement region.
    #[must_use]
    pub fn announcement(&self, doc: &Document) -> Option<String> {
        let table = find_table(doc, self.node())?;
        announce::find_region(doc, table).map(|region| doc.text_content(region))
    }
}
