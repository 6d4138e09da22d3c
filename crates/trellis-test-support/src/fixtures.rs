//! Markup authors would write inside each element.

use std::fmt::Write as _;

/// One accordion item: heading button plus content region.
#[must_use]
pub fn accordion_item(id: &str, heading: &str, expanded: bool) -> String {
    format!(
        r#"<h4 class="usa-accordion__heading"><button type="button" class="usa-accordion__button" aria-expanded="{expanded}" aria-controls="{id}">{heading}</button></h4><div id="{id}" class="usa-accordion__content">{heading} content</div>"#
    )
}

/// Accordion children for `(id, expanded)` pairs, headed by the id.
#[must_use]
pub fn accordion(items: &[(&str, bool)]) -> String {
    items
        .iter()
        .map(|(id, expanded)| accordion_item(id, id, *expanded))
        .collect()
}

/// Tooltip trigger button.
#[must_use]
pub fn tooltip_trigger(text: &str) -> String {
    format!(r#"<button type="button" class="usa-button">{text}</button>"#)
}

/// A sortable table column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec<'a> {
    /// Header text.
    pub label: &'a str,
    /// `data-sort-type` value, if any.
    pub sort_type: Option<&'a str>,
    /// Whether the header carries `data-sortable`.
    pub sortable: bool,
}

impl<'a> ColumnSpec<'a> {
    /// Sortable text column.
    #[must_use]
    pub const fn text(label: &'a str) -> Self {
        Self {
            label,
            sort_type: None,
            sortable: true,
        }
    }

    /// Sortable numeric column.
    #[must_use]
    pub const fn number(label: &'a str) -> Self {
        Self {
            label,
            sort_type: Some("number"),
            sortable: true,
        }
    }

    /// Column without sorting.
    #[must_use]
    pub const fn fixed(label: &'a str) -> Self {
        Self {
            label,
            sort_type: None,
            sortable: false,
        }
    }
}

/// Table markup with a header row keyed by lowercased labels and one body
/// row per entry of `rows`. The first cell of each row is a row header.
#[must_use]
pub fn table(columns: &[ColumnSpec<'_>], rows: &[&[&str]]) -> String {
    let mut markup = String::from("<table><thead><tr>");
    for column in columns {
        let _ = write!(
            markup,
            r#"<th scope="col" data-key="{}""#,
            column.label.to_lowercase()
        );
        if column.sortable {
            markup.push_str(" data-sortable");
        }
        if let Some(sort_type) = column.sort_type {
            let _ = write!(markup, r#" data-sort-type="{sort_type}""#);
        }
        let _ = write!(markup, ">{}</th>", column.label);
    }
    markup.push_str("</tr></thead><tbody>");
    for row in rows {
        markup.push_str("<tr>");
        for (index, cell) in row.iter().enumerate() {
            let tag = if index == 0 { "th" } else { "td" };
            let _ = write!(markup, "<{tag}>{cell}</{tag}>");
        }
        markup.push_str("</tr>");
    }
    markup.push_str("</tbody></table>");
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_marks_sortable_columns_and_types() {
        let markup = table(
            &[ColumnSpec::text("Name"), ColumnSpec::number("Mass"), ColumnSpec::fixed("Notes")],
            &[&["Mars", "0.64", "red"]],
        );
        assert!(markup.contains(r#"<th scope="col" data-key="name" data-sortable>Name</th>"#));
        assert!(markup.contains(r#"<th scope="col" data-key="mass" data-sortable data-sort-type="number">Mass</th>"#));
        assert!(markup.contains(r#"<th scope="col" data-key="notes">Notes</th>"#));
        assert!(markup.contains("<tr><th>Mars</th><td>0.64</td><td>red</td></tr>"));
    }

    #[test]
    fn accordion_items_carry_their_initial_state() {
        let markup = accordion(&[("a", true), ("b", false)]);
        assert!(markup.contains(r#"aria-expanded="true" aria-controls="a""#));
        assert!(markup.contains(r#"aria-expanded="false" aria-controls="b""#));
    }
}
