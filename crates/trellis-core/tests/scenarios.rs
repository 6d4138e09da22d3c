//! End-to-end walkthroughs of the documented element behaviors.

use anyhow::{Context, Result};
use trellis_config::SortDirection;
use trellis_core::{Accordion, LifecycleState, SortableTable};
use trellis_dom::{Document, NodeId, Selector};
use trellis_events::{ChangeEvent, SortDirectionLabel};
use trellis_test_support::Harness;
use trellis_test_support::fixtures::{self, ColumnSpec};

fn first_column(doc: &Document, host: NodeId) -> Result<Vec<String>> {
    let tbody = doc
        .query(host, &Selector::tag("tbody"))
        .context("table body")?;
    Ok(doc
        .element_children(tbody)
        .into_iter()
        .filter_map(|row| doc.element_children(row).first().copied())
        .map(|cell| doc.text_content(cell))
        .collect())
}

#[test]
fn exclusive_group_moves_the_expanded_item() -> Result<()> {
    let mut harness = Harness::new();
    let host = harness.mount_enhanced(
        Accordion,
        &[],
        &fixtures::accordion(&[("a", false), ("b", false), ("c", false)]),
    )?;

    let changes = host.expand(&mut harness.doc, "a");
    assert_eq!(
        changes,
        vec![ChangeEvent::DisclosureChanged {
            item_id: "a".into(),
            expanded: true,
        }]
    );
    assert_eq!(host.expanded(&harness.doc), vec!["a".to_string()]);

    let changes = host.expand(&mut harness.doc, "b");
    assert_eq!(
        changes,
        vec![
            ChangeEvent::DisclosureChanged {
                item_id: "a".into(),
                expanded: false,
            },
            ChangeEvent::DisclosureChanged {
                item_id: "b".into(),
                expanded: true,
            },
        ]
    );
    assert_eq!(host.expanded(&harness.doc), vec!["b".to_string()]);
    assert!(harness.doc.has_attribute(harness.by_id("a")?, "hidden"));
    assert!(!harness.doc.has_attribute(harness.by_id("b")?, "hidden"));
    assert!(harness.doc.has_attribute(harness.by_id("c")?, "hidden"));
    assert_eq!(harness.changes().len(), 3);
    Ok(())
}

#[test]
fn first_sort_is_ascending_and_second_descending() -> Result<()> {
    let mut harness = Harness::new();
    let host = harness.mount_enhanced(
        SortableTable::default(),
        &[],
        &fixtures::table(
            &[ColumnSpec::text("Name")],
            &[&["Zebra"], &["Apple"], &["Mango"]],
        ),
    )?;
    assert_eq!(host.active_sort(&harness.doc), None);

    let change = host.sort_by(&mut harness.doc, "name")?;
    assert_eq!(
        change,
        Some(ChangeEvent::SortChanged {
            column: "name".into(),
            direction: SortDirectionLabel::Ascending,
        })
    );
    assert_eq!(first_column(&harness.doc, host.node())?, ["Apple", "Mango", "Zebra"]);
    assert_eq!(
        host.active_sort(&harness.doc),
        Some(("name".to_string(), SortDirection::Ascending))
    );

    host.sort_by(&mut harness.doc, "name")?;
    assert_eq!(first_column(&harness.doc, host.node())?, ["Zebra", "Mango", "Apple"]);
    assert_eq!(
        host.active_sort(&harness.doc),
        Some(("name".to_string(), SortDirection::Descending))
    );
    assert_eq!(
        host.announcement(&harness.doc).as_deref(),
        Some("The table is now sorted by Name in descending order.")
    );
    Ok(())
}

#[test]
fn switching_columns_clears_the_previous_indicator() -> Result<()> {
    let mut harness = Harness::new();
    let host = harness.mount_enhanced(
        SortableTable::default(),
        &[],
        &fixtures::table(
            &[ColumnSpec::text("Name"), ColumnSpec::number("Age")],
            &[&["Carol", "30"], &["Alice", "25"], &["Bob", "35"]],
        ),
    )?;

    host.sort_by(&mut harness.doc, "age")?;
    assert_eq!(first_column(&harness.doc, host.node())?, ["Alice", "Carol", "Bob"]);
    let age = harness.find(host.node(), r#"th[data-key="age"]"#)?;
    assert_eq!(harness.doc.attribute(age, "aria-sort"), Some("ascending"));

    host.sort_by(&mut harness.doc, "name")?;
    assert!(!harness.doc.has_attribute(age, "aria-sort"));
    assert_eq!(
        host.active_sort(&harness.doc),
        Some(("name".to_string(), SortDirection::Ascending))
    );
    Ok(())
}

#[test]
fn captured_content_is_restored_once_across_renders() -> Result<()> {
    let mut harness = Harness::new();
    let host = harness.mount(
        Accordion,
        &[],
        &fixtures::accordion(&[("a", false), ("b", true)]),
    )?;
    assert_eq!(host.state(), LifecycleState::Enhancing);
    assert!(!host.has_pending_content());

    let root = harness.find(host.node(), ".usa-accordion")?;
    assert_eq!(harness.doc.element_children(host.node()), vec![root]);
    let buttons = Selector::class("usa-accordion__button");
    assert_eq!(harness.doc.query_all(root, &buttons).len(), 2);
    let placeholder = Selector::attr(&harness.settings.placeholder_attribute);
    assert!(harness.doc.query(host.node(), &placeholder).is_none());

    host.request_update(&mut harness.doc)?;
    host.request_update(&mut harness.doc)?;
    harness.flush();
    assert_eq!(harness.doc.query_all(host.node(), &buttons).len(), 2);
    assert_eq!(host.state(), LifecycleState::Enhanced);
    Ok(())
}
