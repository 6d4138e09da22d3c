//! Output renderers for scenario reports.

use std::fmt::Write as _;

use anyhow::anyhow;
use clap::ValueEnum;
use serde::Serialize;
use trellis_events::{ChangeEvent, EventEnvelope};

use crate::error::{CliError, CliResult};
use crate::scenario::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    component: &'static str,
    state: &'static str,
    markup: &'a str,
    notifications: &'a [EventEnvelope],
}

fn outcome(event: &ChangeEvent) -> &'static str {
    match event {
        ChangeEvent::DisclosureChanged { expanded: true, .. } => "expanded",
        ChangeEvent::DisclosureChanged { expanded: false, .. } => "collapsed",
        ChangeEvent::PanelVisibilityChanged { visible: true, .. } => "visible",
        ChangeEvent::PanelVisibilityChanged { visible: false, .. } => "hidden",
        ChangeEvent::SortChanged { direction, .. } => direction.as_str(),
    }
}

pub(crate) fn render_report(report: &Report, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let body = JsonReport {
                component: report.component.as_str(),
                state: report.state.as_str(),
                markup: &report.markup,
                notifications: &report.notifications,
            };
            serde_json::to_string_pretty(&body)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
        }
        OutputFormat::Text => {
            let mut text = String::new();
            let _ = writeln!(text, "component: {}", report.component.as_str());
            let _ = writeln!(text, "state: {}", report.state.as_str());
            let _ = writeln!(text, "notifications: {}", report.notifications.len());
            for envelope in &report.notifications {
                let _ = writeln!(
                    text,
                    "  {:>3} {:<24} {} {}",
                    envelope.id,
                    envelope.event.kind(),
                    envelope.event.subject(),
                    outcome(&envelope.event)
                );
            }
            let _ = write!(text, "markup:\n{}", report.markup);
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ComponentKind;
    use trellis_core::LifecycleState;
    use trellis_events::{EventJournal, SortDirectionLabel};
    use uuid::Uuid;

    fn report() -> Report {
        let journal = EventJournal::new();
        journal.record(
            Uuid::nil(),
            ChangeEvent::SortChanged {
                column: "name".into(),
                direction: SortDirectionLabel::Descending,
            },
        );
        Report {
            component: ComponentKind::Table,
            state: LifecycleState::Enhanced,
            markup: "<trellis-table></trellis-table>".into(),
            notifications: journal.drain(),
        }
    }

    #[test]
    fn text_lists_notifications_then_markup() {
        let text = render_report(&report(), OutputFormat::Text).expect("text");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "component: table");
        assert_eq!(lines[1], "state: enhanced");
        assert_eq!(lines[2], "notifications: 1");
        assert_eq!(lines[3], "    1 sort_changed             name descending");
        assert_eq!(lines[4], "markup:");
        assert_eq!(lines[5], "<trellis-table></trellis-table>");
    }

    #[test]
    fn json_carries_tagged_events() {
        let json = render_report(&report(), OutputFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["component"], "table");
        assert_eq!(value["state"], "enhanced");
        assert_eq!(value["notifications"][0]["event"]["type"], "sort_changed");
        assert_eq!(value["notifications"][0]["event"]["direction"], "descending");
    }
}
