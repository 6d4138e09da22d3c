//! Mount one element over author markup, let it enhance, then apply actions.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use clap::ValueEnum;
use trellis_config::Settings;
use trellis_core::{Accordion, ElementHost, LifecycleState, Observer, SortableTable, Tooltip};
use trellis_dom::Document;
use trellis_events::{EventEnvelope, EventJournal};

use crate::error::{CliError, CliResult};

/// Upper bound on animation frames run while settling.
const FRAME_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ComponentKind {
    Accordion,
    Tooltip,
    Table,
}

impl ComponentKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Accordion => "accordion",
            Self::Tooltip => "tooltip",
            Self::Table => "table",
        }
    }
}

/// One step applied after enhancement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Toggle(String),
    Expand(String),
    Collapse(String),
    Show,
    Hide,
    Sort(String),
}

impl FromStr for Action {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (verb, argument) = match raw.split_once(':') {
            Some((verb, argument)) => (verb.trim(), Some(argument.trim())),
            None => (raw.trim(), None),
        };
        let target = |build: fn(String) -> Self| match argument {
            Some(argument) if !argument.is_empty() => Ok(build(argument.to_string())),
            _ => Err(format!("action '{verb}' needs a target, e.g. {verb}:<id>")),
        };
        match verb {
            "toggle" => target(Self::Toggle),
            "expand" => target(Self::Expand),
            "collapse" => target(Self::Collapse),
            "sort" => target(Self::Sort),
            "show" | "hide" if argument.is_some() => {
                Err(format!("action '{verb}' takes no target"))
            }
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            other => Err(format!(
                "unknown action '{other}' (expected toggle, expand, collapse, show, hide or sort)"
            )),
        }
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle(id) => write!(formatter, "toggle:{id}"),
            Self::Expand(id) => write!(formatter, "expand:{id}"),
            Self::Collapse(id) => write!(formatter, "collapse:{id}"),
            Self::Show => formatter.write_str("show"),
            Self::Hide => formatter.write_str("hide"),
            Self::Sort(column) => write!(formatter, "sort:{column}"),
        }
    }
}

/// Everything needed to run a scenario.
#[derive(Debug, Clone)]
pub(crate) struct Scenario {
    pub(crate) component: ComponentKind,
    pub(crate) markup: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) actions: Vec<Action>,
}

/// Outcome of a scenario.
#[derive(Debug, Clone)]
pub(crate) struct Report {
    pub(crate) component: ComponentKind,
    pub(crate) state: LifecycleState,
    pub(crate) markup: String,
    pub(crate) notifications: Vec<EventEnvelope>,
}

enum Mounted {
    Accordion(ElementHost<Accordion>),
    Tooltip(ElementHost<Tooltip>),
    Table(ElementHost<SortableTable>),
}

impl Mounted {
    fn new(doc: &mut Document, kind: ComponentKind, settings: &Settings) -> Self {
        match kind {
            ComponentKind::Accordion => {
                Self::Accordion(ElementHost::new(doc, Accordion, settings.clone()))
            }
            ComponentKind::Tooltip => Self::Tooltip(ElementHost::new(
                doc,
                Tooltip::new(settings),
                settings.clone(),
            )),
            ComponentKind::Table => Self::Table(ElementHost::new(
                doc,
                SortableTable::new(settings),
                settings.clone(),
            )),
        }
    }

    fn node(&self) -> trellis_dom::NodeId {
        match self {
            Self::Accordion(host) => host.node(),
            Self::Tooltip(host) => host.node(),
            Self::Table(host) => host.node(),
        }
    }

    fn state(&self) -> LifecycleState {
        match self {
            Self::Accordion(host) => host.state(),
            Self::Tooltip(host) => host.state(),
            Self::Table(host) => host.state(),
        }
    }

    fn attach(&self, doc: &mut Document, observer: &Observer) -> CliResult<()> {
        let attached = match self {
            Self::Accordion(host) => {
                observer.track(host);
                host.attach(doc)
            }
            Self::Tooltip(host) => {
                observer.track(host);
                host.attach(doc)
            }
            Self::Table(host) => {
                observer.track(host);
                host.attach(doc)
            }
        };
        attached.map_err(|err| CliError::validation(format!("template failed to render: {err}")))
    }

    fn apply(&self, doc: &mut Document, action: &Action) -> CliResult<()> {
        match (self, action) {
            (Self::Accordion(host), Action::Toggle(id)) => {
                host.toggle(doc, id);
            }
            (Self::Accordion(host), Action::Expand(id)) => {
                host.expand(doc, id);
            }
            (Self::Accordion(host), Action::Collapse(id)) => {
                host.collapse(doc, id);
            }
            (Self::Tooltip(host), Action::Show) => {
                host.show(doc);
            }
            (Self::Tooltip(host), Action::Hide) => {
                host.hide(doc);
            }
            (Self::Table(host), Action::Sort(column)) => {
                host.sort_by(doc, column).map_err(CliError::failure)?;
            }
            (mounted, action) => {
                return Err(CliError::validation(format!(
                    "action '{action}' does not apply to component '{}'",
                    mounted.kind().as_str()
                )));
            }
        }
        Ok(())
    }

    const fn kind(&self) -> ComponentKind {
        match self {
            Self::Accordion(_) => ComponentKind::Accordion,
            Self::Tooltip(_) => ComponentKind::Tooltip,
            Self::Table(_) => ComponentKind::Table,
        }
    }
}

/// Mount, settle and apply every action in order.
pub(crate) fn run_scenario(scenario: &Scenario, settings: &Settings) -> CliResult<Report> {
    let mut doc = Document::new();
    let observer = Observer::new(EventJournal::new());
    observer.attach(&mut doc);

    let mounted = Mounted::new(&mut doc, scenario.component, settings);
    let host = mounted.node();
    for (name, value) in &scenario.attributes {
        doc.set_attribute(host, name, value);
    }
    doc.set_inner_html(host, &scenario.markup)
        .map_err(|err| CliError::validation(format!("markup could not be parsed: {err}")))?;
    let root = doc.root();
    doc.append_child(root, host).map_err(CliError::failure)?;
    mounted.attach(&mut doc, &observer)?;
    let frames = doc.run_frames(FRAME_LIMIT);
    tracing::debug!(
        component = scenario.component.as_str(),
        frames,
        state = mounted.state().as_str(),
        "settled"
    );
    if mounted.state() != LifecycleState::Enhanced {
        tracing::warn!(
            component = scenario.component.as_str(),
            "element was not enhanced; actions run against rendered markup"
        );
    }

    for action in &scenario.actions {
        let _span = tracing::debug_span!("action", %action).entered();
        mounted.apply(&mut doc, action)?;
    }

    Ok(Report {
        component: scenario.component,
        state: mounted.state(),
        markup: doc.outer_html(host),
        notifications: observer.journal().drain(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_events::ChangeEvent;

    fn accordion_markup() -> String {
        [("a", "First"), ("b", "Second")]
            .iter()
            .map(|(id, label)| {
                format!(
                    r#"<button class="usa-accordion__button" aria-expanded="false" aria-controls="{id}">{label}</button><div id="{id}">{label} body</div>"#
                )
            })
            .collect()
    }

    fn scenario(component: ComponentKind, markup: &str, actions: &[&str]) -> Scenario {
        Scenario {
            component,
            markup: markup.to_string(),
            attributes: Vec::new(),
            actions: actions
                .iter()
                .map(|raw| raw.parse().expect("action"))
                .collect(),
        }
    }

    #[test]
    fn actions_parse_with_and_without_targets() {
        assert_eq!("toggle:a".parse(), Ok(Action::Toggle("a".into())));
        assert_eq!("sort: name ".parse(), Ok(Action::Sort("name".into())));
        assert_eq!("show".parse(), Ok(Action::Show));
        assert!("expand".parse::<Action>().is_err());
        assert!("hide:now".parse::<Action>().is_err());
        assert!("spin:a".parse::<Action>().is_err());
        assert_eq!(Action::Collapse("b".into()).to_string(), "collapse:b");
    }

    #[test]
    fn accordion_actions_are_recorded() {
        let report = run_scenario(
            &scenario(ComponentKind::Accordion, &accordion_markup(), &["expand:a", "expand:b"]),
            &Settings::default(),
        )
        .expect("scenario");
        assert_eq!(report.state, LifecycleState::Enhanced);
        let events: Vec<ChangeEvent> = report
            .notifications
            .iter()
            .map(|envelope| envelope.event.clone())
            .collect();
        assert_eq!(
            events,
            vec![
                ChangeEvent::DisclosureChanged {
                    item_id: "a".into(),
                    expanded: true,
                },
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
        assert!(report.markup.starts_with("<trellis-accordion>"));
    }

    #[test]
    fn table_sort_reorders_the_markup() {
        let markup = r#"<table><thead><tr><th data-key="name" data-sortable>Name</th></tr></thead><tbody><tr><td>Zebra</td></tr><tr><td>Apple</td></tr></tbody></table>"#;
        let report = run_scenario(
            &scenario(ComponentKind::Table, markup, &["sort:name"]),
            &Settings::default(),
        )
        .expect("scenario");
        let apple = report.markup.find("Apple").expect("apple");
        let zebra = report.markup.find("Zebra").expect("zebra");
        assert!(apple < zebra);
        assert!(report.markup.contains("is now sorted by Name in ascending order."));
    }

    #[test]
    fn mismatched_actions_are_validation_errors() {
        let err = run_scenario(
            &scenario(ComponentKind::Accordion, &accordion_markup(), &["sort:name"]),
            &Settings::default(),
        )
        .expect_err("sort on accordion");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.display_message(),
            "action 'sort:name' does not apply to component 'accordion'"
        );
    }

    #[test]
    fn broken_markup_is_a_validation_error() {
        let err = run_scenario(
            &scenario(ComponentKind::Tooltip, r#"<button class="x"#, &[]),
            &Settings::default(),
        )
        .expect_err("unterminated attribute");
        assert_eq!(err.exit_code(), 2);
    }
}
