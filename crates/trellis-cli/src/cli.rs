//! Argument parsing, settings loading and command dispatch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use trellis_config::{SETTINGS_ENV, Settings};
use trellis_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging, log_format_from_config,
};

use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, render_report};
use crate::scenario::{Action, ComponentKind, Scenario, run_scenario};

/// Key in the settings file that selects the log format; it is not part of
/// the element settings.
const LOG_FORMAT_KEY: &str = "log_format";

/// Parses CLI arguments, executes the requested command and prints its
/// output. Returns the process exit code.
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn execute(cli: Cli) -> CliResult<String> {
    let document = cli
        .settings
        .as_deref()
        .map(read_settings_document)
        .transpose()?;
    let format = log_format_from_config(document.as_ref()).unwrap_or_else(LogFormat::infer);
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: option_env!("TRELLIS_BUILD_SHA").unwrap_or("dev"),
    })
    .map_err(CliError::failure)?;
    let settings = settings_from_document(document)?;

    match cli.command {
        Command::Run(args) => handle_run(args, &settings, cli.output),
    }
}

#[derive(Parser)]
#[command(
    name = "trellis",
    version,
    about = "Run enhanced-element scenarios against author markup"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = SETTINGS_ENV,
        help = "JSON settings file for the synchronizer and engines"
    )]
    settings: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "TRELLIS_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Select output format for the scenario report"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mount an element over author markup, let it enhance and apply actions.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    #[arg(long, value_enum)]
    component: ComponentKind,
    #[arg(long, help = "File holding the element's author children")]
    markup: PathBuf,
    #[arg(
        long = "attr",
        value_parser = parse_attribute,
        help = "Host attribute as name=value; a bare name sets a boolean attribute"
    )]
    attributes: Vec<(String, String)>,
    #[arg(
        long = "action",
        value_parser = parse_action,
        help = "toggle:<id>, expand:<id>, collapse:<id>, show, hide or sort:<column>"
    )]
    actions: Vec<Action>,
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw.split_once('=').unwrap_or((raw, ""));
    let name = name.trim();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(format!("'{raw}' is not a valid attribute name"));
    }
    Ok((name.to_ascii_lowercase(), value.to_string()))
}

fn parse_action(raw: &str) -> Result<Action, String> {
    raw.parse()
}

fn read_settings_document(path: &Path) -> CliResult<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))
        .map_err(CliError::failure)?;
    serde_json::from_str(&raw).map_err(|err| {
        CliError::validation(format!(
            "settings file {} is not valid JSON: {err}",
            path.display()
        ))
    })
}

fn settings_from_document(document: Option<Value>) -> CliResult<Settings> {
    let Some(mut document) = document else {
        return Ok(Settings::default());
    };
    if let Some(map) = document.as_object_mut() {
        map.remove(LOG_FORMAT_KEY);
    }
    Settings::from_value(&document)
        .map_err(|err| CliError::validation(format!("invalid settings: {err}")))
}

fn handle_run(args: RunArgs, settings: &Settings, output: OutputFormat) -> CliResult<String> {
    let markup = fs::read_to_string(&args.markup)
        .with_context(|| format!("failed to read markup file {}", args.markup.display()))
        .map_err(CliError::failure)?;
    let scenario = Scenario {
        component: args.component,
        markup,
        attributes: args.attributes,
        actions: args.actions,
    };
    let report = run_scenario(&scenario, settings)?;
    render_report(&report, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn markup_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write markup");
        file
    }

    #[test]
    fn run_arguments_parse_repeated_attributes_and_actions() {
        let cli = Cli::try_parse_from([
            "trellis",
            "run",
            "--component",
            "accordion",
            "--markup",
            "items.html",
            "--attr",
            "multiselectable",
            "--attr",
            "Bordered=",
            "--action",
            "expand:a",
            "--action",
            "toggle:b",
            "--output",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        let Command::Run(args) = cli.command;
        assert_eq!(args.component, ComponentKind::Accordion);
        assert_eq!(
            args.attributes,
            vec![
                ("multiselectable".to_string(), String::new()),
                ("bordered".to_string(), String::new()),
            ]
        );
        assert_eq!(
            args.actions,
            vec![Action::Expand("a".into()), Action::Toggle("b".into())]
        );
    }

    #[test]
    fn malformed_actions_are_rejected_by_the_parser() {
        let parsed = Cli::try_parse_from([
            "trellis",
            "run",
            "--component",
            "table",
            "--markup",
            "t.html",
            "--action",
            "sort",
        ]);
        assert!(parsed.is_err());
        assert!(parse_attribute("=x").is_err());
    }

    #[test]
    fn settings_documents_drop_the_log_format_key() {
        let settings = settings_from_document(Some(json!({
            "log_format": "json",
            "tooltip_gap_px": 8.0
        })))
        .expect("settings");
        assert!((settings.tooltip_gap_px - 8.0).abs() < f64::EPSILON);
        assert_eq!(
            settings_from_document(None).expect("defaults"),
            Settings::default()
        );
    }

    #[test]
    fn invalid_settings_are_validation_errors() {
        let err = settings_from_document(Some(json!({ "frame_deferral": 0 })))
            .expect_err("zero deferral");
        assert_eq!(err.exit_code(), 2);
        let err = settings_from_document(Some(json!({ "colour": "red" })))
            .expect_err("unknown field");
        assert!(err.display_message().contains("colour"));
    }

    #[test]
    fn settings_files_must_be_json() {
        let file = markup_file("not json");
        let err = read_settings_document(file.path()).expect_err("invalid JSON");
        assert_eq!(err.exit_code(), 2);

        let missing = read_settings_document(Path::new("/definitely/missing.json"))
            .expect_err("missing file");
        assert_eq!(missing.exit_code(), 3);
    }

    #[test]
    fn handle_run_renders_the_report() {
        let file = markup_file(
            r#"<button type="button" class="usa-button">Info</button>"#,
        );
        let args = RunArgs {
            component: ComponentKind::Tooltip,
            markup: file.path().to_path_buf(),
            attributes: vec![("label".into(), "Helpful".into())],
            actions: vec![Action::Show],
        };
        let text = handle_run(args, &Settings::default(), OutputFormat::Text).expect("run");
        assert!(text.starts_with("component: tooltip\nstate: enhanced\nnotifications: 1\n"));
        assert!(text.contains("panel_visibility_changed"));
        assert!(text.contains(r#"role="tooltip""#));
    }

    #[test]
    fn missing_markup_files_are_failures() {
        let args = RunArgs {
            component: ComponentKind::Accordion,
            markup: PathBuf::from("/definitely/missing.html"),
            attributes: Vec::new(),
            actions: Vec::new(),
        };
        let err = handle_run(args, &Settings::default(), OutputFormat::Text)
            .expect_err("missing markup");
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().starts_with("failed to read markup file"));
    }
}
