//! CLI command implementations
//!
//! Every command starts the same way:
//! 1. Configuration load
//! 2. Log threshold applied
//! 3. Bootstrap schema load and normalization
//!
//! One-shot commands then print a single JSON response on stdout; `session`
//! keeps answering requests until stdin closes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::form;
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope, Severity};
use crate::schema::{export_json, RootSchema, SchemaLoader, SchemaValidator};
use crate::store::SchemaStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;
use super::session::Session;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bootstrap schema document (required). Relative paths are resolved
    /// against the directory of the configuration file.
    pub schema_path: PathBuf,

    /// Log threshold (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Sort keys when exporting the schema (optional, default false)
    #[serde(default)]
    pub sorted_output: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if config.schema_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.schema_path = dir.join(&config.schema_path);
            }
        }

        let schema_path = config.schema_path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("log_level", config.log_level.as_str()), ("schema_path", schema_path.as_str())],
        );

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_path.as_os_str().is_empty() {
            return Err(CliError::config_error("schema_path must not be empty"));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Returns the configured log threshold
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command, cli.verbose)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, verbose: bool) -> CliResult<()> {
    if verbose {
        Logger::set_min_severity(Severity::Trace);
    }

    match cmd {
        Command::Show { config } => show(&config, verbose),
        Command::Form { config } => form(&config, verbose),
        Command::Validate { config, data } => validate(&config, &data, verbose),
        Command::Session { config } => session(&config, verbose),
    }
}

/// Print the normalized schema
pub fn show(config_path: &Path, verbose: bool) -> CliResult<()> {
    let (config, schema) = boot(config_path, verbose)?;

    let scope = ObservationScope::new("SHOW");
    let data = show_data(&schema, config.sorted_output)?;
    write_response(data)?;
    scope.complete();

    Ok(())
}

/// Print the form layout and its initial data
pub fn form(config_path: &Path, verbose: bool) -> CliResult<()> {
    let (_, schema) = boot(config_path, verbose)?;

    let scope = ObservationScope::new("FORM");
    write_response(form_data(&schema))?;
    scope.complete();

    Ok(())
}

/// Validate a form-data document against the schema
pub fn validate(config_path: &Path, data_path: &Path, verbose: bool) -> CliResult<()> {
    let (_, schema) = boot(config_path, verbose)?;

    let data_label = data_path.display().to_string();
    let scope = ObservationScope::with_fields("VALIDATE", &[("data", data_label.as_str())]);

    match validate_file(&schema, data_path) {
        Ok(data) => {
            write_response(data)?;
            scope.complete();
            Ok(())
        }
        Err(e) => {
            scope.fail(e.code_str());
            Err(e)
        }
    }
}

/// Run an interactive editing session on stdin/stdout
pub fn session(config_path: &Path, verbose: bool) -> CliResult<()> {
    let (config, schema) = boot(config_path, verbose)?;

    let store = Arc::new(SchemaStore::from_schema(schema)?);
    let session = Session::new(store, config.sorted_output);

    let scope = ObservationScope::new("SESSION");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = session.run(stdin.lock(), &mut stdout.lock())?;
    let handled = handled.to_string();
    scope.complete_with_fields(&[("requests", handled.as_str())]);

    Ok(())
}

/// Load the config, apply its log threshold, then load the schema
fn boot(config_path: &Path, verbose: bool) -> CliResult<(Config, RootSchema)> {
    let config = Config::load(config_path)?;
    if !verbose {
        Logger::set_min_severity(config.severity());
    }

    let schema = SchemaLoader::new(&config.schema_path).load()?;
    Ok((config, schema))
}

/// Response data of `show`
pub fn show_data(schema: &RootSchema, sorted: bool) -> CliResult<Value> {
    let text = export_json(schema, sorted)?;
    Ok(serde_json::from_str(&text)?)
}

/// Response data of `form`
pub fn form_data(schema: &RootSchema) -> Value {
    json!({
        "fields": form::build_form(schema),
        "initial_data": form::initial_data(schema),
    })
}

/// Response data of `validate`
pub fn validate_file(schema: &RootSchema, data_path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(data_path).map_err(|e| {
        CliError::io_error(format!("Failed to read {}: {}", data_path.display(), e))
    })?;
    let data: Value = serde_json::from_str(&content)
        .map_err(|e| CliError::invalid_data(format!("Invalid form data JSON: {}", e)))?;

    SchemaValidator::new(schema)
        .validate(&data)
        .map_err(|e| CliError::invalid_data(e.to_string()))?;

    Ok(json!({"valid": true}))
}
