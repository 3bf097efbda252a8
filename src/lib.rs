pub mod cli;
pub mod condition;
pub mod config;
pub mod display;
pub mod export;
pub mod field;
pub mod logging;
pub mod message;
pub mod normalizer;
pub mod query;
pub mod value;

use anyhow::Context;
use std::path::Path;
use std::process::ExitCode;

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use condition::{SearchCondition, process_query, process_query_with};
pub use config::{SearchConfig, default_config, load_config, load_config_from_path};
pub use export::to_query_string;
pub use field::{FieldConfig, FieldRegistry, FieldSet, FieldType, ValueComparator};
pub use message::{Message, MessageBag, Severity};
pub use normalizer::{Normalizer, Pipeline};
pub use query::{ParseOptions, QueryError, QueryParser, parse_query};
pub use value::{Logical, ValuesBag, ValuesGroup};

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

/// Print to stdout and, when requested, mirror into the output file
fn emit(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
    if let Some(path) = output {
        write_output_file(path, content)?;
    }
    Ok(())
}

fn query_error_json(err: &QueryError) -> anyhow::Result<String> {
    let value = serde_json::json!({
        "error": err.to_string(),
        "position": err.position(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn fields_json(fields: &FieldSet) -> anyhow::Result<String> {
    let list: Vec<serde_json::Value> = fields
        .iter()
        .map(|field| {
            serde_json::json!({
                "name": field.name(),
                "type": field.field_type().name(),
                "required": field.is_required(),
                "accept_ranges": field.accepts(field::ValueKind::Range),
                "accept_compares": field.accepts(field::ValueKind::Comparison),
                "accept_pattern_matchers": field.accepts(field::ValueKind::PatternMatch),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&list)?)
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();
    logging::init_logger(cli.verbose, cli.quiet);
    cli.color.apply();

    let search_config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    let fields = search_config
        .field_set()
        .context("Failed to build field definitions")?;
    let options = cli.parse_options(search_config.limits);
    let output = cli.output.as_deref();

    log::info!(
        "{} fields configured, limits: nesting {}, values {}, groups {}",
        fields.len(),
        options.max_nesting_level,
        options.max_values_per_field,
        options.max_groups_per_level
    );
    if let Some(path) = &cli.config {
        log::info!("config file: {}", path.display());
    }

    match &cli.command {
        Commands::Parse { query } => {
            let condition = process_query(query, &fields, &options)
                .with_context(|| format!("Invalid query: {query}"))?;

            let text = match (cli.format, &condition) {
                (OutputFormat::Text, Some(condition)) => {
                    display::format_condition_report(condition)
                }
                (OutputFormat::Text, None) => "Empty query, no condition.\n".to_string(),
                (OutputFormat::Json, Some(condition)) => {
                    display::format_condition_json(condition)?
                }
                (OutputFormat::Json, None) => serde_json::to_string_pretty(
                    &serde_json::json!({ "condition": null, "messages": [] }),
                )?,
            };
            emit(output, &text)?;
        }
        Commands::Check { query } => {
            let condition = match process_query(query, &fields, &options) {
                Ok(condition) => condition,
                Err(err) => {
                    let text = match cli.format {
                        OutputFormat::Text => format!("{err}\n"),
                        OutputFormat::Json => query_error_json(&err)?,
                    };
                    emit(output, &text)?;
                    return Ok(ExitCode::FAILURE);
                }
            };

            let messages = condition
                .as_ref()
                .map(|c| c.messages.clone())
                .unwrap_or_default();
            let text = match cli.format {
                OutputFormat::Text if messages.is_empty() => "No problems found.\n".to_string(),
                OutputFormat::Text => display::format_messages(&messages),
                OutputFormat::Json => display::format_messages_json(&messages)?,
            };
            emit(output, &text)?;

            if messages.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Export { query } => {
            let condition = process_query(query, &fields, &options)
                .with_context(|| format!("Invalid query: {query}"))?;

            let Some(condition) = condition else {
                emit(output, "")?;
                return Ok(ExitCode::SUCCESS);
            };

            let exported = to_query_string(&condition.group);
            let text = match cli.format {
                OutputFormat::Text => {
                    eprint!("{}", display::format_messages(&condition.messages));
                    exported
                }
                OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                    "query": exported,
                    "messages": condition.messages,
                }))?,
            };
            emit(output, &text)?;

            if !condition.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Fields => {
            let text = match cli.format {
                OutputFormat::Text => display::format_fields_table(&fields),
                OutputFormat::Json => fields_json(&fields)?,
            };
            emit(output, &text)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
