// crates/fieldset-cli/src/main.rs
// ============================================================================
// Module: Fieldset CLI Entry Point
// Description: Command dispatcher for offline schema resolution workflows.
// Purpose: Resolve, order, and validate parameter values from JSON files.
// Dependencies: clap, fieldset-config, fieldset-core, serde, serde_jcs, thiserror.
// ============================================================================

//! ## Overview
//! The `fieldset` binary loads a JSON field schema and a JSON value tree from
//! disk and runs one engine operation over them. Structured output is
//! canonical JSON on stdout; failures are reported on stderr with a failure
//! exit code. Security posture: input files are untrusted and read with a
//! hard size limit.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use fieldset_config::FieldsetConfig;
use fieldset_core::FieldDescriptor;
use fieldset_core::InMemoryFieldTypeRegistry;
use fieldset_core::IssueTree;
use fieldset_core::NodeInstance;
use fieldset_core::ResolveOptions;
use fieldset_core::ValuePath;
use fieldset_core::ValueTree;
use fieldset_core::build_dependencies;
use fieldset_core::node_issues_with_registry;
use fieldset_core::resolve;
use fieldset_core::resolve_order;
use fieldset_core::validate;
use fieldset_core::validate_schema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Node name used when validating values against a registered node type.
const CLI_NODE_NAME: &str = "cli";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "fieldset", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve raw values into an effective parameter tree.
    Resolve(ResolveCommand),
    /// Print the order in which top-level fields can be resolved.
    Order(OrderCommand),
    /// Report missing required values.
    Validate(ValidateCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a Fieldset configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Path to the field schema JSON file.
    #[arg(long, value_name = "PATH")]
    schema: PathBuf,
    /// Path to the raw values JSON file.
    #[arg(long, value_name = "PATH")]
    values: PathBuf,
    /// Optional config file path (defaults to fieldset.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override default injection from the config.
    #[arg(long, value_name = "BOOL")]
    defaults: Option<bool>,
    /// Emit fields hidden by visibility rules.
    #[arg(long = "include-hidden", action = ArgAction::SetTrue)]
    include_hidden: bool,
}

/// Arguments for `order`.
#[derive(Args, Debug)]
struct OrderCommand {
    /// Path to the field schema JSON file.
    #[arg(long, value_name = "PATH")]
    schema: PathBuf,
    /// Optional config file path (defaults to fieldset.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to the field schema JSON file, or a type registry with `--node-type`.
    #[arg(long, value_name = "PATH")]
    schema: PathBuf,
    /// Path to the raw values JSON file.
    #[arg(long, value_name = "PATH")]
    values: PathBuf,
    /// Validate against this type from a registry schema file.
    #[arg(long = "node-type", value_name = "TYPE")]
    node_type: Option<String>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Optional config file path (defaults to fieldset.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to fieldset.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats for structured CLI commands.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Canonical JSON output.
    Json,
    /// Human-readable text output.
    Text,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("fieldset {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Resolve(command) => command_resolve(&command),
        Commands::Order(command) => command_order(&command),
        Commands::Validate(command) => command_validate(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Resolve Command
// ============================================================================

/// Executes the `resolve` command.
fn command_resolve(command: &ResolveCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let limit = config.limits.max_input_bytes;
    let fields = read_schema(&command.schema, limit)?;
    let raw: ValueTree = read_json_file(&command.values, "values", limit)?;
    let options = resolve_options_for(&config, command.defaults, command.include_hidden);
    let resolved = resolve(&fields, &raw, &options)
        .map_err(|err| CliError::new(format!("resolve failed: {err}")))?;
    write_canonical_json(&resolved)?;
    Ok(ExitCode::SUCCESS)
}

/// Applies command-line overrides on top of configured resolver options.
fn resolve_options_for(
    config: &FieldsetConfig,
    defaults: Option<bool>,
    include_hidden: bool,
) -> ResolveOptions {
    let mut options = config.resolve_options();
    if let Some(defaults) = defaults {
        options.inject_defaults = defaults;
    }
    if include_hidden {
        options.include_hidden = true;
    }
    options
}

// ============================================================================
// SECTION: Order Command
// ============================================================================

/// One entry of the `order` output.
#[derive(Debug, Serialize)]
struct OrderEntry<'a> {
    /// Declaration index of the field.
    index: usize,
    /// Field name.
    name: &'a str,
}

/// Executes the `order` command.
fn command_order(command: &OrderCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let fields = read_schema(&command.schema, config.limits.max_input_bytes)?;
    let dependencies = build_dependencies(&fields);
    let order = resolve_order(&fields, &dependencies)
        .map_err(|err| CliError::new(format!("order failed: {err}")))?;
    let entries: Vec<OrderEntry<'_>> = order
        .iter()
        .filter_map(|&index| {
            fields.get(index).map(|field| OrderEntry {
                index,
                name: field.name.as_str(),
            })
        })
        .collect();
    write_canonical_json(&entries)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes the `validate` command.
///
/// Exits with failure when any issue is reported.
fn command_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let limit = config.limits.max_input_bytes;
    let values: ValueTree = read_json_file(&command.values, "values", limit)?;

    let issues = match command.node_type.as_deref() {
        Some(node_type) => {
            let registry = read_registry(&command.schema, limit)?;
            let node = NodeInstance {
                name: CLI_NODE_NAME.to_string(),
                node_type: node_type.to_string(),
                disabled: false,
                parameters: values,
            };
            node_issues_with_registry(&registry, &node).unwrap_or_default()
        }
        None => {
            let fields = read_schema(&command.schema, limit)?;
            validate(&fields, &values, &ValuePath::root())
        }
    };

    match command.format {
        OutputFormat::Json => write_canonical_json(&issues)?,
        OutputFormat::Text => write_issue_lines(&issues, command.node_type.as_deref())?,
    }
    if issues.is_empty() { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
}

/// Writes the human-readable issue lines to stdout.
fn write_issue_lines(issues: &IssueTree, node_type: Option<&str>) -> CliResult<()> {
    let mut output = String::new();
    for line in issues.to_lines(node_type) {
        output.push_str(&line);
        output.push('\n');
    }
    write_stdout_bytes(output.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = FieldsetConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads the config for an engine command, falling back to defaults.
fn load_config(path: Option<&Path>) -> CliResult<FieldsetConfig> {
    FieldsetConfig::load_or_default(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let metadata = file.metadata().map_err(ReadLimitError::Io)?;
    let size = metadata.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        return Err(ReadLimitError::TooLarge {
            size: actual,
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads and deserializes a bounded JSON input file.
fn read_json_file<T: DeserializeOwned>(path: &Path, kind: &str, max_bytes: usize) -> CliResult<T> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(format!(
            "failed to read {kind} file {}: {err}",
            path.display()
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "{kind} file {} exceeds size limit ({size} > {limit} bytes)",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("failed to parse {kind} file {}: {err}", path.display()))
    })
}

/// Reads a field schema and checks it is well formed.
fn read_schema(path: &Path, max_bytes: usize) -> CliResult<Vec<FieldDescriptor>> {
    let fields: Vec<FieldDescriptor> = read_json_file(path, "schema", max_bytes)?;
    validate_schema(&fields).map_err(|err| CliError::new(format!("invalid schema: {err}")))?;
    Ok(fields)
}

/// Reads a type registry file mapping type names to field schemas.
fn read_registry(path: &Path, max_bytes: usize) -> CliResult<InMemoryFieldTypeRegistry> {
    let types: BTreeMap<String, Vec<FieldDescriptor>> =
        read_json_file(path, "schema", max_bytes)?;
    let mut registry = InMemoryFieldTypeRegistry::new();
    for (type_name, fields) in types {
        validate_schema(&fields).map_err(|err| {
            CliError::new(format!("invalid schema for type {type_name}: {err}"))
        })?;
        registry
            .register(type_name, fields)
            .map_err(|err| CliError::new(format!("invalid registry: {err}")))?;
    }
    Ok(registry)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a value to stdout as canonical JSON.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = canonical_json_bytes(value)?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Computes canonical JSON bytes for output rendering.
fn canonical_json_bytes<T: Serialize>(value: &T) -> CliResult<Vec<u8>> {
    serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
