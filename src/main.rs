//! Purpose: `cdf` CLI entry point for exploring a Cognite Data Fusion project.
//! Role: Binary crate root; parses args, builds the client, emits JSON on stdout.
//! Invariants: Successful commands print exactly one JSON document on stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use cognite_sdk::api::{ClientConfig, CogniteClient, Error, ErrorKind, to_exit_code};
use cognite_sdk::api::config::{
    DEFAULT_BASE_URL, ENV_APP_ID, ENV_BASE_URL, ENV_PROJECT, ENV_TIMEOUT_MS, ENV_TOKEN,
};
use cognite_sdk::core::union::JsonKind;
use cognite_sdk::dto::models::{VIEW_OR_REFERENCE, ViewOrReference};
use cognite_sdk::json::parse;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint(clap_error_hint(&err)));
            }
        },
    };

    init_tracing(cli.global.verbose);

    command_dispatch::dispatch_command(cli.command, &cli.global)
        .map_err(add_auth_hint)
        .map_err(add_transport_hint)
        .map_err(add_internal_hint)
}

#[derive(Parser)]
#[command(
    name = "cdf",
    version,
    about = "Query a Cognite Data Fusion project from the command line",
    long_about = None,
    after_help = r#"EXAMPLES
  $ export COGNITE_PROJECT=my-project COGNITE_TOKEN=...
  $ cdf token inspect
  $ cdf events list --type alarm --limit 10
  $ cdf raw rows my_db my_table --columns name,value
  $ cdf models datamodels --space plant --inline-views
  $ cdf models classify model.json

Output is JSON on stdout (pretty-printed on a terminal). Errors are JSON on
stderr with a stable exit code per error kind."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone, Debug)]
struct GlobalArgs {
    #[arg(
        long,
        global = true,
        env = ENV_BASE_URL,
        default_value = DEFAULT_BASE_URL,
        value_hint = ValueHint::Url,
        help = "API base URL (scheme and host only)"
    )]
    base_url: String,
    #[arg(long, global = true, env = ENV_PROJECT, help = "CDF project name")]
    project: Option<String>,
    #[arg(
        long,
        global = true,
        env = ENV_TOKEN,
        hide_env_values = true,
        help = "Bearer token sent as Authorization header"
    )]
    token: Option<String>,
    #[arg(long, global = true, env = ENV_APP_ID, help = "Value for the x-cdp-app header")]
    app_id: Option<String>,
    #[arg(
        long,
        global = true,
        env = ENV_TIMEOUT_MS,
        default_value_t = 30_000,
        help = "Per-request timeout in milliseconds"
    )]
    timeout_ms: u64,
    #[arg(
        short,
        long,
        global = true,
        help = "Log requests and responses to stderr"
    )]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect the current bearer token
    #[command(subcommand)]
    Token(TokenCommand),
    /// Show the legacy login status for the current credentials
    #[command(subcommand)]
    Login(LoginCommand),
    /// List or fetch events
    #[command(subcommand)]
    Events(EventsCommand),
    /// List file metadata or create download links
    #[command(subcommand)]
    Files(FilesCommand),
    /// List time series
    #[command(subcommand)]
    Timeseries(TimeseriesCommand),
    /// Browse Raw databases, tables, and rows
    #[command(subcommand)]
    Raw(RawCommand),
    /// List relationships
    #[command(subcommand)]
    Relationships(RelationshipsCommand),
    /// Browse data-modeling resources, or classify a data-model document offline
    #[command(subcommand)]
    Models(ModelsCommand),
    /// Run a GraphQL query against a data model
    Graphql {
        #[arg(help = "Space of the data model")]
        space: String,
        #[arg(help = "External id of the data model")]
        external_id: String,
        #[arg(help = "Data model version")]
        version: String,
        #[arg(long, help = "GraphQL query text")]
        query: String,
        #[arg(long, help = "Variables as a JSON object")]
        variables: Option<String>,
    },
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ cdf completion bash > ~/.local/share/bash-completion/completions/cdf
  $ cdf completion zsh > ~/.zfunc/_cdf
  $ cdf completion fish > ~/.config/fish/completions/cdf.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Show projects, groups, and capabilities granted to the token
    Inspect,
}

#[derive(Subcommand)]
enum LoginCommand {
    Status,
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    #[arg(long, help = "Maximum number of items to return")]
    limit: Option<u32>,
    #[arg(long, help = "Cursor from a previous page (`nextCursor`)")]
    cursor: Option<String>,
}

#[derive(Subcommand)]
enum EventsCommand {
    List {
        #[arg(long = "type")]
        event_type: Option<String>,
        #[arg(long)]
        subtype: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        external_id_prefix: Option<String>,
        #[arg(long = "asset-id")]
        asset_ids: Vec<i64>,
        #[arg(long = "data-set", help = "Data set id or external id (repeatable)")]
        data_sets: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Fetch events by id (numeric) or external id
    Get {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        ignore_unknown_ids: bool,
    },
}

#[derive(Subcommand)]
enum FilesCommand {
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        mime_type: Option<String>,
        #[arg(long)]
        external_id_prefix: Option<String>,
        #[arg(long = "data-set")]
        data_sets: Vec<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create signed download URLs for files
    DownloadLink {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TimeseriesCommand {
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        external_id_prefix: Option<String>,
        #[arg(long)]
        is_string: Option<bool>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum RawCommand {
    Databases {
        #[command(flatten)]
        page: PageArgs,
    },
    Tables {
        database: String,
        #[command(flatten)]
        page: PageArgs,
    },
    Rows {
        database: String,
        table: String,
        #[arg(long, value_delimiter = ',', help = "Columns to return (comma-separated)")]
        columns: Vec<String>,
        #[arg(long, help = "Only rows updated at or after this epoch-ms time")]
        min_last_updated_time: Option<i64>,
        #[arg(long, help = "Only rows updated before this epoch-ms time")]
        max_last_updated_time: Option<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum RelationshipsCommand {
    List {
        #[arg(long = "source")]
        source_external_ids: Vec<String>,
        #[arg(long = "target")]
        target_external_ids: Vec<String>,
        #[arg(long, help = "Expand source and target resources")]
        fetch_resources: bool,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
enum ModelsCommand {
    Spaces {
        #[arg(long)]
        include_global: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    Views {
        #[arg(long)]
        space: Option<String>,
        #[arg(long)]
        all_versions: bool,
        #[arg(long)]
        include_global: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    Datamodels {
        #[arg(long)]
        space: Option<String>,
        #[arg(long, help = "Return full views instead of references")]
        inline_views: bool,
        #[arg(long)]
        all_versions: bool,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Report how each `views` entry of a data-model document decodes (no API calls)
    Classify {
        #[arg(
            help = "Data model JSON file (a model, a list, or an `items` envelope); `-` or omitted reads stdin",
            value_hint = ValueHint::FilePath
        )]
        input: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn build_client(global: &GlobalArgs) -> Result<CogniteClient, Error> {
    let project = global
        .project
        .clone()
        .filter(|project| !project.trim().is_empty())
        .ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message("missing CDF project")
                .with_hint(format!("Pass --project or set {ENV_PROJECT}."))
        })?;
    let mut config = ClientConfig::new(project)
        .with_base_url(global.base_url.clone())
        .with_timeout(Duration::from_millis(global.timeout_ms));
    if let Some(token) = &global.token {
        config = config.with_token(token.clone());
    }
    if let Some(app_id) = &global.app_id {
        config = config.with_app_id(app_id.clone());
    }
    CogniteClient::new(config)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode output json")
            .with_source(err)
    })
}

fn parse_inline_json(data: &str) -> Result<Value, Error> {
    parse::from_str(data).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid json")
            .with_hint(parse::hint_for_error(&err, "inline argument"))
            .with_source(err)
    })
}

fn read_input(input: Option<&Path>) -> Result<String, Error> {
    let mut buf = String::new();
    match input {
        None => read_stdin(&mut buf)?,
        Some(path) if path == Path::new("-") => read_stdin(&mut buf)?,
        Some(path) => {
            buf = std::fs::read_to_string(path).map_err(|err| {
                let kind = match err.kind() {
                    io::ErrorKind::NotFound => ErrorKind::NotFound,
                    io::ErrorKind::PermissionDenied => ErrorKind::Permission,
                    _ => ErrorKind::Io,
                };
                Error::new(kind)
                    .with_message(format!("failed to read {}", path.display()))
                    .with_source(err)
            })?;
        }
    }
    Ok(buf)
}

fn read_stdin(buf: &mut String) -> Result<(), Error> {
    io::stdin().read_to_string(buf).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read stdin")
            .with_source(err)
    })?;
    Ok(())
}

/// Classifies every `views` entry of one or more data-model documents.
/// Returns the report and whether every entry decoded.
fn classify_document(document: &Value) -> Result<(Value, bool), Error> {
    let models: Vec<&Value> = match document {
        Value::Object(object) => match object.get("items") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(other) => {
                return Err(Error::new(ErrorKind::Usage).with_message(format!(
                    "`items` must be an array, found {}",
                    JsonKind::of(other)
                )));
            }
            None => vec![document],
        },
        Value::Array(items) => items.iter().collect(),
        other => {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!(
                    "expected a data model object, found {}",
                    JsonKind::of(other)
                ))
                .with_hint("Pass a data model, a JSON array of models, or {\"items\": [...]}."));
        }
    };

    let mut all_ok = true;
    let reports = models
        .into_iter()
        .map(|model| {
            let (report, ok) = classify_model(model);
            all_ok &= ok;
            report
        })
        .collect::<Vec<_>>();
    Ok((json!({ "ok": all_ok, "models": reports }), all_ok))
}

fn classify_model(model: &Value) -> (Value, bool) {
    let views = model
        .get("views")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut ok = true;
    let entries = views
        .iter()
        .enumerate()
        .map(|(index, entry)| match VIEW_OR_REFERENCE.decode(entry) {
            Ok(decoded) => classified_entry(index, entry, &decoded),
            Err(err) => {
                ok = false;
                json!({ "index": index, "error": err.to_string() })
            }
        })
        .collect::<Vec<_>>();

    let report = json!({
        "space": model.get("space").cloned().unwrap_or(Value::Null),
        "externalId": model.get("externalId").cloned().unwrap_or(Value::Null),
        "version": model.get("version").cloned().unwrap_or(Value::Null),
        "views": entries,
    });
    (report, ok)
}

fn classified_entry(index: usize, raw: &Value, decoded: &ViewOrReference) -> Value {
    let mut entry = Map::new();
    entry.insert("index".to_string(), json!(index));
    entry.insert("variant".to_string(), json!(decoded.variant_name()));
    entry.insert("matched".to_string(), json!(VIEW_OR_REFERENCE.matching(raw)));
    entry.insert("space".to_string(), json!(decoded.space()));
    entry.insert("externalId".to_string(), json!(decoded.external_id()));
    entry.insert("version".to_string(), json!(decoded.version()));
    if let Some(view) = decoded.as_view() {
        let properties: BTreeMap<&str, &str> = view
            .properties
            .iter()
            .map(|(name, property)| (name.as_str(), property.variant_name()))
            .collect();
        entry.insert("properties".to_string(), json!(properties));
    }
    Value::Object(entry)
}

fn add_auth_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Auth => err.with_hint(format!(
            "The API rejected the credentials. Set {ENV_TOKEN} or pass --token with a valid bearer token."
        )),
        ErrorKind::Permission => err.with_hint(
            "The token lacks a capability for this call. Run `cdf token inspect` to list granted ACLs.",
        ),
        ErrorKind::NotFound if !err.missing().is_empty() => {
            err.with_hint("Some ids do not exist. Pass --ignore-unknown-ids to skip them.")
        }
        _ => err,
    }
}

fn add_transport_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Io => err.with_hint("Could not reach the API. Check --base-url and network access."),
        ErrorKind::Busy => err.with_hint("The API is throttling or unavailable. Retry with backoff."),
        ErrorKind::Server => err.with_hint(
            "The API failed to handle the request. Include the request id when reporting it.",
        ),
        _ => err,
    }
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint("Unexpected internal failure. Retry with --verbose and RUST_BACKTRACE=1.")
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Auth => "not authenticated".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::AlreadyExists => "already exists".to_string(),
        ErrorKind::Busy => "service busy".to_string(),
        ErrorKind::Server => "server error".to_string(),
        ErrorKind::Decode => "could not decode response".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(status) = err.status() {
        inner.insert("status".to_string(), json!(status));
    }
    if let Some(request_id) = err.request_id() {
        inner.insert("requestId".to_string(), json!(request_id));
    }
    if !err.missing().is_empty() {
        inner.insert("missing".to_string(), json!(err.missing()));
    }
    if !err.duplicated().is_empty() {
        inner.insert("duplicated".to_string(), json!(err.duplicated()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(status) = err.status() {
        lines.push(format!("status: {status}"));
    }
    if let Some(request_id) = err.request_id() {
        lines.push(format!("request id: {request_id}"));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let usage = rendered
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(str::trim);
    let Some(usage) = usage else {
        return "Try `cdf --help`.".to_string();
    };

    let tokens: Vec<&str> = usage.split_whitespace().collect();
    let Some(pos) = tokens.iter().position(|token| *token == "cdf") else {
        return "Try `cdf --help`.".to_string();
    };
    let parts: Vec<&str> = tokens
        .iter()
        .skip(pos + 1)
        .take_while(|token| {
            !token.starts_with('-') && !token.starts_with('<') && !token.starts_with('[')
        })
        .copied()
        .collect();
    if parts.is_empty() {
        return "Try `cdf --help`.".to_string();
    }
    format!("Try `cdf {} --help`.", parts.join(" "))
}
