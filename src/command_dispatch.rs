//! Purpose: Hold top-level CLI command dispatch for `cdf`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Only commands that talk to the API build a client.

use super::*;
use cognite_sdk::dto::Identity;
use cognite_sdk::dto::events::{EventFilter, EventQuery};
use cognite_sdk::dto::files::{FileFilter, FileQuery};
use cognite_sdk::dto::graphql::GraphQlQuery;
use cognite_sdk::dto::models::{DataModelQuery, SpaceQuery, ViewQuery};
use cognite_sdk::dto::raw::{RawListQuery, RawRowsQuery};
use cognite_sdk::dto::relationships::{RelationshipFilter, RelationshipQuery};
use cognite_sdk::dto::timeseries::{TimeSeriesFilter, TimeSeriesQuery};

pub(super) fn dispatch_command(
    command: Command,
    global: &GlobalArgs,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "cdf", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Models(ModelsCommand::Classify { input }) => {
            let raw = read_input(input.as_deref())?;
            let document: Value = parse::from_str(&raw).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("invalid data model json")
                    .with_hint(parse::hint_for_error(&err, "classify input"))
                    .with_source(err)
            })?;
            let (report, ok) = classify_document(&document)?;
            emit_json(report);
            if ok {
                Ok(RunOutcome::ok())
            } else {
                Ok(RunOutcome::with_code(to_exit_code(ErrorKind::Decode)))
            }
        }
        Command::Token(TokenCommand::Inspect) => {
            let client = build_client(global)?;
            emit_json(to_json(&client.login().inspect_token()?)?);
            Ok(RunOutcome::ok())
        }
        Command::Login(LoginCommand::Status) => {
            let client = build_client(global)?;
            emit_json(to_json(&client.login().status()?)?);
            Ok(RunOutcome::ok())
        }
        Command::Events(command) => dispatch_events(command, &build_client(global)?),
        Command::Files(command) => dispatch_files(command, &build_client(global)?),
        Command::Timeseries(TimeseriesCommand::List {
            name,
            unit,
            external_id_prefix,
            is_string,
            page,
        }) => {
            let client = build_client(global)?;
            let query = TimeSeriesQuery {
                filter: TimeSeriesFilter {
                    name,
                    unit,
                    external_id_prefix,
                    is_string,
                    ..TimeSeriesFilter::default()
                },
                limit: page.limit,
                cursor: page.cursor,
            };
            emit_json(to_json(&client.timeseries().list(&query)?)?);
            Ok(RunOutcome::ok())
        }
        Command::Raw(command) => dispatch_raw(command, &build_client(global)?),
        Command::Relationships(RelationshipsCommand::List {
            source_external_ids,
            target_external_ids,
            fetch_resources,
            page,
        }) => {
            let client = build_client(global)?;
            let query = RelationshipQuery {
                filter: RelationshipFilter {
                    source_external_ids,
                    target_external_ids,
                    ..RelationshipFilter::default()
                },
                limit: page.limit,
                cursor: page.cursor,
                fetch_resources,
            };
            emit_json(to_json(&client.relationships().list(&query)?)?);
            Ok(RunOutcome::ok())
        }
        Command::Models(command) => dispatch_models(command, &build_client(global)?),
        Command::Graphql {
            space,
            external_id,
            version,
            query,
            variables,
        } => {
            let mut request = GraphQlQuery::new(query);
            if let Some(variables) = variables {
                let variables = parse_inline_json(&variables)?;
                if !variables.is_object() {
                    return Err(Error::new(ErrorKind::Usage)
                        .with_message("--variables must be a JSON object")
                        .with_hint("Example: --variables '{\"first\": 10}'"));
                }
                request = request.with_variables(variables);
            }
            let client = build_client(global)?;
            let response = client
                .graphql()
                .query(&space, &external_id, &version, &request)?;
            let failed = !response.errors.is_empty();
            emit_json(to_json(&response)?);
            if failed {
                Ok(RunOutcome::with_code(to_exit_code(ErrorKind::Usage)))
            } else {
                Ok(RunOutcome::ok())
            }
        }
    }
}

fn dispatch_events(command: EventsCommand, client: &CogniteClient) -> Result<RunOutcome, Error> {
    match command {
        EventsCommand::List {
            event_type,
            subtype,
            source,
            external_id_prefix,
            asset_ids,
            data_sets,
            page,
        } => {
            let query = EventQuery {
                filter: EventFilter {
                    r#type: event_type,
                    subtype,
                    source,
                    external_id_prefix,
                    asset_ids,
                    data_set_ids: parse_identities(&data_sets),
                    ..EventFilter::default()
                },
                limit: page.limit,
                cursor: page.cursor,
            };
            emit_json(to_json(&client.events().list(&query)?)?);
        }
        EventsCommand::Get {
            ids,
            ignore_unknown_ids,
        } => {
            let events = client
                .events()
                .retrieve(&parse_identities(&ids), ignore_unknown_ids)?;
            emit_json(json!({ "items": to_json(&events)? }));
        }
    }
    Ok(RunOutcome::ok())
}

fn dispatch_files(command: FilesCommand, client: &CogniteClient) -> Result<RunOutcome, Error> {
    match command {
        FilesCommand::List {
            name,
            mime_type,
            external_id_prefix,
            data_sets,
            page,
        } => {
            let query = FileQuery {
                filter: FileFilter {
                    name,
                    mime_type,
                    external_id_prefix,
                    data_set_ids: parse_identities(&data_sets),
                    ..FileFilter::default()
                },
                limit: page.limit,
                cursor: page.cursor,
            };
            emit_json(to_json(&client.files().list(&query)?)?);
        }
        FilesCommand::DownloadLink { ids } => {
            let links = client.files().download_links(&parse_identities(&ids))?;
            emit_json(json!({ "items": to_json(&links)? }));
        }
    }
    Ok(RunOutcome::ok())
}

fn dispatch_raw(command: RawCommand, client: &CogniteClient) -> Result<RunOutcome, Error> {
    match command {
        RawCommand::Databases { page } => {
            let databases = client.raw().list_databases(&list_query(page))?;
            emit_json(to_json(&databases)?);
        }
        RawCommand::Tables { database, page } => {
            let tables = client.raw().list_tables(&database, &list_query(page))?;
            emit_json(to_json(&tables)?);
        }
        RawCommand::Rows {
            database,
            table,
            columns,
            min_last_updated_time,
            max_last_updated_time,
            page,
        } => {
            let mut query = RawRowsQuery::new()
                .with_columns(columns)
                .updated_between(min_last_updated_time, max_last_updated_time);
            if let Some(limit) = page.limit {
                query = query.with_limit(limit);
            }
            if let Some(cursor) = page.cursor {
                query = query.with_cursor(cursor);
            }
            let rows = client.raw().list_rows(&database, &table, &query)?;
            emit_json(to_json(&rows)?);
        }
    }
    Ok(RunOutcome::ok())
}

fn dispatch_models(command: ModelsCommand, client: &CogniteClient) -> Result<RunOutcome, Error> {
    match command {
        ModelsCommand::Spaces {
            include_global,
            page,
        } => {
            let query = SpaceQuery {
                limit: page.limit,
                cursor: page.cursor,
                include_global: include_global.then_some(true),
            };
            emit_json(to_json(&client.models().list_spaces(&query)?)?);
        }
        ModelsCommand::Views {
            space,
            all_versions,
            include_global,
            page,
        } => {
            let query = ViewQuery {
                space,
                limit: page.limit,
                cursor: page.cursor,
                include_global: include_global.then_some(true),
                all_versions: all_versions.then_some(true),
                ..ViewQuery::default()
            };
            emit_json(to_json(&client.models().list_views(&query)?)?);
        }
        ModelsCommand::Datamodels {
            space,
            inline_views,
            all_versions,
            page,
        } => {
            let query = DataModelQuery {
                space,
                limit: page.limit,
                cursor: page.cursor,
                inline_views: inline_views.then_some(true),
                all_versions: all_versions.then_some(true),
                ..DataModelQuery::default()
            };
            emit_json(to_json(&client.models().list_data_models(&query)?)?);
        }
        ModelsCommand::Classify { .. } => {
            return Err(Error::new(ErrorKind::Internal)
                .with_message("classify is handled before a client is built"));
        }
    }
    Ok(RunOutcome::ok())
}

fn list_query(page: PageArgs) -> RawListQuery {
    RawListQuery {
        limit: page.limit,
        cursor: page.cursor,
    }
}

fn parse_identities(raw: &[String]) -> Vec<Identity> {
    raw.iter().map(|value| Identity::parse(value)).collect()
}
