use crate::cli::args::{Invocation, ParsedArguments};
use crate::cli::options::{
    column_map, count_option, integer_option, OutputMode, EXCLUDE, INCLUDE_EMPTY, KIND, LEVEL,
    LEVEL_INDEX, LIMIT, OFFSET, ORIGINAL_ONLY, POOL_ID,
};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::cli::registry::{self, CommandEntry, CommandId};
use crate::core::client::{ClientFactory, CourseClient};
use crate::domain::columns::ColumnMap;
use crate::domain::config::MemCliConfig;
use crate::domain::error::MemCliResult;
use crate::infrastructure::credentials::Credentials;
use serde_json::Value;
use std::io::Write;

const DEFAULT_COURSE_LIMIT: u64 = 9;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(CommandId),
    Usage,
    UnknownCommand(String),
}

/// A validated command, ready to issue exactly one client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    Courses { limit: u64, offset: u64 },
    CourseById { course_id: String },
    CourseBySlug { slug: String },
    Levels { course_id: String, include_empty: bool },
    LevelsWithItems { course_id: String, level_index: Option<u64> },
    Columns { course_id: String },
    /// `level` is already 0-based
    Words { course_id: String, level: Option<u64>, limit: Option<u64> },
    Learnable { learnable_id: String },
    GetPool { pool_id: String },
    SearchPool {
        pool_id: String,
        columns: ColumnMap,
        exclude_ids: Vec<String>,
        original_only: bool,
    },
    AddThingCourse { course_id: String, columns: ColumnMap, level_index: u64 },
    AddThingLevel { level_id: String, columns: ColumnMap },
    AddLevelToCourse { course_id: String, pool_id: Option<String>, kind: Option<String> },
    RenameLevel { level_id: String, title: String },
    DeleteLevel { level_id: String },
}

fn positional(args: &ParsedArguments, index: usize, label: &str) -> MemCliResult<String> {
    args.required_positional(index, label).map(str::to_string)
}

impl CommandRequest {
    /// Extract positionals and coerce options for `id`.
    pub fn from_args(id: CommandId, args: &ParsedArguments) -> MemCliResult<Self> {
        let request = match id {
            CommandId::Courses => CommandRequest::Courses {
                limit: count_option(args, &LIMIT)?.unwrap_or(DEFAULT_COURSE_LIMIT),
                offset: count_option(args, &OFFSET)?.unwrap_or(0),
            },
            CommandId::CourseById => CommandRequest::CourseById {
                course_id: positional(args, 0, "course-id")?,
            },
            CommandId::CourseBySlug => CommandRequest::CourseBySlug {
                slug: positional(args, 0, "slug")?,
            },
            CommandId::Levels => CommandRequest::Levels {
                course_id: positional(args, 0, "course-id")?,
                include_empty: args.has(&INCLUDE_EMPTY),
            },
            CommandId::LevelsWithItems => CommandRequest::LevelsWithItems {
                course_id: positional(args, 0, "course-id")?,
                level_index: count_option(args, &LEVEL_INDEX)?,
            },
            CommandId::Columns => CommandRequest::Columns {
                course_id: positional(args, 0, "course-id")?,
            },
            CommandId::Words => {
                let course_id = positional(args, 0, "course-id")?;
                // --level is 1-based on the command line
                let level = integer_option(args, &LEVEL, Some(1))?.map(|l| l.unsigned_abs() - 1);
                CommandRequest::Words {
                    course_id,
                    level,
                    limit: count_option(args, &LIMIT)?,
                }
            }
            CommandId::Learnable => CommandRequest::Learnable {
                learnable_id: positional(args, 0, "learnable-id")?,
            },
            CommandId::GetPool => CommandRequest::GetPool {
                pool_id: positional(args, 0, "pool-id")?,
            },
            CommandId::SearchPool => CommandRequest::SearchPool {
                pool_id: positional(args, 0, "pool-id")?,
                columns: column_map(args)?,
                exclude_ids: args.get_all(&EXCLUDE),
                original_only: args.has(&ORIGINAL_ONLY),
            },
            CommandId::AddThingCourse => CommandRequest::AddThingCourse {
                course_id: positional(args, 0, "course-id")?,
                columns: column_map(args)?,
                level_index: count_option(args, &LEVEL_INDEX)?.unwrap_or(0),
            },
            CommandId::AddThingLevel => CommandRequest::AddThingLevel {
                level_id: positional(args, 0, "level-id")?,
                columns: column_map(args)?,
            },
            CommandId::AddLevelToCourse => CommandRequest::AddLevelToCourse {
                course_id: positional(args, 0, "course-id")?,
                pool_id: args.get(&POOL_ID).map(str::to_string),
                kind: args.get(&KIND).map(str::to_string),
            },
            CommandId::RenameLevel => CommandRequest::RenameLevel {
                level_id: positional(args, 0, "level-id")?,
                title: positional(args, 1, "new-title")?,
            },
            CommandId::DeleteLevel => CommandRequest::DeleteLevel {
                level_id: positional(args, 0, "level-id")?,
            },
        };
        Ok(request)
    }

    pub fn id(&self) -> CommandId {
        match self {
            CommandRequest::Courses { .. } => CommandId::Courses,
            CommandRequest::CourseById { .. } => CommandId::CourseById,
            CommandRequest::CourseBySlug { .. } => CommandId::CourseBySlug,
            CommandRequest::Levels { .. } => CommandId::Levels,
            CommandRequest::LevelsWithItems { .. } => CommandId::LevelsWithItems,
            CommandRequest::Columns { .. } => CommandId::Columns,
            CommandRequest::Words { .. } => CommandId::Words,
            CommandRequest::Learnable { .. } => CommandId::Learnable,
            CommandRequest::GetPool { .. } => CommandId::GetPool,
            CommandRequest::SearchPool { .. } => CommandId::SearchPool,
            CommandRequest::AddThingCourse { .. } => CommandId::AddThingCourse,
            CommandRequest::AddThingLevel { .. } => CommandId::AddThingLevel,
            CommandRequest::AddLevelToCourse { .. } => CommandId::AddLevelToCourse,
            CommandRequest::RenameLevel { .. } => CommandId::RenameLevel,
            CommandRequest::DeleteLevel { .. } => CommandId::DeleteLevel,
        }
    }

    /// Issue the single client call; the response is returned unchanged.
    pub async fn execute(&self, client: &dyn CourseClient) -> MemCliResult<Value> {
        match self {
            CommandRequest::Courses { limit, offset } => client.list_my_courses(*limit, *offset).await,
            CommandRequest::CourseById { course_id } => client.get_course_by_id(course_id).await,
            CommandRequest::CourseBySlug { slug } => client.get_course_by_slug(slug).await,
            CommandRequest::Levels { course_id, include_empty } => {
                client.list_course_levels(course_id, *include_empty).await
            }
            CommandRequest::LevelsWithItems { course_id, level_index } => {
                client.list_course_levels_with_items(course_id, *level_index).await
            }
            CommandRequest::Columns { course_id } => client.get_course_columns(course_id).await,
            CommandRequest::Words { course_id, level: Some(level), limit } => {
                client.list_level_items(course_id, *level, *limit).await
            }
            CommandRequest::Words { course_id, level: None, limit } => {
                client.list_course_items(course_id, *limit).await
            }
            CommandRequest::Learnable { learnable_id } => client.get_learnable(learnable_id).await,
            CommandRequest::GetPool { pool_id } => client.get_pool(pool_id).await,
            CommandRequest::SearchPool {
                pool_id,
                columns,
                exclude_ids,
                original_only,
            } => {
                client
                    .search_pool(pool_id, columns, exclude_ids, *original_only)
                    .await
            }
            CommandRequest::AddThingCourse {
                course_id,
                columns,
                level_index,
            } => client.add_thing_to_course(course_id, columns, *level_index).await,
            CommandRequest::AddThingLevel { level_id, columns } => {
                client.add_thing_to_level(level_id, columns).await
            }
            CommandRequest::AddLevelToCourse { course_id, pool_id, kind } => {
                client
                    .add_level_to_course(course_id, pool_id.as_deref(), kind.as_deref())
                    .await
            }
            CommandRequest::RenameLevel { level_id, title } => {
                client.set_level_title(level_id, title).await
            }
            CommandRequest::DeleteLevel { level_id } => client.delete_level(level_id).await,
        }
    }
}

/// Where an invocation goes before any configuration is needed.
#[derive(Debug)]
pub enum Route {
    /// A registered command to run.
    Command(&'static CommandEntry),
    /// Help or an unknown command, already written out.
    Done(Outcome),
}

/// Handle help and unknown commands; neither needs configuration.
pub fn route<O: Write, E: Write>(
    invocation: &Invocation,
    writer: &mut ConsoleWriter<O, E>,
) -> MemCliResult<Route> {
    let raw = match invocation.command.as_deref() {
        Some(raw) if !invocation.help_requested() => raw,
        _ => {
            writer.write_usage()?;
            return Ok(Route::Done(Outcome::Usage));
        }
    };

    match registry::lookup(raw) {
        Some(entry) => Ok(Route::Command(entry)),
        None => {
            tracing::debug!(command = raw, "unknown command");
            writer.write_error(&format!("Unknown command: {}", raw))?;
            writer.write_usage_to_err()?;
            Ok(Route::Done(Outcome::UnknownCommand(raw.to_string())))
        }
    }
}

/// Run a routed command: validate arguments, resolve credentials, make the
/// single client call and render the response.
pub async fn run_command<F, O, E>(
    entry: &CommandEntry,
    invocation: &Invocation,
    config: &MemCliConfig,
    factory: &F,
    writer: &mut ConsoleWriter<O, E>,
) -> MemCliResult<Outcome>
where
    F: ClientFactory + ?Sized,
    O: Write,
    E: Write,
{
    let args = invocation.arguments();
    let mode = OutputMode::resolve(&args, config);
    let request = CommandRequest::from_args(entry.id, &args)?;
    tracing::debug!(command = %entry.id, typed = ?invocation.command, %mode, "dispatching");

    let credentials = Credentials::from_env(&args, &config.credentials)?;
    let client = factory.connect(&credentials, config)?;
    let response = request.execute(client.as_ref()).await?;

    writer.write_response(entry.id, &response, mode, args.positional())?;
    Ok(Outcome::Completed(entry.id))
}

/// Execute one invocation end to end with an already loaded configuration.
///
/// Help and unknown commands are successful outcomes. Argument validation
/// runs before credentials are resolved, and credentials before any client
/// call.
pub async fn execute_command<F, O, E>(
    invocation: &Invocation,
    config: &MemCliConfig,
    factory: &F,
    writer: &mut ConsoleWriter<O, E>,
) -> MemCliResult<Outcome>
where
    F: ClientFactory + ?Sized,
    O: Write,
    E: Write,
{
    match route(invocation, writer)? {
        Route::Command(entry) => run_command(entry, invocation, config, factory, writer).await,
        Route::Done(outcome) => Ok(outcome),
    }
}
