//! Static command table and usage text.

use crate::cli::options::{
    OptionSpec, COLUMNS, EXCLUDE, FIELD, GLOBAL_OPTIONS, INCLUDE_EMPTY, KIND, LEVEL, LEVEL_INDEX,
    LIMIT, OFFSET, ORIGINAL_ONLY, POOL_ID,
};
use crate::cli::args::SHORT_OPTIONS;
use clap::{Arg, ArgAction, Command};

/// Canonical command identity; rendering keys off this, never the alias typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Courses,
    CourseById,
    CourseBySlug,
    Levels,
    LevelsWithItems,
    Columns,
    Words,
    Learnable,
    GetPool,
    SearchPool,
    AddThingCourse,
    AddThingLevel,
    AddLevelToCourse,
    RenameLevel,
    DeleteLevel,
}

/// One registry row: canonical name, accepted aliases, usage metadata.
#[derive(Debug)]
pub struct CommandEntry {
    pub id: CommandId,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub about: &'static str,
    /// Required positional labels, in order
    pub arguments: &'static [&'static str],
    pub options: &'static [&'static OptionSpec],
}

pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        id: CommandId::Courses,
        name: "courses",
        aliases: &["my-courses"],
        about: "List your teaching courses",
        arguments: &[],
        options: &[&LIMIT, &OFFSET],
    },
    CommandEntry {
        id: CommandId::CourseById,
        name: "course-by-id",
        aliases: &["course-id"],
        about: "Get course by ID",
        arguments: &["course-id"],
        options: &[],
    },
    CommandEntry {
        id: CommandId::CourseBySlug,
        name: "course-by-slug",
        aliases: &["course-slug"],
        about: "Get course by slug",
        arguments: &["slug"],
        options: &[],
    },
    CommandEntry {
        id: CommandId::Levels,
        name: "levels",
        aliases: &["course-levels"],
        about: "Get levels for a course",
        arguments: &["course-id"],
        options: &[&INCLUDE_EMPTY],
    },
    CommandEntry {
        id: CommandId::LevelsWithItems,
        name: "levels-with-items",
        aliases: &["level-words"],
        about: "Get levels for a course together with their items",
        arguments: &["course-id"],
        options: &[&LEVEL_INDEX],
    },
    CommandEntry {
        id: CommandId::Columns,
        name: "columns",
        aliases: &["course-columns"],
        about: "Get columns for a course",
        arguments: &["course-id"],
        options: &[],
    },
    CommandEntry {
        id: CommandId::Words,
        name: "words",
        aliases: &["items"],
        about: "Get words/items in a course or specific level",
        arguments: &["course-id"],
        options: &[&LEVEL, &LIMIT],
    },
    CommandEntry {
        id: CommandId::Learnable,
        name: "learnable",
        aliases: &[],
        about: "Get learnable item by ID",
        arguments: &["learnable-id"],
        options: &[],
    },
    CommandEntry {
        id: CommandId::GetPool,
        name: "get-pool",
        aliases: &["pool"],
        about: "Get pool information",
        arguments: &["pool-id"],
        options: &[],
    },
    CommandEntry {
        id: CommandId::SearchPool,
        name: "search-pool",
        aliases: &["pool-search"],
        about: "Search pool by column values",
        arguments: &["pool-id"],
        options: &[&FIELD, &COLUMNS, &EXCLUDE, &ORIGINAL_ONLY],
    },
    CommandEntry {
        id: CommandId::AddThingCourse,
        name: "add-thing-course",
        aliases: &["add-to-course"],
        about: "Add a thing to a course (first level by default)",
        arguments: &["course-id"],
        options: &[&FIELD, &COLUMNS, &LEVEL_INDEX],
    },
    CommandEntry {
        id: CommandId::AddThingLevel,
        name: "add-thing-level",
        aliases: &["add-to-level"],
        about: "Add a thing to a specific level",
        arguments: &["level-id"],
        options: &[&FIELD, &COLUMNS],
    },
    CommandEntry {
        id: CommandId::AddLevelToCourse,
        name: "add-level-to-course",
        aliases: &["add-level"],
        about: "Add a new level to a course",
        arguments: &["course-id"],
        options: &[&POOL_ID, &KIND],
    },
    CommandEntry {
        id: CommandId::RenameLevel,
        name: "rename-level",
        aliases: &["set-level-title"],
        about: "Rename a level",
        arguments: &["level-id", "new-title"],
        options: &[],
    },
    CommandEntry {
        id: CommandId::DeleteLevel,
        name: "delete-level",
        aliases: &["remove-level"],
        about: "Delete a level",
        arguments: &["level-id"],
        options: &[],
    },
];

impl CommandId {
    pub fn name(self) -> &'static str {
        match self {
            CommandId::Courses => "courses",
            CommandId::CourseById => "course-by-id",
            CommandId::CourseBySlug => "course-by-slug",
            CommandId::Levels => "levels",
            CommandId::LevelsWithItems => "levels-with-items",
            CommandId::Columns => "columns",
            CommandId::Words => "words",
            CommandId::Learnable => "learnable",
            CommandId::GetPool => "get-pool",
            CommandId::SearchPool => "search-pool",
            CommandId::AddThingCourse => "add-thing-course",
            CommandId::AddThingLevel => "add-thing-level",
            CommandId::AddLevelToCourse => "add-level-to-course",
            CommandId::RenameLevel => "rename-level",
            CommandId::DeleteLevel => "delete-level",
        }
    }

    /// Canonical name back to an id; aliases are not accepted here.
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.id)
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Exact-match lookup against canonical names and aliases.
pub fn lookup(raw: &str) -> Option<&'static CommandEntry> {
    COMMANDS
        .iter()
        .find(|entry| entry.name == raw || entry.aliases.iter().any(|alias| *alias == raw))
}

fn option_arg(spec: &'static OptionSpec) -> Arg {
    let arg = Arg::new(spec.name).long(spec.name).help(spec.help);
    let arg = match spec.value_name {
        Some(value_name) => arg.value_name(value_name).action(ArgAction::Append),
        None => arg.action(ArgAction::SetTrue),
    };
    let short = SHORT_OPTIONS
        .iter()
        .find(|(_, long, _)| *long == spec.name)
        .and_then(|(token, _, _)| token.chars().nth(1));
    match short {
        Some(short) => arg.short(short),
        None => arg,
    }
}

const USAGE_NOTES: &str = "\
Flags without a value (--verbose, --include-empty, --original-only) take the
next word as their value unless it starts with '-'. Put them after the command and its
arguments, or write them with '=' (for example --verbose=).

Credentials: MEMRISE_USERNAME, MEMRISE_PASSWORD, MEMRISE_CLIENT_ID";

/// clap description of the command line, used only to render help.
pub fn usage_command() -> Command {
    let mut command = Command::new("memcli")
        .about("CLI for Memrise teaching")
        .version(env!("CARGO_PKG_VERSION"))
        .disable_help_subcommand(true)
        .after_help(USAGE_NOTES);

    for spec in GLOBAL_OPTIONS {
        command = command.arg(option_arg(spec).global(true));
    }

    for entry in COMMANDS {
        let mut subcommand = Command::new(entry.name)
            .about(entry.about)
            .visible_aliases(entry.aliases.iter().copied());
        for label in entry.arguments {
            subcommand = subcommand.arg(Arg::new(*label).required(true));
        }
        for spec in entry.options {
            subcommand = subcommand.arg(option_arg(spec));
        }
        command = command.subcommand(subcommand);
    }
    command
}

/// Top-level usage text.
pub fn usage_text() -> String {
    usage_command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_alias() {
        assert_eq!(lookup("courses").map(|e| e.id), Some(CommandId::Courses));
        assert_eq!(lookup("my-courses").map(|e| e.id), Some(CommandId::Courses));
        assert_eq!(lookup("set-level-title").map(|e| e.id), Some(CommandId::RenameLevel));
        assert!(lookup("Courses").is_none());
        assert!(lookup("help").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_spellings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in COMMANDS {
            for spelling in std::iter::once(&entry.name).chain(entry.aliases) {
                assert!(seen.insert(*spelling), "duplicate spelling {}", spelling);
            }
        }
    }

    #[test]
    fn test_id_round_trip() {
        for entry in COMMANDS {
            assert_eq!(entry.id.name(), entry.name);
            assert_eq!(CommandId::from_name(entry.name), Some(entry.id));
        }
        assert_eq!(CommandId::from_name("my-courses"), None);
    }

    #[test]
    fn test_usage_lists_commands_and_aliases() {
        usage_command().debug_assert();
        let usage = usage_text();
        assert!(usage.contains("Usage:"));
        for entry in COMMANDS {
            assert!(usage.contains(entry.name), "{}", entry.name);
        }
        assert!(usage.contains("my-courses"));
        assert!(usage.contains("--output"));
    }

    #[test]
    fn test_usage_explains_flag_placement() {
        let usage = usage_text();
        assert!(usage.contains("--verbose="));
        assert!(usage.contains("Put them after the command"));
        assert!(usage.contains("MEMRISE_USERNAME"));
    }
}
