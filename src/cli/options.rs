//! Option alias tables and typed coercion.

use crate::cli::args::ParsedArguments;
use crate::domain::columns::{parse_columns, ColumnMap};
use crate::domain::config::MemCliConfig;
use crate::domain::error::{MemCliError, MemCliResult};
use serde::{Deserialize, Serialize};

/// One logical option and every spelling accepted for it.
#[derive(Debug)]
pub struct OptionSpec {
    /// Long name shown in usage text.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Value placeholder for usage text; `None` for flags.
    pub value_name: Option<&'static str>,
    pub help: &'static str,
}

impl OptionSpec {
    pub fn is_flag(&self) -> bool {
        self.value_name.is_none()
    }
}

/// Lowercase and drop `-`/`_`, so `client-id`, `clientId` and `client_id` agree.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub static HELP: OptionSpec = OptionSpec {
    name: "help",
    aliases: &["help"],
    value_name: None,
    help: "Print usage",
};

pub static OUTPUT: OptionSpec = OptionSpec {
    name: "output",
    aliases: &["output", "output-mode"],
    value_name: Some("MODE"),
    help: "Output format (text|json)",
};

pub static USERNAME: OptionSpec = OptionSpec {
    name: "username",
    aliases: &["username", "user"],
    value_name: Some("VALUE"),
    help: "Memrise username",
};

pub static PASSWORD: OptionSpec = OptionSpec {
    name: "password",
    aliases: &["password"],
    value_name: Some("VALUE"),
    help: "Memrise password",
};

pub static CLIENT_ID: OptionSpec = OptionSpec {
    name: "client-id",
    aliases: &["client-id"],
    value_name: Some("VALUE"),
    help: "Optional client id",
};

pub static CONFIG: OptionSpec = OptionSpec {
    name: "config",
    aliases: &["config", "config-file"],
    value_name: Some("PATH"),
    help: "Configuration file path",
};

pub static VERBOSE: OptionSpec = OptionSpec {
    name: "verbose",
    aliases: &["verbose"],
    value_name: None,
    help: "Enable debug logging (after the command, or --verbose=)",
};

pub static LIMIT: OptionSpec = OptionSpec {
    name: "limit",
    aliases: &["limit"],
    value_name: Some("NUMBER"),
    help: "Maximum number of results",
};

pub static OFFSET: OptionSpec = OptionSpec {
    name: "offset",
    aliases: &["offset"],
    value_name: Some("NUMBER"),
    help: "Number of results to skip",
};

pub static LEVEL_INDEX: OptionSpec = OptionSpec {
    name: "level-index",
    aliases: &["level-index"],
    value_name: Some("NUMBER"),
    help: "Level index (0-based)",
};

pub static LEVEL: OptionSpec = OptionSpec {
    name: "level",
    aliases: &["level"],
    value_name: Some("INDEX"),
    help: "Level index (1-based)",
};

pub static INCLUDE_EMPTY: OptionSpec = OptionSpec {
    name: "include-empty",
    aliases: &["include-empty"],
    value_name: None,
    help: "Include levels without items",
};

pub static ORIGINAL_ONLY: OptionSpec = OptionSpec {
    name: "original-only",
    aliases: &["original-only"],
    value_name: None,
    help: "Restrict pool search to original content",
};

pub static FIELD: OptionSpec = OptionSpec {
    name: "field",
    aliases: &["field"],
    value_name: Some("KEY=VALUE"),
    help: "Column pair, repeatable",
};

pub static COLUMNS: OptionSpec = OptionSpec {
    name: "columns",
    aliases: &["columns"],
    value_name: Some("JSON"),
    help: "JSON map of column pairs",
};

pub static EXCLUDE: OptionSpec = OptionSpec {
    name: "exclude",
    aliases: &["exclude", "exclude-id"],
    value_name: Some("ID"),
    help: "Exclude learnable ID, repeatable",
};

pub static POOL_ID: OptionSpec = OptionSpec {
    name: "pool-id",
    aliases: &["pool-id"],
    value_name: Some("ID"),
    help: "Pool ID",
};

pub static KIND: OptionSpec = OptionSpec {
    name: "kind",
    aliases: &["kind", "level-kind"],
    value_name: Some("STRING"),
    help: "Level kind",
};

/// Options accepted before any command.
pub static GLOBAL_OPTIONS: &[&OptionSpec] =
    &[&OUTPUT, &USERNAME, &PASSWORD, &CLIENT_ID, &CONFIG, &VERBOSE];

/// Every option the CLI knows about.
pub static ALL_OPTIONS: &[&OptionSpec] = &[
    &HELP, &OUTPUT, &USERNAME, &PASSWORD, &CLIENT_ID, &CONFIG, &VERBOSE, &LIMIT, &OFFSET,
    &LEVEL_INDEX, &LEVEL, &INCLUDE_EMPTY, &ORIGINAL_ONLY, &FIELD, &COLUMNS, &EXCLUDE, &POOL_ID,
    &KIND,
];

/// Key shared by every spelling of one logical option.
///
/// Known aliases collapse to their option's long name; unknown names are
/// only normalized.
pub fn option_group(raw: &str) -> String {
    let wanted = normalize(raw);
    ALL_OPTIONS
        .iter()
        .find(|spec| spec.aliases.iter().any(|alias| normalize(alias) == wanted))
        .map_or(wanted, |spec| spec.name.to_string())
}

const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Strict integer parse: optional sign, digits only, within the safe
/// integer range, and not below `min`.
pub fn parse_integer(option: &str, raw: &str, min: Option<i64>) -> MemCliResult<i64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MemCliError::invalid_option(option, raw, "Expected an integer."));
    }

    let value = trimmed
        .parse::<i64>()
        .ok()
        .filter(|v| (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(v))
        .ok_or_else(|| MemCliError::invalid_option(option, raw, "Integer is out of the safe range."))?;

    match min {
        Some(min) if value < min => Err(MemCliError::invalid_option(
            option,
            raw,
            format!("Must be >= {}.", min),
        )),
        _ => Ok(value),
    }
}

/// Optional integer option with a lower bound.
pub fn integer_option(
    args: &ParsedArguments,
    spec: &OptionSpec,
    min: Option<i64>,
) -> MemCliResult<Option<i64>> {
    args.get(spec)
        .map(|raw| parse_integer(spec.name, raw, min))
        .transpose()
}

/// Optional non-negative count such as `--limit` or `--level-index`.
pub fn count_option(args: &ParsedArguments, spec: &OptionSpec) -> MemCliResult<Option<u64>> {
    Ok(integer_option(args, spec, Some(0))?.map(|v| v.unsigned_abs()))
}

/// Column map from `--field` values merged with `--columns`.
pub fn column_map(args: &ParsedArguments) -> MemCliResult<ColumnMap> {
    parse_columns(&args.get_all(&FIELD), args.get(&COLUMNS))
}

/// Output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable text output
    #[default]
    Text,
    /// Pretty-printed JSON output
    Json,
}

impl OutputMode {
    /// Only the literal `json` selects JSON; anything else falls back to text.
    pub fn from_value(value: &str) -> Self {
        if value == "json" {
            Self::Json
        } else {
            Self::Text
        }
    }

    /// `--output` first, then the configured default.
    pub fn resolve(args: &ParsedArguments, config: &MemCliConfig) -> Self {
        Self::from_value(args.get(&OUTPUT).unwrap_or(config.global.output.as_str()))
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Text => write!(f, "text"),
            OutputMode::Json => write!(f, "json"),
        }
    }
}
