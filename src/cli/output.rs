//! Response rendering.
//!
//! JSON mode pretty-prints whatever came back. Text mode hands the response
//! to a per-command formatter that checks the shape it expects and prints a
//! fallback line when the shape is wrong; formatters never fail on content.

use crate::cli::options::OutputMode;
use crate::cli::registry::{self, CommandId};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::io::{self, Write};

/// Output writer trait
pub trait OutputWriter {
    fn write_response(
        &mut self,
        command: CommandId,
        response: &Value,
        mode: OutputMode,
        context: &[String],
    ) -> Result<(), OutputError>;
    fn write_usage(&mut self) -> Result<(), OutputError>;
    fn write_error(&mut self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::MemCliError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
///
/// Rendered responses and usage go to `out`; errors and the unknown-command
/// notice go to `err`.
pub struct ConsoleWriter<O = io::Stdout, E = io::Stderr> {
    out: O,
    err: E,
}

impl ConsoleWriter {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleWriter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Usage text on the error stream, after an unknown command.
    pub fn write_usage_to_err(&mut self) -> Result<(), OutputError> {
        writeln!(self.err, "{}", registry::usage_text())?;
        Ok(())
    }
}

impl<O: Write, E: Write> OutputWriter for ConsoleWriter<O, E> {
    fn write_response(
        &mut self,
        command: CommandId,
        response: &Value,
        mode: OutputMode,
        context: &[String],
    ) -> Result<(), OutputError> {
        render(&mut self.out, command.name(), response, mode, context)?;
        self.out.flush()?;
        Ok(())
    }

    fn write_usage(&mut self) -> Result<(), OutputError> {
        writeln!(self.out, "{}", registry::usage_text())?;
        Ok(())
    }

    fn write_error(&mut self, error: &str) -> Result<(), OutputError> {
        writeln!(self.err, "{}", error)?;
        Ok(())
    }
}

/// Render one response for the canonical command `command`.
///
/// `context` holds the command's positional arguments, used by reports that
/// echo what was acted on. Names with no formatter fall back to JSON.
pub fn render<W: Write + ?Sized>(
    out: &mut W,
    command: &str,
    response: &Value,
    mode: OutputMode,
    context: &[String],
) -> Result<(), OutputError> {
    let id = match (mode, CommandId::from_name(command)) {
        (OutputMode::Text, Some(id)) => id,
        _ => return write_json(out, response),
    };

    let mut buf = Vec::new();
    match id {
        CommandId::Courses => write_courses(&mut buf, response)?,
        CommandId::CourseById | CommandId::CourseBySlug => write_course(&mut buf, response)?,
        CommandId::Levels => write_levels(&mut buf, response, false)?,
        CommandId::LevelsWithItems => write_levels(&mut buf, response, true)?,
        CommandId::Columns => write_columns(&mut buf, response)?,
        CommandId::Words => write_words(&mut buf, response)?,
        CommandId::Learnable => write_learnable(&mut buf, response)?,
        CommandId::GetPool => write_pool(&mut buf, response)?,
        CommandId::SearchPool => write_pool_search(&mut buf, response)?,
        CommandId::AddThingCourse | CommandId::AddThingLevel => write_add_thing(&mut buf, response)?,
        CommandId::AddLevelToCourse => write_add_level(&mut buf, response)?,
        CommandId::RenameLevel => write_rename_level(&mut buf, response, context)?,
        CommandId::DeleteLevel => write_delete_level(&mut buf, response, context)?,
    }
    out.write_all(&buf)?;
    Ok(())
}

fn write_json<W: Write + ?Sized>(out: &mut W, response: &Value) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(response)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Display a scalar, `placeholder` when absent or null.
fn text(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        None | Some(Value::Null) => placeholder.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn as_object(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object)
}

fn as_array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn progress_suffix(progress: Option<&Value>) -> String {
    let Some(p) = as_object(progress) else {
        return String::new();
    };
    format!(
        " (learned: {}, due: {}, ignored: {}, difficulty: {}, percent: {}%)",
        text(p.get("learned"), "n/a"),
        text(p.get("due_review"), "n/a"),
        text(p.get("ignored"), "n/a"),
        text(p.get("difficult"), "n/a"),
        text(p.get("percent_complete"), "n/a"),
    )
}

fn write_courses(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(payload) = data.as_object() else {
        return writeln!(out, "No courses returned.");
    };

    let courses = as_array(payload.get("courses"));
    writeln!(out, "Courses ({})", courses.len())?;
    writeln!(out, "Filter: {}", text(payload.get("applied_filter"), ""))?;
    for course in courses.iter().filter_map(Value::as_object) {
        writeln!(
            out,
            "- {} ({}){}",
            text(course.get("name"), "<unnamed>"),
            text(course.get("id"), "?"),
            progress_suffix(course.get("progress"))
        )?;
        writeln!(out, "  slug: {}", text(course.get("slug"), ""))?;
        writeln!(out, "  official: {}", text(course.get("is_official"), "false"))?;
    }
    if truthy(payload.get("has_more_pages")) {
        writeln!(out, "More pages are available. Use --offset / --limit to page.")?;
    }
    Ok(())
}

fn write_course(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let course = match data {
        Value::Object(course) => course,
        Value::Array(_) => return writeln!(out, "Course not found."),
        scalar if !truthy(Some(scalar)) => return writeln!(out, "Course not found."),
        scalar => return writeln!(out, "{}", text(Some(scalar), "")),
    };

    writeln!(
        out,
        "{} ({})",
        text(course.get("name"), "<unnamed>"),
        text(course.get("id"), "?")
    )?;
    writeln!(out, "Slug: {}", text(course.get("slug"), ""))?;
    writeln!(out, "Official: {}", text(course.get("is_official"), "false"))?;
    writeln!(out, "Photo: {}", text(course.get("photo_url"), ""))?;
    if as_object(course.get("progress")).is_some() {
        writeln!(out, "Progress:{}", progress_suffix(course.get("progress")))?;
    }
    Ok(())
}

fn write_levels(out: &mut Vec<u8>, data: &Value, with_items: bool) -> io::Result<()> {
    let Some(levels) = data.as_array() else {
        return writeln!(out, "No levels returned.");
    };

    writeln!(out, "Levels ({})", levels.len())?;
    for level in levels.iter().filter_map(Value::as_object) {
        let title = text(level.get("title"), "");
        if title.is_empty() {
            writeln!(out, "- #{}", text(level.get("index"), "?"))?;
        } else {
            writeln!(out, "- {}", title)?;
        }
        writeln!(
            out,
            "  id: {} | index: {} | kind: {} | pool: {}",
            text(level.get("id"), "?"),
            text(level.get("index"), "?"),
            text(level.get("kind"), "?"),
            text(level.get("pool_id"), "?"),
        )?;

        if with_items {
            let items = as_array(level.get("items"));
            writeln!(out, "  Items ({})", items.len())?;
            for item in items {
                write_item(out, item, "  ")?;
            }
        }
    }
    Ok(())
}

fn write_columns(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(columns) = data.as_object() else {
        return writeln!(out, "No columns returned.");
    };

    writeln!(out, "Columns ({})", columns.len())?;
    for (id, config) in columns {
        let Some(config) = config.as_object() else {
            continue;
        };
        let label = text(config.get("label"), "");
        let label = if label.is_empty() { "(no label)".to_string() } else { label };
        writeln!(out, "- [{}] {}", id, label)?;
        writeln!(out, "  kind: {}", text(config.get("kind"), ""))?;
        if let Some(strict) = config.get("typing_strict") {
            writeln!(out, "  typing strict: {}", text(Some(strict), "null"))?;
        }
    }
    Ok(())
}

/// `label: value` for objects carrying both keys; anything else is skipped.
fn write_labeled(out: &mut Vec<u8>, value: Option<&Value>, prefix: &str) -> io::Result<()> {
    match as_object(value) {
        Some(pair) if pair.contains_key("label") && pair.contains_key("value") => writeln!(
            out,
            "{}{}: {}",
            prefix,
            text(pair.get("label"), ""),
            text(pair.get("value"), "")
        ),
        _ => Ok(()),
    }
}

/// Numeric keys first in numeric order, then the rest lexically.
fn screen_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn write_item(out: &mut Vec<u8>, item: &Value, indent: &str) -> io::Result<()> {
    let Some(item) = item.as_object() else {
        return Ok(());
    };
    let field_prefix = format!("{}  ", indent);
    writeln!(out, "{}- ID: {}", indent, text(item.get("id"), "?"))?;

    if let Some(screens) = as_object(item.get("screens")) {
        let mut keys: Vec<&String> = screens.keys().collect();
        keys.sort_by(|a, b| screen_order(a, b));
        for key in keys {
            let Some(screen) = screens.get(key.as_str()).and_then(Value::as_object) else {
                continue;
            };
            write_labeled(out, screen.get("item"), &field_prefix)?;
            write_labeled(out, screen.get("definition"), &field_prefix)?;
            for info in as_array(screen.get("visible_info")) {
                write_labeled(out, Some(info), &field_prefix)?;
            }
            for attribute in as_array(screen.get("attributes")) {
                write_labeled(out, Some(attribute), &field_prefix)?;
            }
        }
    } else {
        if truthy(item.get("learning_element")) {
            writeln!(out, "{}Learning: {}", field_prefix, text(item.get("learning_element"), ""))?;
        }
        if truthy(item.get("definition_element")) {
            writeln!(out, "{}Definition: {}", field_prefix, text(item.get("definition_element"), ""))?;
        }
    }

    if truthy(item.get("item_type")) {
        writeln!(out, "{}Type: {}", field_prefix, text(item.get("item_type"), ""))?;
    }
    Ok(())
}

fn write_words(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(items) = data.as_array() else {
        return writeln!(out, "No words returned.");
    };

    writeln!(out, "Words ({})", items.len())?;
    for item in items {
        write_item(out, item, "")?;
    }
    Ok(())
}

fn write_learnable(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let learnable = match data {
        Value::Object(learnable) => learnable,
        Value::Array(_) => return writeln!(out, "Learnable not found."),
        scalar if !truthy(Some(scalar)) => return writeln!(out, "Learnable not found."),
        scalar => return writeln!(out, "{}", text(Some(scalar), "")),
    };

    writeln!(out, "Learnable {}", text(learnable.get("id"), "?"))?;
    writeln!(out, "Learning: {}", text(learnable.get("learning_element"), ""))?;
    writeln!(out, "Definition: {}", text(learnable.get("definition_element"), ""))?;
    writeln!(out, "Type: {}", text(learnable.get("item_type"), ""))?;
    writeln!(out, "Difficulty: {}", text(learnable.get("difficulty"), ""))?;
    Ok(())
}

fn key_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Object(map)) => map.len(),
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    }
}

fn write_pool(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(payload) = data.as_object() else {
        return writeln!(out, "No pool returned.");
    };
    let Some(pool) = as_object(payload.get("pool")) else {
        return writeln!(out, "Pool not found.");
    };

    writeln!(
        out,
        "Pool {} - {}",
        text(pool.get("id"), "?"),
        text(pool.get("name"), "<unnamed>")
    )?;
    writeln!(
        out,
        "Can curate: {} | Can moderate: {}",
        text(pool.get("can_curate"), "false"),
        text(pool.get("can_moderate"), "false")
    )?;
    writeln!(out, "Columns: {}", key_count(pool.get("columns")))?;
    writeln!(out, "Attributes: {}", key_count(pool.get("attributes")))?;
    Ok(())
}

fn write_pool_search(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(payload) = data.as_object() else {
        return writeln!(out, "No search response returned.");
    };

    let items = as_array(payload.get("result"));
    writeln!(out, "Matches ({})", items.len())?;
    for item in items.iter().filter_map(Value::as_object) {
        writeln!(out, "- id: {}", text(item.get("id"), "?"))?;
        if let Some(columns) = as_object(item.get("columns")) {
            for (key, value) in columns {
                if let Some(value) = value.as_object() {
                    writeln!(out, "  {}: {}", key, text(value.get("val"), ""))?;
                }
            }
        }
    }
    Ok(())
}

fn write_add_level(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(response) = data.as_object() else {
        return writeln!(out, "No result returned.");
    };

    writeln!(out, "Success: {}", text(response.get("success"), "false"))?;
    if let Some(level) = as_object(response.get("level")) {
        writeln!(out, "Level ID: {}", text(level.get("id"), "?"))?;
        writeln!(
            out,
            "  index: {} | kind: {} | pool: {}",
            text(level.get("index"), "?"),
            text(level.get("kind"), "?"),
            text(level.get("pool_id"), "?"),
        )?;
        if truthy(level.get("title")) {
            writeln!(out, "  title: {}", text(level.get("title"), ""))?;
        }
    }
    Ok(())
}

fn write_add_thing(out: &mut Vec<u8>, data: &Value) -> io::Result<()> {
    let Some(response) = data.as_object() else {
        return writeln!(out, "No result returned.");
    };

    writeln!(out, "Success: {}", text(response.get("success"), "false"))?;
    if let Some(thing) = as_object(response.get("thing")) {
        writeln!(out, "Thing ID: {}", text(thing.get("id"), "?"))?;
        if let Some(columns) = as_object(thing.get("columns")) {
            let pairs: Vec<String> = columns
                .iter()
                .map(|(key, value)| match value.as_object() {
                    Some(column) => format!("{}: {}", key, text(column.get("val"), "")),
                    None => format!("{}: {}", key, text(Some(value), "null")),
                })
                .collect();
            writeln!(out, "Columns: {}", pairs.join(", "))?;
        }
    }
    Ok(())
}

fn write_delete_level(out: &mut Vec<u8>, data: &Value, context: &[String]) -> io::Result<()> {
    let Some(response) = data.as_object() else {
        return writeln!(out, "No result returned.");
    };

    writeln!(out, "Success: {}", text(response.get("success"), "false"))?;
    writeln!(out, "Deleted level ID: {}", context.first().map_or("?", String::as_str))?;
    Ok(())
}

fn write_rename_level(out: &mut Vec<u8>, data: &Value, context: &[String]) -> io::Result<()> {
    let Some(response) = data.as_object() else {
        return writeln!(out, "No result returned.");
    };

    writeln!(out, "Success: {}", text(response.get("success"), "false"))?;
    writeln!(out, "Level ID: {}", context.first().map_or("?", String::as_str))?;
    writeln!(out, "New title: {}", context.get(1).map_or("?", String::as_str))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_text(command: CommandId, response: Value) -> String {
        let mut out = Vec::new();
        render(&mut out, command.name(), &response, OutputMode::Text, &[]).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_helper() {
        assert_eq!(text(None, "n/a"), "n/a");
        assert_eq!(text(Some(&Value::Null), "n/a"), "n/a");
        assert_eq!(text(Some(&json!("x")), "n/a"), "x");
        assert_eq!(text(Some(&json!(12)), "n/a"), "12");
        assert_eq!(text(Some(&json!(true)), "n/a"), "true");
    }

    #[test]
    fn test_truthy() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(!truthy(Some(&json!(false))));
        assert!(truthy(Some(&json!([]))));
        assert!(truthy(Some(&json!("x"))));
    }

    #[test]
    fn test_screen_order() {
        let mut keys = vec!["10", "2", "b", "1", "a"];
        keys.sort_by(|a, b| screen_order(a, b));
        assert_eq!(keys, ["1", "2", "10", "a", "b"]);
    }

    #[test]
    fn test_course_progress() {
        let output = render_text(
            CommandId::CourseById,
            json!({
                "id": 7, "name": "German", "slug": "de",
                "progress": { "learned": 3, "due_review": 1, "percent_complete": 40 }
            }),
        );
        assert!(output.starts_with("German (7)\n"));
        assert!(output.contains("Official: false"));
        assert!(output.contains(
            "Progress: (learned: 3, due: 1, ignored: n/a, difficulty: n/a, percent: 40%)"
        ));
    }

    #[test]
    fn test_scalar_course_is_printed() {
        assert_eq!(render_text(CommandId::CourseBySlug, json!("gone")), "gone\n");
        assert_eq!(render_text(CommandId::CourseBySlug, json!(0)), "Course not found.\n");
    }

    #[test]
    fn test_levels_title_fallback() {
        let output = render_text(
            CommandId::Levels,
            json!([
                { "id": 1, "index": 1, "title": "Basics", "kind": 1, "pool_id": 5 },
                { "id": 2, "index": 2, "title": "" },
                "junk"
            ]),
        );
        assert!(output.starts_with("Levels (3)\n"));
        assert!(output.contains("- Basics\n  id: 1 | index: 1 | kind: 1 | pool: 5\n"));
        assert!(output.contains("- #2\n  id: 2 | index: 2 | kind: ? | pool: ?\n"));
    }

    #[test]
    fn test_columns() {
        let output = render_text(
            CommandId::Columns,
            json!({
                "1": { "label": "Spanish", "kind": "text", "typing_strict": false },
                "2": { "kind": "audio" },
                "3": 4
            }),
        );
        assert!(output.starts_with("Columns (3)\n"));
        assert!(output.contains("- [1] Spanish\n  kind: text\n  typing strict: false\n"));
        assert!(output.contains("- [2] (no label)\n  kind: audio\n"));
        assert!(!output.contains("[3]"));
    }

    #[test]
    fn test_words_screens_sorted_and_malformed_pairs_skipped() {
        let output = render_text(
            CommandId::Words,
            json!([{
                "id": 11,
                "item_type": "word",
                "screens": {
                    "10": { "item": { "label": "Late", "value": "z" } },
                    "2": {
                        "item": { "label": "Spanish", "value": "hola" },
                        "definition": { "label": "English", "value": null },
                        "visible_info": [{ "label": "Gender", "value": "m" }, { "label": "broken" }, 3],
                        "attributes": "nope"
                    }
                }
            }]),
        );
        assert_eq!(
            output,
            "Words (1)\n- ID: 11\n  Spanish: hola\n  English: \n  Gender: m\n  Late: z\n  Type: word\n"
        );
    }

    #[test]
    fn test_words_legacy_fields() {
        let output = render_text(
            CommandId::Words,
            json!([{ "learning_element": "gato", "definition_element": "cat" }]),
        );
        assert_eq!(output, "Words (1)\n- ID: ?\n  Learning: gato\n  Definition: cat\n");
    }

    #[test]
    fn test_levels_with_items() {
        let output = render_text(
            CommandId::LevelsWithItems,
            json!([{ "id": 1, "index": 1, "title": "Basics", "items": [{ "id": 3, "learning_element": "uno" }] }]),
        );
        assert!(output.contains("  Items (1)\n  - ID: 3\n    Learning: uno\n"));
    }

    #[test]
    fn test_pool_and_search() {
        let output = render_text(
            CommandId::GetPool,
            json!({ "pool": { "id": 4, "name": "Spanish", "can_curate": true, "columns": { "1": {}, "2": {} }, "attributes": null } }),
        );
        assert_eq!(
            output,
            "Pool 4 - Spanish\nCan curate: true | Can moderate: false\nColumns: 2\nAttributes: 0\n"
        );

        let output = render_text(CommandId::GetPool, json!({ "pool": null }));
        assert_eq!(output, "Pool not found.\n");

        let output = render_text(
            CommandId::SearchPool,
            json!({ "result": [{ "id": 8, "columns": { "1": { "val": "hola" }, "2": "flat" } }] }),
        );
        assert_eq!(output, "Matches (1)\n- id: 8\n  1: hola\n");
    }

    #[test]
    fn test_add_thing_and_level() {
        let output = render_text(
            CommandId::AddThingCourse,
            json!({ "success": true, "thing": { "id": 99, "columns": { "1": { "val": "hola" }, "2": "x" } } }),
        );
        assert_eq!(output, "Success: true\nThing ID: 99\nColumns: 1: hola, 2: x\n");

        let output = render_text(
            CommandId::AddLevelToCourse,
            json!({ "success": true, "level": { "id": 5, "index": 3, "kind": 1, "pool_id": 2, "title": "New" } }),
        );
        assert_eq!(
            output,
            "Success: true\nLevel ID: 5\n  index: 3 | kind: 1 | pool: 2\n  title: New\n"
        );
    }

    #[test]
    fn test_rename_and_delete_use_context() {
        let mut out = Vec::new();
        let context = ["12".to_string(), "Verbs".to_string()];
        render(&mut out, "rename-level", &json!({ "success": true }), OutputMode::Text, &context).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Success: true\nLevel ID: 12\nNew title: Verbs\n"
        );

        let mut out = Vec::new();
        render(&mut out, "delete-level", &json!({}), OutputMode::Text, &context[..1]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Success: false\nDeleted level ID: 12\n");
    }

    #[test]
    fn test_json_mode_and_unknown_name() {
        let mut out = Vec::new();
        render(&mut out, "courses", &json!({ "a": [1] }), OutputMode::Json, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"a\": [\n    1\n  ]\n}\n");

        let mut out = Vec::new();
        render(&mut out, "no-such-command", &json!(null), OutputMode::Text, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "null\n");
    }
}
