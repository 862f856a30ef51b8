//! Column maps: the key/value payload used to create and search pool items.

use crate::domain::error::{MemCliError, MemCliResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Column key to column value, keys unique and ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMap(BTreeMap<String, String>);

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Merge repeated `KEY=VALUE` fields with an optional JSON object.
///
/// Fields are applied in order, then the JSON entries, so JSON wins on a key
/// collision. An empty result is rejected.
pub fn parse_columns(fields: &[String], columns_json: Option<&str>) -> MemCliResult<ColumnMap> {
    let mut columns = ColumnMap::new();

    for raw in fields {
        match raw.find('=') {
            Some(sep) if sep > 0 => columns.insert(raw[..sep].trim(), &raw[sep + 1..]),
            _ => return Err(MemCliError::InvalidField(raw.clone())),
        }
    }

    if let Some(json) = columns_json.filter(|json| !json.is_empty()) {
        let parsed: Value = serde_json::from_str(json)
            .map_err(|e| MemCliError::InvalidColumns(format!("Invalid --columns JSON: {}", e)))?;
        let Value::Object(entries) = parsed else {
            return Err(MemCliError::InvalidColumns(
                "--columns must be a JSON object map, e.g. { \"1\": \"value\" }".to_string(),
            ));
        };
        for (key, value) in entries {
            match value {
                Value::String(value) => columns.insert(key, value),
                _ => {
                    return Err(MemCliError::InvalidColumns(format!(
                        "Column value for key {} must be a string.",
                        key
                    )))
                }
            }
        }
    }

    if columns.is_empty() {
        return Err(MemCliError::NoColumns);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fields_only() {
        let columns = parse_columns(&fields(&["1=x"]), None).unwrap();
        assert_eq!(columns, ColumnMap::from_iter([("1", "x")]));
    }

    #[test]
    fn test_json_only() {
        let columns = parse_columns(&[], Some(r#"{"1":"y"}"#)).unwrap();
        assert_eq!(columns, ColumnMap::from_iter([("1", "y")]));
    }

    #[test]
    fn test_json_overrides_fields() {
        let columns = parse_columns(&fields(&["1=a", "2=keep"]), Some(r#"{"1":"b"}"#)).unwrap();
        assert_eq!(columns.get("1"), Some("b"));
        assert_eq!(columns.get("2"), Some("keep"));
    }

    #[test]
    fn test_later_field_wins_and_value_keeps_equals() {
        let columns = parse_columns(&fields(&[" 1 =first", "1=a=b"]), None).unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns.get("1"), Some("a=b"));
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(parse_columns(&[], None), Err(MemCliError::NoColumns)));
        assert!(matches!(parse_columns(&[], Some("")), Err(MemCliError::NoColumns)));
        assert!(matches!(parse_columns(&[], Some("{}")), Err(MemCliError::NoColumns)));
    }

    #[test]
    fn test_malformed_fields() {
        for raw in ["=value", "novalue"] {
            let err = parse_columns(&fields(&[raw]), None).unwrap_err();
            assert!(err.to_string().contains(raw), "{}", err);
        }
    }

    #[test]
    fn test_json_must_be_object_of_strings() {
        for json in ["null", "[]", "\"x\"", "3"] {
            let err = parse_columns(&[], Some(json)).unwrap_err();
            assert!(err.to_string().contains("must be a JSON object map"), "{}", err);
        }

        let err = parse_columns(&[], Some(r#"{"2": 5}"#)).unwrap_err();
        assert_eq!(err.to_string(), "Column value for key 2 must be a string.");
    }

    #[test]
    fn test_json_parse_failure_surfaces_parser_message() {
        let err = parse_columns(&[], Some("{not json")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid --columns JSON: "));
        assert!(message.contains("line 1"));
    }
}
