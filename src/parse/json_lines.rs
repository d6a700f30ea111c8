use serde_json::{Map, Value};

/// Result of scanning a completion for one-object-per-line JSON
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonLines {
    /// Objects that parsed and carried every required key
    pub records: Vec<Map<String, Value>>,
    /// `{`-prefixed lines that failed to parse or lacked a required key
    pub skipped: usize,
}

/// Collect JSON objects from lines that start with `{`
///
/// Lines not starting with `{` are ignored outright. A key whose value is
/// `null` counts as missing.
pub fn parse_json_lines(text: &str, required_keys: &[&str]) -> JsonLines {
    let mut result = JsonLines::default();

    for line in text.lines().map(str::trim) {
        if !line.starts_with('{') {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(object))
                if required_keys.iter().all(|key| field(&object, key).is_some()) =>
            {
                result.records.push(object);
            }
            _ => result.skipped += 1,
        }
    }

    result
}

/// Look up a key as text, rendering non-string values as JSON
pub fn field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
