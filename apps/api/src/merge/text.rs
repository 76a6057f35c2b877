use serde_json::Value;

/// Keys checked, in order, when a mapping stands in for a single piece of text.
const PREFERRED_TEXT_KEYS: &[&str] = &[
    "text",
    "bullet",
    "content",
    "value",
    "description",
    "summary",
    "highlight",
];

/// Comparison form of a string: whitespace runs collapsed, trimmed, lowercased.
/// Never used for display values.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Flattens any JSON value into display text.
///
/// - null → `""`
/// - string / number / bool → its string form
/// - array → `", "`-joined coerced elements, empty ones dropped
/// - object → the first primitive under a preferred text key, otherwise
///   `"key: value"` pairs joined with `"; "`
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(_) => primitive_text(value).unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .map(coerce_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => {
            for key in PREFERRED_TEXT_KEYS {
                if let Some(text) = map.get(*key).and_then(primitive_text) {
                    return text;
                }
            }
            map.iter()
                .filter_map(|(k, v)| {
                    let text = coerce_text(v);
                    (!text.is_empty()).then(|| format!("{k}: {text}"))
                })
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// Coerces an optional field; a missing field reads as empty text.
pub fn coerce_field(value: Option<&Value>) -> String {
    value.map(coerce_text).unwrap_or_default()
}

/// Coerces a value into a list of non-blank, trimmed strings.
pub fn coerce_text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| coerce_text(item).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(_) | Value::Object(_) => {
            let text = coerce_text(value).trim().to_string();
            if text.is_empty() {
                vec![]
            } else {
                vec![text]
            }
        }
        _ => vec![],
    }
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn primitive_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
