//! String → Value parsing rules.
//!
//! User input is parsed into a JSON value using auto-detect logic:
//! 1. JSON structures (`{`, `[`, `"`) → parse as JSON
//! 2. `null` / `true` / `false` → JSON literals
//! 3. Anything that parses as a JSON number → number
//! 4. Everything else → string

use serde_json::Value;

/// Auto-detect value type from a user-supplied string.
///
/// Malformed JSON structures fall through to plain strings.
pub fn parse_value(s: &str) -> Value {
    // Rule 1: JSON structures
    if s.starts_with('{') || s.starts_with('[') || s.starts_with('"') {
        if let Ok(json) = serde_json::from_str::<Value>(s) {
            return json;
        }
    }

    // Rule 2: literals
    match s {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    // Rule 3: numbers
    if looks_numeric(s) {
        if let Ok(n @ Value::Number(_)) = serde_json::from_str::<Value>(s) {
            return n;
        }
    }

    // Rule 4: everything else is a string
    Value::String(s.to_string())
}

fn looks_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.chars().next().map_or(false, |c| c.is_ascii_digit())
}
