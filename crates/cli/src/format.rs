//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): values rendered for reading, e.g. `(integer) 3`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use jsonkv_core::{render_value, to_pretty_json, Entry, Error};
use serde_json::{json, Value};

use crate::dispatch::Output;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({ "error": err.to_string() }))
            .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Value(v) => render_value(v),
        Output::Kind(k) => k.to_string(),
        Output::Bool(b) => b.to_string(),
        Output::Count(n) => format!("(integer) {}", n),
        Output::Entries(entries) => format_entries_human(entries),
        Output::Document(doc) => to_pretty_json(&Value::Object(doc.as_map().clone())),
        Output::Keys(keys) => {
            if keys.is_empty() {
                "(empty list)".to_string()
            } else {
                keys.iter()
                    .enumerate()
                    .map(|(i, k)| format!("{}) \"{}\"", i + 1, k))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Output::Snapshot(info) => format!(
            "OK {} ({} entries, {} bytes)",
            info.path.display(),
            info.entries,
            info.size_bytes
        ),
    }
}

fn format_entries_human(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "(empty list)".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{}: {}", e.key, e.value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Unit => json!({ "ok": true }),
        Output::Value(v) => v.clone(),
        Output::Kind(k) => json!(k),
        Output::Bool(b) => json!(b),
        Output::Count(n) => json!(n),
        Output::Entries(entries) => json!(entries),
        Output::Document(doc) => json!(doc),
        Output::Keys(keys) => json!(keys),
        Output::Snapshot(info) => json!({
            "path": info.path.display().to_string(),
            "entries": info.entries,
            "size_bytes": info.size_bytes,
        }),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
