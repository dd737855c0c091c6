//! Value kinds, numeric arithmetic and display rendering
//!
//! Stored values are plain `serde_json::Value`s. This module classifies them
//! (`ValueKind`), implements the number arithmetic behind `add`/`subtract`,
//! and renders values for display without changing what `get` returns.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Dynamic kind of a stored value, inferred from its JSON shape.
///
/// Arrays and objects are distinct kinds even though both are JSON
/// containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON array
    Array,
    /// JSON object
    Object,
    /// JSON string
    String,
    /// JSON number (integer or float)
    Number,
    /// JSON boolean
    Boolean,
    /// JSON null; never written by the store, but an edited file may contain it
    Null,
}

impl ValueKind {
    /// Classify a value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
        }
    }

    /// Lowercase name, as reported by `type_of`
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
        }
    }

    /// Arrays and objects
    pub fn is_composite(&self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract a numeric amount, rejecting anything that is not a JSON number.
pub fn require_number(amount: &Value) -> Result<&Number> {
    match amount {
        Value::Number(n) => Ok(n),
        other => Err(Error::invalid_value(format!(
            "amount must be a number, got {}",
            ValueKind::of(other)
        ))),
    }
}

/// `current + amount`.
///
/// Integer operands stay integers while the result fits in `i64`; anything
/// else is computed in `f64`. A non-finite result is rejected.
pub fn checked_add(current: &Number, amount: &Number) -> Result<Number> {
    if let (Some(a), Some(b)) = (current.as_i64(), amount.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Ok(Number::from(sum));
        }
    }
    float_result(as_f64(current) + as_f64(amount))
}

/// `current - amount`, with the same integer/float rules as [`checked_add`].
pub fn checked_sub(current: &Number, amount: &Number) -> Result<Number> {
    if let (Some(a), Some(b)) = (current.as_i64(), amount.as_i64()) {
        if let Some(diff) = a.checked_sub(b) {
            return Ok(Number::from(diff));
        }
    }
    float_result(as_f64(current) - as_f64(amount))
}

fn as_f64(n: &Number) -> f64 {
    // as_f64 is only None for arbitrary-precision numbers, which we don't enable
    n.as_f64().unwrap_or(f64::NAN)
}

fn float_result(x: f64) -> Result<Number> {
    Number::from_f64(x)
        .ok_or_else(|| Error::invalid_value(format!("arithmetic result {} is not finite", x)))
}

/// Render a value for display.
///
/// Arrays and objects are pretty-printed with 4-space indentation; strings
/// are returned without quotes; other primitives use their JSON text.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => crate::document::to_pretty_json(value),
        other => other.to_string(),
    }
}
