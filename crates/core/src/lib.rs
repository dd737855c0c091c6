//! Core types for jsonkv
//!
//! This crate defines the foundational types used throughout the system:
//! - Document: the full JSON object persisted in the backing file
//! - Entry: one key/value pair of a Document
//! - ValueKind: dynamic kind of a stored value
//! - Error: error type hierarchy
//! - Value helpers: numeric arithmetic and display rendering

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod key;
pub mod value;

pub use document::{pretty_bytes, to_pretty_json, Document, Entry, INDENT};
pub use error::{Error, Result};
pub use key::validate_key;
pub use value::{checked_add, checked_sub, render_value, require_number, ValueKind};

/// Re-exported so callers don't need a direct serde_json dependency
pub use serde_json::{Map, Number, Value};
