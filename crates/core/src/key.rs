//! Key validation

use crate::error::{Error, Result};

/// Validate a user-supplied key.
///
/// Any non-empty string is a valid key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_key("key must not be empty"));
    }
    Ok(())
}
