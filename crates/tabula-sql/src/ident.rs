//! The SQL identifier rule.
//!
//! A valid identifier is non-empty, starts with a letter or `_`, and
//! continues with letters, digits or `_`. Letters include non-ASCII
//! alphabetic characters.

use crate::error::{BuildError, Result};

/// Returns true iff `c` may appear in an identifier after the first position.
#[must_use]
pub fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Returns true iff `s` is a valid identifier.
#[must_use]
pub fn is_valid_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => chars.all(is_ident_char),
        _ => false,
    }
}

/// Returns `name` if it is a valid identifier.
///
/// # Errors
///
/// [`BuildError::InvalidIdentifier`] when `name` breaks the rule.
pub fn check_ident(name: &str) -> Result<&str> {
    if is_valid_ident(name) {
        Ok(name)
    } else {
        Err(BuildError::InvalidIdentifier(name.to_string()))
    }
}

/// Returns true iff `fields` is `*` or comma-separated valid identifiers.
#[must_use]
pub fn is_valid_field_list(fields: &str) -> bool {
    fields == "*" || fields.split(',').all(is_valid_ident)
}
