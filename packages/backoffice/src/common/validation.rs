//! Field checks shared by the create/update inputs of every content kind.

use super::{ModerationError, ModerationResult};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_BODY_LEN: usize = 10_000;

/// Trimmed, non-empty text of at most `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> ModerationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModerationError::validation(format!("{field} is required")));
    }
    check_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Optional text: blank becomes `None`, anything else is length-checked.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> ModerationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_len(field, trimmed, max)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn check_len(field: &str, value: &str, max: usize) -> ModerationResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(ModerationError::validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}
