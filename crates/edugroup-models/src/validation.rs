//! Field validators shared by the request DTOs.

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Names and titles need at least two visible characters.
pub fn min_two_chars_trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        let mut error = ValidationError::new("too_short");
        error.message = Some("must be at least 2 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Trims an optional free-text field, mapping blank input to an empty string.
pub fn trimmed_or_empty(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}
