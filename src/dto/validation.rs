//! Validation helpers for DTOs.

use validator::ValidationError;

const DISPLAY_NAME_MAX_LENGTH: usize = 50;

/// Validates that a display name is non-blank and reasonably short.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("display_name_blank");
        err.message = Some("Display name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > DISPLAY_NAME_MAX_LENGTH {
        let mut err = ValidationError::new("display_name_length");
        err.message = Some(
            format!("Display name must be at most {DISPLAY_NAME_MAX_LENGTH} characters").into(),
        );
        return Err(err);
    }

    Ok(())
}
