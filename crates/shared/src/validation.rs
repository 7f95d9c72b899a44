//! Common validation utilities.

use validator::ValidationError;

/// Longest platform tag accepted from callers.
const MAX_PLATFORM_LENGTH: usize = 32;

/// Validates that a string contains something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a platform tag (e.g. `android`, `ios`, `all`).
///
/// Tags are short and limited to ASCII letters, digits, `-` and `_`.
pub fn validate_platform(platform: &str) -> Result<(), ValidationError> {
    let valid = !platform.is_empty()
        && platform.len() <= MAX_PLATFORM_LENGTH
        && platform
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("platform_format");
        err.message = Some(
            "Platform must be 1-32 characters of letters, digits, '-' or '_'".into(),
        );
        Err(err)
    }
}
