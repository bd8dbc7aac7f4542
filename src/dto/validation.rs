//! Validation helpers for DTOs.

use time::{PrimitiveDateTime, macros::format_description};
use validator::ValidationError;

/// Validates a display color written as `#rrggbb`.
///
/// # Examples
///
/// ```ignore
/// validate_hex_color("#1a2b3c") // Ok
/// validate_hex_color("1a2b3c")  // Err - missing '#'
/// validate_hex_color("#1a2b3")  // Err - too short
/// ```
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let Some(digits) = color.strip_prefix('#') else {
        let mut err = ValidationError::new("color_prefix");
        err.message = Some("Color must start with '#'".into());
        return Err(err);
    };

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color_format");
        err.message = Some(format!("Color must be '#' followed by 6 hex digits (got `{color}`)").into());
        return Err(err);
    }

    Ok(())
}

/// Validates a scheduled tee time written as `YYYY-MM-DDTHH:MM`.
pub fn validate_start_time(value: &str) -> Result<(), ValidationError> {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(value, format).map(|_| ()).map_err(|err| {
        let mut error = ValidationError::new("start_time_format");
        error.message = Some(format!("Start time must be YYYY-MM-DDTHH:MM ({err})").into());
        error
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_hex_color_valid() {
        assert!(validate_hex_color("#1a2b3c").is_ok());
        assert!(validate_hex_color("#FFFFFF").is_ok());
    }

    #[test]
    fn test_validate_hex_color_invalid() {
        assert!(validate_hex_color("1a2b3c").is_err()); // no prefix
        assert!(validate_hex_color("#1a2b3").is_err()); // too short
        assert!(validate_hex_color("#1a2b3c4").is_err()); // too long
        assert!(validate_hex_color("#1a2b3g").is_err()); // invalid hex
    }

    #[test]
    fn test_validate_start_time() {
        assert!(validate_start_time("2026-09-25T08:30").is_ok());
        assert!(validate_start_time("2026-09-25 08:30").is_err());
        assert!(validate_start_time("2026-13-25T08:30").is_err());
        assert!(validate_start_time("08:30").is_err());
    }
}
