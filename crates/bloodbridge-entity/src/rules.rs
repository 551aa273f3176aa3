//! Field rules shared by the form types.

use std::borrow::Cow;

use validator::ValidationError;

/// Notice for any missing required field.
pub const REQUIRED_FIELDS: &str = "Please fill all required fields";

/// Reject text that is empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed(REQUIRED_FIELDS)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_blank() {
        assert!(not_blank("  \t").is_err());
        assert!(not_blank(" Mirpur ").is_ok());
    }
}
