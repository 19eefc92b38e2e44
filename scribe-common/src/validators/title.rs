//! Chat title validation

/// Maximum length for chat titles in characters
pub const MAX_TITLE_LENGTH: usize = 120;

/// Validation error for chat titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    /// Title exceeds maximum length
    TooLong,
    /// Title contains newline characters
    ContainsNewlines,
}

/// Validate a chat title
///
/// Checks:
/// - Does not exceed maximum length (120 characters)
/// - Contains no newlines
///
/// Empty titles are allowed; callers substitute a default title when none
/// is provided.
///
/// # Errors
///
/// Returns a `TitleError` variant describing the validation failure.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(TitleError::TooLong);
    }
    if title.contains('\n') || title.contains('\r') {
        return Err(TitleError::ContainsNewlines);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_titles() {
        assert!(validate_title("Quarterly policy questions").is_ok());
        assert!(validate_title("").is_ok());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH)).is_ok());
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)),
            Err(TitleError::TooLong)
        );
    }

    #[test]
    fn test_newlines() {
        assert_eq!(
            validate_title("line one\nline two"),
            Err(TitleError::ContainsNewlines)
        );
        assert_eq!(
            validate_title("line one\rline two"),
            Err(TitleError::ContainsNewlines)
        );
    }
}
