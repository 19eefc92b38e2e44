//! Chat message content validation

/// Maximum length for a chat message in bytes
pub const MAX_MESSAGE_LENGTH: usize = 65536;

/// Validation error for chat message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Message exceeds maximum length
    TooLong,
}

/// Validate chat message content
///
/// Checks:
/// - Does not exceed maximum length (64 KiB)
///
/// Empty messages are allowed; the model can legitimately produce an empty
/// response and the transcript renderer handles it.
///
/// # Errors
///
/// Returns a `MessageError` variant describing the validation failure.
pub fn validate_message(content: &str) -> Result<(), MessageError> {
    if content.len() > MAX_MESSAGE_LENGTH {
        return Err(MessageError::TooLong);
    }
    Ok(())
}
