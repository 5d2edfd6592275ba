use thiserror::Error;

/// Minimum topic length, in characters, after trimming.
pub const MIN_TOPIC_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a research topic")]
    Empty,
    #[error("Topic too short. Please be more specific.")]
    TooShort,
}

/// Trim `raw` and check it is usable as a research topic.
///
/// The empty check runs first; the length check counts characters of the
/// trimmed string, so exactly `MIN_TOPIC_CHARS` passes.
pub fn validate_topic(raw: &str) -> Result<&str, ValidationError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(ValidationError::Empty);
    }
    if topic.chars().count() < MIN_TOPIC_CHARS {
        return Err(ValidationError::TooShort);
    }
    Ok(topic)
}
