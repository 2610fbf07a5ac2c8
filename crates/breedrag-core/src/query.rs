use crate::error::{Error, Result};

/// Rejects questions the pipeline cannot answer. Runs before any retrieval.
pub fn validate_question(question: &str) -> Result<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Question is required and must be a non-empty string".to_string()));
    }
    Ok(trimmed)
}
