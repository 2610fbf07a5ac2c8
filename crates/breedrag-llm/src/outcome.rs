use thiserror::Error;

use breedrag_core::error::Error;

/// Appended to every degraded answer so callers can tell it from a real one.
pub const DEGRADED_NOTE: &str =
    "Note: LLM server is currently unavailable. This is a simple context-based response.";

pub const APOLOGY: &str =
    "I apologize, but I am currently unable to process your request. The LLM service is unavailable.";

/// Why the backend could not be reached at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailability {
    Timeout,
    Unreachable,
}

/// Backend was reached (or the request could not be formed) and the call still failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response from LLM server: no choices")]
    EmptyChoices,
    #[error("Invalid response from LLM server: {0}")]
    InvalidResponse(String),
    #[error("request failed: {0}")]
    Transport(String),
}

impl From<GenerationFailure> for Error {
    fn from(failure: GenerationFailure) -> Self { Error::Generation(failure.to_string()) }
}

/// Every way one generation call can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Answer(String),
    Degraded { reason: Unavailability, text: String },
    Failed(GenerationFailure),
}

impl GenerationOutcome {
    /// Answers and degraded answers are both text for the caller; only
    /// `Failed` becomes an error.
    pub fn into_result(self) -> Result<String, Error> {
        match self {
            GenerationOutcome::Answer(text) | GenerationOutcome::Degraded { text, .. } => Ok(text),
            GenerationOutcome::Failed(failure) => Err(failure.into()),
        }
    }

    pub fn is_degraded(&self) -> bool { matches!(self, GenerationOutcome::Degraded { .. }) }
}

/// Deterministic stand-in answer used while the backend is unavailable.
pub fn fallback_response(context: &str, excerpt_chars: usize) -> String {
    if context.is_empty() {
        return APOLOGY.to_string();
    }
    let excerpt: String = context.chars().take(excerpt_chars).collect();
    format!("Based on the available dog breed information: {excerpt}... \n\n{DEGRADED_NOTE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_quotes_a_bounded_excerpt() {
        let context = "x".repeat(1000);
        let text = fallback_response(&context, 300);
        assert!(text.contains(&"x".repeat(300)));
        assert!(!text.contains(&"x".repeat(301)));
        assert!(text.ends_with(DEGRADED_NOTE));
    }

    #[test]
    fn fallback_counts_characters_not_bytes() {
        let text = fallback_response("éééé", 2);
        assert!(text.starts_with("Based on the available dog breed information: éé... "));
    }

    #[test]
    fn fallback_without_context_apologizes() {
        assert_eq!(fallback_response("", 300), APOLOGY);
    }

    #[test]
    fn failed_outcome_maps_to_generation_error() {
        let err = GenerationOutcome::Failed(GenerationFailure::EmptyChoices).into_result().unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
        let ok = GenerationOutcome::Degraded { reason: Unavailability::Timeout, text: "t".into() }.into_result();
        assert_eq!(ok.unwrap(), "t");
    }
}
