//! Canned conversations used by call-site conveniences.

use super::error::RouterError;
use crate::domain::{GenerationRequest, RequestError};

/// System prompt for Telugu cinema content. Written in English so every
/// backend follows it reliably; the answer itself is asked for in Telugu.
pub const TELUGU_SYSTEM_PROMPT: &str = "You are a knowledgeable writer on Telugu cinema \
(Tollywood). Answer in fluent Telugu script, keep names of films and people accurate, \
mention release years where relevant, and never invent facts you are unsure of.";

/// Build the Telugu cinema request for `topic`.
pub fn telugu_request(topic: &str) -> Result<GenerationRequest, RouterError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(RequestError::Other("topic must not be empty".to_string()).into());
    }

    Ok(GenerationRequest::default()
        .system(TELUGU_SYSTEM_PROMPT)
        .user(format!(
            "ఈ అంశం గురించి తెలుగులో వివరంగా రాయండి: {topic}"
        )))
}
