//! Tolerant extraction of the JSON object embedded in a model reply.
//!
//! Replies are prose that is expected to contain one JSON object. The span
//! from the first `{` to the last `}` is taken as the payload. Swap
//! [`extract_json_object`] for a stricter strategy without touching callers
//! of [`parse_analysis_reply`].

use glean_core::entities::AnalysisFacets;

use crate::error::LlmError;

/// The span from the first `{` to the last `}` inclusive, if both exist in order.
#[must_use]
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Decode the four facets from a reply. Absent keys decode as empty strings.
///
/// # Errors
///
/// Returns `LlmError::MalformedResponse` if no brace pair is present or the
/// span is not an object whose facet values are strings.
pub fn parse_analysis_reply(reply: &str) -> Result<AnalysisFacets, LlmError> {
    let payload = extract_json_object(reply).ok_or_else(|| {
        LlmError::MalformedResponse("no JSON object found in reply".to_string())
    })?;
    serde_json::from_str(payload)
        .map_err(|e| LlmError::MalformedResponse(format!("invalid analysis JSON: {e}")))
}
