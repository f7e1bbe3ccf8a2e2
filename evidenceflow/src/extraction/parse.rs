//! Tolerant parsing of model responses.

use crate::core::CompanyInfo;
use crate::errors::ExtractionError;

/// Returns the span from the first `{` to the last `}`, inclusive.
///
/// Models often wrap the object in prose or code fences; everything outside
/// the span is ignored. Returns `None` when there is no such span.
#[must_use]
pub fn locate_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Parses a model response into a schema-conformant record.
pub fn parse_model_response(text: &str) -> Result<CompanyInfo, ExtractionError> {
    let span = locate_json_span(text).ok_or(ExtractionError::NoJsonObject)?;
    let value: serde_json::Value = serde_json::from_str(span)?;
    Ok(CompanyInfo::from_value(&value)?)
}
