//! Input validation for requests and payloads.

use crate::error::{AutosalesError, Result};
use crate::model::Intent;
use serde_json::{Map, Value};

/// Maximum allowed length for a project description.
pub const MAX_DESCRIPTION_LENGTH: usize = 20_000;

/// Maximum allowed length for a chatbot prompt.
pub const MAX_PROMPT_LENGTH: usize = 4_000;

/// Validates a project description.
pub fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(AutosalesError::Validation(
            "Description cannot be empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(AutosalesError::Validation(format!(
            "Description exceeds maximum length of {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// Validates a chatbot prompt.
pub fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(AutosalesError::Validation("Prompt cannot be empty".to_string()));
    }
    if prompt.len() > MAX_PROMPT_LENGTH {
        return Err(AutosalesError::Validation(format!(
            "Prompt exceeds maximum length of {} characters",
            MAX_PROMPT_LENGTH
        )));
    }
    Ok(())
}

/// A payload value counts as present unless it is null, blank, or an empty container.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(_) => true,
    }
}

/// Required fields of `intent` that are absent from `params`, in declaration order.
pub fn missing_fields(intent: Intent, params: &Map<String, Value>) -> Vec<&'static str> {
    intent
        .required_fields()
        .iter()
        .copied()
        .filter(|field| !is_present(params.get(*field)))
        .collect()
}
