use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Generators, Outcome};
use crate::error::Result;
use crate::model::Intent;
use crate::prompts;

/// Intent and parameters proposed by the classification call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LlmClassification {
    pub intent: Intent,
    pub params: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(default, deserialize_with = "super::null_as_default")]
    intent: String,
    #[serde(default, alias = "extracted_params")]
    params: Option<Map<String, Value>>,
}

impl Generators {
    async fn try_classify_intent(&self, prompt: &str) -> Result<LlmClassification> {
        let raw: RawClassification = self
            .complete_json(prompts::intent_classification(prompt))
            .await?;
        let intent: Intent = raw.intent.parse()?;
        tracing::debug!(%intent, "LLM classified prompt");
        Ok(LlmClassification {
            intent,
            params: raw.params.unwrap_or_default(),
        })
    }

    /// Any failure, including a token outside the intent set, yields
    /// `unknown` with no params.
    pub async fn classify_intent(&self, prompt: &str) -> Outcome<LlmClassification> {
        Outcome::from_result(
            self.try_classify_intent(prompt).await,
            "intent classification",
            LlmClassification::default,
        )
    }
}
