//! Intent routing for free-text requests.
//!
//! A request goes through these stages:
//!
//! 1. classification ([`ClassifierMode::Keyword`] rules, or an LLM call with
//!    the keyword rules as a second opinion when the LLM says `unknown`)
//! 2. parameter merge: LLM proposals, then values read off the prompt by
//!    [`extract_params`], then the caller's payload
//! 3. intent-specific filling: feedback aliases, and the prompt as the
//!    description of a project registration
//! 4. the rewrite guard: a rewrite request without its fields is treated as
//!    a plain initial email request
//! 5. required-field validation, which stops the request before any
//!    generator or data service call
//! 6. lead selection by `lead_ids` or `lead_count`
//! 7. dispatch on the intent
//!
//! Every outcome, including failures, is returned as a JSON value.

mod classify;
mod dispatch;
mod extract;

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::Instrument;

use crate::config::ClassifierMode;
use crate::gateway::{DataService, error_value};
use crate::generate::Generators;
use crate::model::{Intent, REWRITE_FIELDS};
use crate::storage::ContextStore;
use crate::validation;

pub use classify::classify_keywords;
pub use extract::{extract_params, fill_intent_params, merge_params};

/// Intent plus the merged parameters it will be dispatched with.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRequest {
    pub intent: Intent,
    pub params: Map<String, Value>,
}

pub struct IntentRouter {
    generators: Arc<Generators>,
    store: Arc<ContextStore>,
    gateway: Option<Arc<dyn DataService>>,
    classifier: ClassifierMode,
}

impl IntentRouter {
    pub fn new(
        generators: Arc<Generators>,
        store: Arc<ContextStore>,
        gateway: Option<Arc<dyn DataService>>,
        classifier: ClassifierMode,
    ) -> Self {
        Self {
            generators,
            store,
            gateway,
            classifier,
        }
    }

    pub fn classifier(&self) -> ClassifierMode {
        self.classifier
    }

    /// Classifies a prompt and returns the intent with LLM-proposed params.
    pub async fn classify(&self, prompt: &str) -> (Intent, Map<String, Value>) {
        match self.classifier {
            ClassifierMode::Keyword => (classify_keywords(prompt), Map::new()),
            ClassifierMode::Llm => {
                let classification = self.generators.classify_intent(prompt).await.value;
                if classification.intent == Intent::Unknown {
                    let second = classify_keywords(prompt);
                    tracing::debug!(intent = %second, "Keyword second opinion");
                    (second, classification.params)
                } else {
                    (classification.intent, classification.params)
                }
            }
        }
    }

    /// Classification, merge and the rewrite guard, without dispatching.
    pub async fn route(&self, prompt: &str, payload: &Map<String, Value>) -> RoutedRequest {
        let (mut intent, llm_params) = self.classify(prompt).await;
        let mut params = merge_params(&[&llm_params, &extract_params(prompt), payload]);
        fill_intent_params(intent, prompt, &mut params);

        if intent == Intent::EmailRewriteRequest
            && REWRITE_FIELDS
                .iter()
                .any(|field| !validation::is_present(params.get(*field)))
        {
            tracing::info!("Rewrite request without rewrite fields, treating as initial email");
            intent = Intent::InitialEmail;
        }

        RoutedRequest { intent, params }
    }

    /// Handles one free-text request end to end.
    pub async fn handle(&self, prompt: &str, payload: &Map<String, Value>) -> Value {
        let request_id = nanoid::nanoid!(10);
        let span = tracing::info_span!("chatbot", %request_id);
        self.handle_inner(prompt, payload).instrument(span).await
    }

    async fn handle_inner(&self, prompt: &str, payload: &Map<String, Value>) -> Value {
        if let Err(e) = validation::validate_prompt(prompt) {
            return json!({ "error": e.to_string() });
        }

        let RoutedRequest { intent, mut params } = self.route(prompt, payload).await;
        tracing::info!(%intent, "Routing request");

        if intent == Intent::Unknown {
            return unknown_intent();
        }

        let mut missing = validation::missing_fields(intent, &params);
        if self.gateway.is_some() && dispatch::lead_id_list(&params).is_some() {
            // Fetched from the data service before dispatch.
            missing.retain(|field| *field != "leads");
        }
        if !missing.is_empty() {
            tracing::info!(%intent, ?missing, "Rejected request with missing fields");
            return json!({
                "error": format!(
                    "Missing required fields for {}: {}",
                    intent,
                    missing.join(", ")
                ),
                "intent": intent,
                "missing_fields": missing,
            });
        }

        self.execute(intent, &mut params).await.unwrap_or_else(|e| {
            tracing::warn!(%intent, error = %e, "Request failed");
            let mut value = error_value(&e);
            if let Some(fields) = value.as_object_mut() {
                fields.insert("intent".to_string(), json!(intent));
            }
            value
        })
    }
}

fn unknown_intent() -> Value {
    let supported: Vec<&str> = Intent::supported().map(|i| i.as_str()).collect();
    json!({
        "error": format!(
            "Could not determine what to do with this request. Supported intents: {}",
            supported.join(", ")
        ),
        "intent": Intent::Unknown,
        "supported_intents": supported,
    })
}
