use axum::{
    Json,
    extract::{FromRequest, Request, State},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::AppState;
use crate::error::AutosalesError;
use crate::gateway::error_value;
use crate::generate::RejectionRequest;
use crate::model::EmailDraft;

#[derive(Debug, Deserialize)]
pub struct RegisterProjectRequest {
    pub project_id: i64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateEmailRequest {
    pub project_id: i64,
    pub leads: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeEmailRequest {
    pub email_content: EmailDraft,
    pub user_feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeFeedbackRequest {
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterLeadRequest {
    pub prompt: String,
}

fn error(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "error": message.into() }))
}

/// `Json` extractor whose rejection is answered with an `{error}` body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Json<Value>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::info!(status = %rejection.status(), "Rejected request body");
                Err(error(rejection.body_text()))
            }
        }
    }
}

/// Serializes a report, or an `{error}` body if that fails.
fn respond(value: impl serde::Serialize) -> Json<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Json(value),
        Err(e) => error(e.to_string()),
    }
}

/// POST /register_project/
pub async fn register_project(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterProjectRequest>,
) -> Json<Value> {
    match state.store.register(req.project_id, &req.description) {
        Ok(record) => Json(json!({
            "message": format!("Project {} registered", record.project_id),
            "project_id": record.project_id,
        })),
        Err(e) => error(e.to_string()),
    }
}

/// POST /generate_email/
pub async fn generate_email(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GenerateEmailRequest>,
) -> Json<Value> {
    // Without a data service the local store is the only source of context.
    if state.gateway.is_none() && !state.store.contains(req.project_id) {
        return error(format!(
            "Project {} is not registered. Call /register_project/ first.",
            req.project_id
        ));
    }

    match &req.leads {
        Value::Array(leads) => respond(state.generators.initial_emails(req.project_id, leads).await),
        lead @ Value::Object(_) => respond(
            state
                .generators
                .initial_email_report(req.project_id, lead)
                .await,
        ),
        _ => error("leads must be an object or an array"),
    }
}

/// POST /chatbot/
pub async fn chatbot(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Json<Value> {
    let payload = match req.payload {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(fields)) => fields,
        Some(_) => return error("payload must be a JSON object"),
    };
    Json(state.router.handle(&req.prompt, &payload).await)
}

/// POST /analyze_email_issues/
pub async fn analyze_email_issues(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnalyzeEmailRequest>,
) -> Json<Value> {
    let outcome = state
        .generators
        .analyze_issues(&req.email_content, &req.user_feedback)
        .await;
    Json(json!({
        "issues": outcome.value.issues,
        "suggestions": outcome.value.suggestions,
        "priority": outcome.value.priority,
        "recommended_action": outcome.value.recommended_action(),
        "status": outcome.status(),
    }))
}

/// POST /handle_email_rejection/
pub async fn handle_email_rejection(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RejectionRequest>,
) -> Json<Value> {
    respond(state.generators.handle_rejection(&req).await)
}

/// POST /summarize_feedback/
pub async fn summarize_feedback(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SummarizeFeedbackRequest>,
) -> Json<Value> {
    let outcome = state.generators.summarize_feedback(&req.feedback).await;
    Json(json!({
        "summary": outcome.value.summary,
        "response_type": outcome.value.response_type,
        "status": outcome.status(),
    }))
}

/// POST /register_lead/
pub async fn register_lead(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterLeadRequest>,
) -> Json<Value> {
    let outcome = state.generators.extract_lead(&req.prompt).await;
    if !outcome.value.is_complete() {
        return Json(json!({
            "error": "Could not extract company information from the prompt",
            "detail": outcome.error,
        }));
    }

    let Some(gateway) = &state.gateway else {
        let mut value = error_value(&AutosalesError::DataServiceUnavailable);
        value["lead"] = json!(outcome.value);
        return Json(value);
    };
    match gateway.create_lead(&outcome.value).await {
        Ok(created) => Json(json!({
            "type": "register_lead",
            "lead": outcome.value,
            "result": created,
        })),
        Err(e) => Json(error_value(&e)),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": state.router.classifier().to_string(),
        "data_service": state.gateway.is_some(),
        "projects": state.store.len(),
    }))
}
