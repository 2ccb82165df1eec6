//! Backend gateway: REST calls against the external data service.
//!
//! The data service is the system of record for projects, leads, emails and
//! feedback. Every operation is one bounded attempt; failures come back as
//! `Err` and callers turn them into explicit error values with
//! [`error_value`] instead of aborting the request.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{AutosalesError, Result};
use crate::model::{LeadInfo, ProjectInfo};

pub use http::HttpDataService;

/// Body of `POST /emails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmail {
    pub project_id: i64,
    pub lead_id: i64,
    pub subject: String,
    pub body: String,
}

/// Body of `POST /feedbacks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub email_id: i64,
    pub feedback_text: String,
}

#[async_trait]
pub trait DataService: Send + Sync {
    async fn create_project(&self, project: &ProjectInfo) -> Result<Value>;
    async fn list_projects(&self) -> Result<Value>;
    async fn get_project(&self, project_id: i64) -> Result<Value>;
    async fn create_lead(&self, lead: &LeadInfo) -> Result<Value>;
    async fn list_leads(&self) -> Result<Value>;
    async fn get_lead(&self, lead_id: i64) -> Result<Value>;
    async fn auto_connect_leads(&self, project_id: i64) -> Result<Value>;
    async fn save_email(&self, email: &NewEmail) -> Result<Value>;
    async fn submit_feedback(&self, feedback: &NewFeedback) -> Result<Value>;
}

/// Converts a gateway failure into the error value returned to callers.
pub fn error_value(err: &AutosalesError) -> Value {
    match err {
        AutosalesError::DataService { status, message } => json!({
            "status": "error",
            "error": format!("Data service returned {}", status),
            "detail": message,
        }),
        other => json!({
            "status": "error",
            "error": other.to_string(),
        }),
    }
}

/// Reads a non-empty `description` out of a project record.
pub fn project_description(project: &Value) -> Option<String> {
    project
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
