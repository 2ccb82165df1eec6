use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::IntentRouter;
use crate::error::{AutosalesError, Result};
use crate::gateway::DataService;
use crate::generate::RejectionRequest;
use crate::model::{EmailDraft, Intent};
use crate::validation;

fn int_param(params: &Map<String, Value>, key: &str) -> Result<i64> {
    let invalid = || AutosalesError::Validation(format!("{} must be an integer", key));
    match params.get(key) {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn optional_int_param(params: &Map<String, Value>, key: &str) -> Result<Option<i64>> {
    if validation::is_present(params.get(key)) {
        int_param(params, key).map(Some)
    } else {
        Ok(None)
    }
}

fn str_param<'a>(params: &'a Map<String, Value>, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AutosalesError::Validation(format!("{} must be a string", key)))
}

fn typed_param<T: DeserializeOwned>(params: &Map<String, Value>, key: &str) -> Result<T> {
    let value = params.get(key).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| AutosalesError::Validation(format!("{} is malformed: {}", key, e)))
}

/// Non-empty integer list under `lead_ids`.
pub(super) fn lead_id_list(params: &Map<String, Value>) -> Option<Vec<i64>> {
    let ids: Vec<i64> = params
        .get("lead_ids")?
        .as_array()?
        .iter()
        .filter_map(Value::as_i64)
        .collect();
    (!ids.is_empty()).then_some(ids)
}

/// Inserts a `type` tag into a serialized report.
fn tagged(kind: &str, report: impl serde::Serialize) -> Result<Value> {
    let mut value = serde_json::to_value(report)?;
    if let Some(fields) = value.as_object_mut() {
        fields.insert("type".to_string(), json!(kind));
    }
    Ok(value)
}

impl IntentRouter {
    fn gateway(&self) -> Result<&Arc<dyn DataService>> {
        self.gateway
            .as_ref()
            .ok_or(AutosalesError::DataServiceUnavailable)
    }

    pub(super) async fn execute(
        &self,
        intent: Intent,
        params: &mut Map<String, Value>,
    ) -> Result<Value> {
        self.resolve_leads(intent, params).await?;
        self.dispatch(intent, params).await
    }

    /// Narrows or fetches the leads an email request works on.
    ///
    /// `lead_ids` picks leads out of the payload array by their `id`. With no
    /// leads in the payload the ids are fetched from the data service instead.
    /// Without ids, `lead_count` caps how many leads of the array are used.
    async fn resolve_leads(
        &self,
        intent: Intent,
        params: &mut Map<String, Value>,
    ) -> Result<()> {
        if !intent.required_fields().contains(&"leads") {
            return Ok(());
        }
        let ids = lead_id_list(params);

        if !validation::is_present(params.get("leads")) {
            if let (Some(ids), Some(gateway)) = (ids, &self.gateway) {
                let mut leads = Vec::with_capacity(ids.len());
                for id in ids {
                    leads.push(gateway.get_lead(id).await?);
                }
                tracing::debug!(count = leads.len(), "Fetched leads by id");
                params.insert("leads".to_string(), Value::Array(leads));
            }
            return Ok(());
        }

        let count = params
            .get("lead_count")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0);
        if let Some(Value::Array(leads)) = params.get_mut("leads") {
            if let Some(ids) = ids {
                leads.retain(|lead| {
                    lead.get("id")
                        .and_then(Value::as_i64)
                        .is_some_and(|id| ids.contains(&id))
                });
                if leads.is_empty() {
                    return Err(AutosalesError::Validation(
                        "None of the leads match lead_ids".to_string(),
                    ));
                }
            } else if let Some(count) = count {
                leads.truncate(count);
            }
        }
        Ok(())
    }

    async fn dispatch(&self, intent: Intent, params: &Map<String, Value>) -> Result<Value> {
        match intent {
            Intent::RegisterProject => self.register_project(params).await,
            Intent::InitialEmail | Intent::GenerateInitialEmails => self.initial_emails(params).await,
            Intent::FollowupEmail | Intent::GenerateFollowupEmails => {
                self.followup_emails(params).await
            }
            Intent::EmailRewriteRequest | Intent::GenerateFeedbackEmails | Intent::ImproveEmail => {
                self.rewrite_email(params).await
            }
            Intent::AnalyzeEmail => self.analyze_email(params).await,
            Intent::ConnectLeads => {
                let project_id = int_param(params, "project_id")?;
                let result = self.gateway()?.auto_connect_leads(project_id).await?;
                Ok(json!({"type": "connect_leads", "project_id": project_id, "result": result}))
            }
            Intent::ListProjects => self.list_projects().await,
            Intent::ListLeads => {
                let leads = self.gateway()?.list_leads().await?;
                Ok(json!({"type": "list_leads", "leads": leads}))
            }
            Intent::AddLead => Ok(json!({
                "type": "add_lead",
                "status": "not_implemented",
                "message": "Adding leads through chat is not implemented yet. Use /register_lead/ instead.",
            })),
            Intent::Unknown => Ok(super::unknown_intent()),
        }
    }

    async fn register_project(&self, params: &Map<String, Value>) -> Result<Value> {
        let description = str_param(params, "description")?;
        validation::validate_description(description)?;
        let requested_id = optional_int_param(params, "project_id")?;
        if self.gateway.is_none() && requested_id.is_none() {
            return Err(AutosalesError::Validation(
                "project_id is required when no data service is configured".to_string(),
            ));
        }

        let extracted = self.generators.extract_project(description).await;
        let mut response = json!({
            "type": "register_project",
            "project": extracted.value,
            "status": extracted.status(),
        });

        let project_id = match &self.gateway {
            Some(gateway) => {
                let created = gateway.create_project(&extracted.value).await?;
                let created_id = created.get("id").and_then(Value::as_i64);
                response["backend"] = created;
                requested_id.or(created_id)
            }
            None => requested_id,
        };

        match project_id {
            Some(id) => {
                self.store.register(id, description)?;
                response["project_id"] = json!(id);
                response["message"] = json!(format!("Project {} registered", id));
            }
            None => {
                response["message"] = json!("Project created without an id; context not cached");
            }
        }
        Ok(response)
    }

    async fn initial_emails(&self, params: &Map<String, Value>) -> Result<Value> {
        let project_id = int_param(params, "project_id")?;
        match params.get("leads") {
            Some(Value::Array(leads)) => Ok(serde_json::to_value(
                self.generators.initial_emails(project_id, leads).await,
            )?),
            Some(lead @ Value::Object(_)) => Ok(serde_json::to_value(
                self.generators.initial_email_report(project_id, lead).await,
            )?),
            _ => Err(AutosalesError::Validation(
                "leads must be an object or an array".to_string(),
            )),
        }
    }

    async fn followup_emails(&self, params: &Map<String, Value>) -> Result<Value> {
        let project_id = int_param(params, "project_id")?;
        let feedback = str_param(params, "feedback")?;
        match params.get("leads") {
            Some(Value::Array(leads)) => Ok(serde_json::to_value(
                self.generators
                    .followup_emails(project_id, leads, feedback)
                    .await,
            )?),
            Some(lead @ Value::Object(_)) => Ok(serde_json::to_value(
                self.generators
                    .followup_email_report(project_id, lead, feedback)
                    .await,
            )?),
            _ => Err(AutosalesError::Validation(
                "leads must be an object or an array".to_string(),
            )),
        }
    }

    async fn rewrite_email(&self, params: &Map<String, Value>) -> Result<Value> {
        let request = RejectionRequest {
            project_id: int_param(params, "project_id")?,
            lead_info: params.get("lead_info").cloned().unwrap_or(Value::Null),
            original_email: typed_param(params, "original_email")?,
            user_feedback: str_param(params, "user_feedback")?.to_string(),
            email_type: match params.get("email_type") {
                Some(Value::String(s)) => s.parse()?,
                _ => Default::default(),
            },
        };
        let report = self.generators.handle_rejection(&request).await;
        tagged("email_rewrite", report)
    }

    async fn analyze_email(&self, params: &Map<String, Value>) -> Result<Value> {
        let email: EmailDraft = typed_param(params, "original_email")?;
        let feedback = str_param(params, "user_feedback")?;
        let analysis = self.generators.analyze_issues(&email, feedback).await;
        let mut response = json!({
            "type": "analyze_email",
            "status": analysis.status(),
            "recommended_action": analysis.value.recommended_action(),
            "analysis": analysis.value,
        });
        if let Some(error) = analysis.error {
            response["error"] = json!(error);
        }
        Ok(response)
    }

    async fn list_projects(&self) -> Result<Value> {
        match &self.gateway {
            Some(gateway) => Ok(json!({
                "type": "list_projects",
                "source": "data_service",
                "projects": gateway.list_projects().await?,
            })),
            None => Ok(json!({
                "type": "list_projects",
                "source": "local",
                "projects": self.store.list(),
            })),
        }
    }
}
