use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{DataService, NewEmail, NewFeedback};
use crate::config::DataServiceSettings;
use crate::error::{AutosalesError, Result};
use crate::model::{LeadInfo, ProjectInfo};

/// [`DataService`] over plain REST.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpDataService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| AutosalesError::Config(format!("Invalid data service URL: {}", e)))?;
        // Url::join drops the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http: crate::http::client(timeout)?,
        })
    }

    /// Returns `None` when no base URL is configured.
    pub fn from_settings(settings: &DataServiceSettings) -> Result<Option<Self>> {
        settings
            .base_url
            .as_deref()
            .map(|url| Self::new(url, Duration::from_secs(settings.timeout_secs)))
            .transpose()
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AutosalesError::Config(format!("Invalid data service path {}: {}", path, e)))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "Calling data service");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AutosalesError::DataService {
                status: status.as_u16(),
                message: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // Some endpoints answer with a bare string.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.send::<Value>(Method::GET, path, None).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<Value> {
        self.send(Method::POST, path, body).await
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn create_project(&self, project: &ProjectInfo) -> Result<Value> {
        tracing::info!(name = %project.name, industry = %project.industry, "Creating project");
        self.post("projects", Some(project)).await
    }

    async fn list_projects(&self) -> Result<Value> {
        self.get("projects").await
    }

    async fn get_project(&self, project_id: i64) -> Result<Value> {
        self.get(&format!("projects/{}", project_id)).await
    }

    async fn create_lead(&self, lead: &LeadInfo) -> Result<Value> {
        tracing::info!(company = %lead.company_name, "Creating lead");
        self.post("leads", Some(lead)).await
    }

    async fn list_leads(&self) -> Result<Value> {
        self.get("leads").await
    }

    async fn get_lead(&self, lead_id: i64) -> Result<Value> {
        self.get(&format!("leads/{}", lead_id)).await
    }

    async fn auto_connect_leads(&self, project_id: i64) -> Result<Value> {
        tracing::info!(project_id, "Auto-connecting leads");
        self.post::<Value>(&format!("projects/{}/auto-connect", project_id), None)
            .await
    }

    async fn save_email(&self, email: &NewEmail) -> Result<Value> {
        self.post("emails", Some(email)).await
    }

    async fn submit_feedback(&self, feedback: &NewFeedback) -> Result<Value> {
        self.post("feedbacks", Some(feedback)).await
    }
}
