use serde::Deserialize;

use super::{Generators, Outcome};
use crate::error::{AutosalesError, Result};
use crate::model::{LeadInfo, ProjectInfo, normalize_industry};
use crate::prompts;

#[derive(Debug, Deserialize)]
struct RawProject {
    #[serde(default, deserialize_with = "super::null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    industry: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLead {
    #[serde(default, deserialize_with = "super::null_as_default")]
    company_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    industry: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    contact_email: String,
    #[serde(default)]
    contact_name: Option<String>,
}

impl Generators {
    async fn try_extract_project(&self, text: &str) -> Result<ProjectInfo> {
        let raw: RawProject = self.complete_json(prompts::project_extraction(text)).await?;
        if raw.name.trim().is_empty() {
            return Err(AutosalesError::Validation(
                "Extracted project has no name".to_string(),
            ));
        }
        let description = if raw.description.trim().is_empty() {
            text.trim().to_string()
        } else {
            raw.description
        };
        Ok(ProjectInfo {
            name: raw.name.trim().to_string(),
            description,
            industry: normalize_industry(&raw.industry),
        })
    }

    /// Name, description and industry from a free-text business description.
    pub async fn extract_project(&self, text: &str) -> Outcome<ProjectInfo> {
        Outcome::from_result(self.try_extract_project(text).await, "project extraction", || {
            ProjectInfo::fallback(text)
        })
    }

    async fn try_extract_lead(&self, text: &str) -> Result<LeadInfo> {
        let raw: RawLead = self.complete_json(prompts::lead_extraction(text)).await?;
        let lead = LeadInfo {
            company_name: raw.company_name.trim().to_string(),
            industry: normalize_industry(&raw.industry),
            contact_email: raw.contact_email.trim().to_string(),
            contact_name: raw.contact_name.filter(|n| !n.trim().is_empty()),
        };
        if !lead.is_complete() {
            return Err(AutosalesError::Validation(
                "Extracted lead has no company name".to_string(),
            ));
        }
        Ok(lead)
    }

    /// Company fields from a free-text lead description. The fallback has an
    /// empty company name.
    pub async fn extract_lead(&self, text: &str) -> Outcome<LeadInfo> {
        Outcome::from_result(
            self.try_extract_lead(text).await,
            "lead extraction",
            LeadInfo::default,
        )
    }
}
