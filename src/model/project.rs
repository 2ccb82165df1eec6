use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Industries the data service accepts for projects.
pub const INDUSTRIES: &[&str] = &[
    "AI", "금융", "마케팅", "헬스케어", "교육", "게임", "커머스", "자동차", "건설", "환경", "기타",
];

pub const OTHER_INDUSTRY: &str = "기타";

/// Maps a free-form industry label onto [`INDUSTRIES`].
pub fn normalize_industry(label: &str) -> String {
    let label = label.trim();
    INDUSTRIES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(label))
        .unwrap_or(&OTHER_INDUSTRY)
        .to_string()
}

/// Description registered for a project id in the local context store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub project_id: i64,
    pub description: String,
    pub registered: DateTime<Utc>,
}

impl ProjectRecord {
    pub fn new(project_id: i64, description: String) -> Self {
        Self {
            project_id,
            description,
            registered: Utc::now(),
        }
    }
}

/// Project fields extracted from a free-text business description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub description: String,
    pub industry: String,
}

impl ProjectInfo {
    /// Best effort without the LLM: first line as name, whole text as description.
    pub fn fallback(text: &str) -> Self {
        let name: String = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .chars()
            .take(40)
            .collect();
        Self {
            name,
            description: text.trim().to_string(),
            industry: OTHER_INDUSTRY.to_string(),
        }
    }
}

/// Lead fields extracted from a free-text company description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInfo {
    pub company_name: String,
    pub industry: String,
    pub contact_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

impl LeadInfo {
    pub fn is_complete(&self) -> bool {
        !self.company_name.trim().is_empty()
    }
}
