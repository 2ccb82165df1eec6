use crate::error::{AutosalesError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The classified purpose of a free-text request.
///
/// Several tokens are aliases that share a handler (`initial_email` and
/// `generate_initial_emails`, for example); they are kept distinct so the
/// classified token can be echoed back to the caller unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RegisterProject,
    InitialEmail,
    GenerateInitialEmails,
    FollowupEmail,
    GenerateFollowupEmails,
    EmailRewriteRequest,
    GenerateFeedbackEmails,
    ImproveEmail,
    ConnectLeads,
    ListProjects,
    ListLeads,
    AddLead,
    AnalyzeEmail,
    #[default]
    Unknown,
}

/// Payload fields the rewrite family cannot work without.
pub const REWRITE_FIELDS: &[&str] = &["project_id", "lead_info", "original_email", "user_feedback"];

impl Intent {
    pub const ALL: [Intent; 14] = [
        Intent::RegisterProject,
        Intent::InitialEmail,
        Intent::GenerateInitialEmails,
        Intent::FollowupEmail,
        Intent::GenerateFollowupEmails,
        Intent::EmailRewriteRequest,
        Intent::GenerateFeedbackEmails,
        Intent::ImproveEmail,
        Intent::ConnectLeads,
        Intent::ListProjects,
        Intent::ListLeads,
        Intent::AddLead,
        Intent::AnalyzeEmail,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::RegisterProject => "register_project",
            Intent::InitialEmail => "initial_email",
            Intent::GenerateInitialEmails => "generate_initial_emails",
            Intent::FollowupEmail => "followup_email",
            Intent::GenerateFollowupEmails => "generate_followup_emails",
            Intent::EmailRewriteRequest => "email_rewrite_request",
            Intent::GenerateFeedbackEmails => "generate_feedback_emails",
            Intent::ImproveEmail => "improve_email",
            Intent::ConnectLeads => "connect_leads",
            Intent::ListProjects => "list_projects",
            Intent::ListLeads => "list_leads",
            Intent::AddLead => "add_lead",
            Intent::AnalyzeEmail => "analyze_email",
            Intent::Unknown => "unknown",
        }
    }

    /// Every intent a caller can actually reach.
    pub fn supported() -> impl Iterator<Item = Intent> {
        Self::ALL.into_iter().filter(|i| *i != Intent::Unknown)
    }

    /// Payload fields that must be present before the intent is dispatched.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Intent::RegisterProject => &["description"],
            Intent::InitialEmail | Intent::GenerateInitialEmails => &["project_id", "leads"],
            Intent::FollowupEmail | Intent::GenerateFollowupEmails => {
                &["project_id", "leads", "feedback"]
            }
            Intent::EmailRewriteRequest | Intent::GenerateFeedbackEmails | Intent::ImproveEmail => {
                REWRITE_FIELDS
            }
            Intent::AnalyzeEmail => &["original_email", "user_feedback"],
            Intent::ConnectLeads => &["project_id"],
            Intent::ListProjects | Intent::ListLeads | Intent::AddLead | Intent::Unknown => &[],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = AutosalesError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == token)
            .ok_or_else(|| AutosalesError::Parse(format!("Invalid intent: {}", s)))
    }
}
