use serde::Deserialize;
use serde_json::Value;

use super::batch::{
    BatchItem, BatchReport, EmailReport, FOLLOWUP_EMAIL, INITIAL_EMAIL, MULTIPLE_FOLLOWUP_EMAILS,
    MULTIPLE_INITIAL_EMAILS,
};
use super::{Generators, Outcome};
use crate::error::Result;
use crate::gateway::NewFeedback;
use crate::model::{EmailDraft, EmailType, FeedbackSummary, IssueAnalysis};
use crate::prompts;

/// Completion shape for every email generator. Missing keys become blank and
/// are then filled from the generator's fallback.
#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(default, deserialize_with = "super::null_as_default")]
    subject: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    body: String,
}

impl RawDraft {
    fn into_draft(self, fallback: EmailDraft) -> EmailDraft {
        EmailDraft::new(self.subject, self.body).or_fields_of(fallback)
    }
}

impl Generators {
    async fn try_initial_email(&self, project_id: i64, lead: &Value) -> Result<EmailDraft> {
        let context = self.context.describe(project_id).await;
        let raw: RawDraft = self
            .complete_json(prompts::initial_email(&context, lead))
            .await?;
        Ok(raw.into_draft(EmailDraft::initial_fallback()))
    }

    /// First-contact email for one lead. Successful drafts are saved upstream.
    pub async fn initial_email(&self, project_id: i64, lead: &Value) -> Outcome<EmailDraft> {
        let outcome = Outcome::from_result(
            self.try_initial_email(project_id, lead).await,
            "initial email",
            EmailDraft::initial_fallback,
        );
        if outcome.is_success() {
            self.persist_draft(project_id, lead, &outcome.value).await;
        }
        outcome
    }

    pub async fn initial_email_report(&self, project_id: i64, lead: &Value) -> EmailReport {
        let outcome = self.initial_email(project_id, lead).await;
        EmailReport {
            kind: INITIAL_EMAIL,
            project_id,
            item: BatchItem::from_outcome(lead.clone(), outcome),
        }
    }

    /// One draft per lead, in order. A failing lead yields its fallback draft
    /// and does not affect the others.
    pub async fn initial_emails(&self, project_id: i64, leads: &[Value]) -> BatchReport {
        let mut items = Vec::with_capacity(leads.len());
        for (i, lead) in leads.iter().enumerate() {
            tracing::debug!(project_id, lead_index = i + 1, "Generating initial email");
            let outcome = self.initial_email(project_id, lead).await;
            items.push(BatchItem::from_outcome(lead.clone(), outcome));
        }
        let report = BatchReport::new(MULTIPLE_INITIAL_EMAILS, project_id, items);
        tracing::info!(
            project_id,
            total = report.total_leads,
            failed = report.error_count,
            "Generated initial emails"
        );
        report
    }

    async fn try_followup_email(
        &self,
        project_id: i64,
        lead: &Value,
        summary: &FeedbackSummary,
    ) -> Result<EmailDraft> {
        let context = self.context.describe(project_id).await;
        let raw: RawDraft = self
            .complete_json(prompts::followup_email(&context, lead, summary))
            .await?;
        Ok(raw.into_draft(EmailDraft::followup_fallback()))
    }

    pub async fn followup_email(
        &self,
        project_id: i64,
        lead: &Value,
        summary: &FeedbackSummary,
    ) -> Outcome<EmailDraft> {
        let outcome = Outcome::from_result(
            self.try_followup_email(project_id, lead, summary).await,
            "followup email",
            EmailDraft::followup_fallback,
        );
        if outcome.is_success() {
            self.persist_draft(project_id, lead, &outcome.value).await;
        }
        outcome
    }

    /// Summarizes the customer's reply, then writes the follow-up from it.
    ///
    /// A lead carrying an integer `email_id` also has the reply recorded
    /// upstream against that email.
    pub async fn followup_for_lead(
        &self,
        project_id: i64,
        lead: &Value,
        feedback_text: &str,
    ) -> BatchItem {
        self.record_feedback(lead, feedback_text).await;
        let summary = self.summarize_feedback(feedback_text).await;
        let draft = self.followup_email(project_id, lead, &summary.value).await;
        BatchItem::from_outcome(lead.clone(), draft).with_summary(summary)
    }

    pub async fn followup_email_report(
        &self,
        project_id: i64,
        lead: &Value,
        feedback_text: &str,
    ) -> EmailReport {
        EmailReport {
            kind: FOLLOWUP_EMAIL,
            project_id,
            item: self.followup_for_lead(project_id, lead, feedback_text).await,
        }
    }

    /// A lead's own `feedback` string takes precedence over the shared one.
    pub async fn followup_emails(
        &self,
        project_id: i64,
        leads: &[Value],
        feedback_text: &str,
    ) -> BatchReport {
        let mut items = Vec::with_capacity(leads.len());
        for lead in leads {
            let feedback = lead
                .get("feedback")
                .and_then(Value::as_str)
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(feedback_text);
            items.push(self.followup_for_lead(project_id, lead, feedback).await);
        }
        let report = BatchReport::new(MULTIPLE_FOLLOWUP_EMAILS, project_id, items);
        tracing::info!(
            project_id,
            total = report.total_leads,
            failed = report.error_count,
            "Generated followup emails"
        );
        report
    }

    async fn record_feedback(&self, lead: &Value, feedback_text: &str) {
        let (Some(gateway), Some(email_id)) = (
            &self.gateway,
            lead.get("email_id").and_then(Value::as_i64),
        ) else {
            return;
        };
        let feedback = NewFeedback {
            email_id,
            feedback_text: feedback_text.to_string(),
        };
        if let Err(e) = gateway.submit_feedback(&feedback).await {
            tracing::warn!(email_id, error = %e, "Failed to record feedback");
        }
    }

    async fn try_rewrite_email(
        &self,
        project_id: i64,
        lead: &Value,
        original: &EmailDraft,
        user_feedback: &str,
        analysis: &IssueAnalysis,
        email_type: EmailType,
    ) -> Result<EmailDraft> {
        let context = self.context.describe(project_id).await;
        let messages = prompts::rewrite(&context, lead, original, user_feedback, analysis, email_type);
        let raw: RawDraft = self.complete_json(messages).await?;
        Ok(raw.into_draft(EmailDraft::rewrite_fallback()))
    }

    /// Produces a new draft from the original, the user's complaint and an
    /// issue analysis. The original is never modified.
    pub async fn rewrite_email(
        &self,
        project_id: i64,
        lead: &Value,
        original: &EmailDraft,
        user_feedback: &str,
        analysis: &IssueAnalysis,
        email_type: EmailType,
    ) -> Outcome<EmailDraft> {
        Outcome::from_result(
            self.try_rewrite_email(project_id, lead, original, user_feedback, analysis, email_type)
                .await,
            "email rewrite",
            EmailDraft::rewrite_fallback,
        )
    }
}
