use serde::Serialize;
use serde_json::Value;

use super::Outcome;
use crate::model::{EmailDraft, FeedbackSummary, Status};

pub const INITIAL_EMAIL: &str = "initial_email";
pub const FOLLOWUP_EMAIL: &str = "followup_email";
pub const MULTIPLE_INITIAL_EMAILS: &str = "multiple_initial_emails";
pub const MULTIPLE_FOLLOWUP_EMAILS: &str = "multiple_followup_emails";

/// The draft produced for one lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub lead: Value,
    pub email: EmailDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_summary: Option<FeedbackSummary>,
    pub status: Status,
    /// 1-based position in the submitted lead list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    pub fn from_outcome(lead: Value, outcome: Outcome<EmailDraft>) -> Self {
        Self {
            lead,
            status: outcome.status(),
            email: outcome.value,
            feedback_summary: None,
            lead_index: None,
            error: outcome.error,
        }
    }

    /// Attaches the feedback summary; a failed summary marks the item failed.
    pub fn with_summary(mut self, summary: Outcome<FeedbackSummary>) -> Self {
        if let Some(summary_error) = summary.error {
            self.status = Status::Error;
            self.error = Some(match self.error.take() {
                Some(email_error) => format!("{}; {}", summary_error, email_error),
                None => summary_error,
            });
        }
        self.feedback_summary = Some(summary.value);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// One draft per lead plus success and error counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub project_id: i64,
    pub total_leads: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub emails: Vec<BatchItem>,
}

impl BatchReport {
    pub fn new(kind: &'static str, project_id: i64, items: Vec<BatchItem>) -> Self {
        let emails: Vec<BatchItem> = items
            .into_iter()
            .enumerate()
            .map(|(i, mut item)| {
                item.lead_index = Some(i + 1);
                item
            })
            .collect();
        let success_count = emails.iter().filter(|item| item.is_success()).count();
        Self {
            kind,
            project_id,
            total_leads: emails.len(),
            success_count,
            error_count: emails.len() - success_count,
            emails,
        }
    }
}

/// Response for a single-lead request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailReport {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub project_id: i64,
    #[serde(flatten)]
    pub item: BatchItem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutosalesError;
    use serde_json::json;

    fn item(ok: bool) -> BatchItem {
        let result = if ok {
            Ok(EmailDraft::new("S", "B"))
        } else {
            Err(AutosalesError::NoJson)
        };
        BatchItem::from_outcome(
            json!({"id": 1}),
            Outcome::from_result(result, "initial email", EmailDraft::initial_fallback),
        )
    }

    #[test]
    fn test_report_counts_and_indices() {
        let report = BatchReport::new(MULTIPLE_INITIAL_EMAILS, 1, vec![item(true), item(false), item(true)]);
        assert_eq!(report.total_leads, 3);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.emails[1].lead_index, Some(2));
        assert_eq!(report.emails[1].email, EmailDraft::initial_fallback());
    }

    #[test]
    fn test_report_serializes_type_tag() {
        let value = serde_json::to_value(BatchReport::new(MULTIPLE_FOLLOWUP_EMAILS, 4, vec![item(true)])).unwrap();
        assert_eq!(value["type"], "multiple_followup_emails");
        assert_eq!(value["emails"][0]["status"], "success");
        assert_eq!(value["emails"][0]["lead_index"], 1);
        assert!(value["emails"][0].get("error").is_none());
    }

    #[test]
    fn test_failed_summary_fails_item() {
        let summary = Outcome::from_result(
            Err(AutosalesError::NoJson),
            "feedback summary",
            FeedbackSummary::fallback,
        );
        let item = item(true).with_summary(summary);
        assert_eq!(item.status, Status::Error);
        assert_eq!(item.feedback_summary, Some(FeedbackSummary::fallback()));
        assert!(item.error.is_some());
    }

    #[test]
    fn test_single_report_flattens_item() {
        let report = EmailReport {
            kind: INITIAL_EMAIL,
            project_id: 2,
            item: item(true),
        };
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["type"], "initial_email");
        assert_eq!(value["email"]["subject"], "S");
        assert!(value.get("lead_index").is_none());
    }
}
