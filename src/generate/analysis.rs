use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Generators, Outcome};
use crate::error::Result;
use crate::model::{EmailDraft, EmailType, IssueAnalysis, Priority, RejectionAction, Status};
use crate::prompts;

const REGENERATED_MESSAGE: &str = "문제점이 심각하여 이메일을 새로 작성했습니다.";
const IMPROVED_MESSAGE: &str = "기존 이메일을 개선했습니다.";

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default, deserialize_with = "super::null_as_default")]
    issues: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    suggestions: Vec<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    priority: String,
}

/// A user's rejection of a generated email.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectionRequest {
    pub project_id: i64,
    pub lead_info: Value,
    pub original_email: EmailDraft,
    pub user_feedback: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email_type: EmailType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionReport {
    pub status: Status,
    pub action: RejectionAction,
    pub new_email: EmailDraft,
    pub analysis: IssueAnalysis,
    pub improvements: Vec<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Generators {
    async fn try_analyze_issues(&self, email: &EmailDraft, user_feedback: &str) -> Result<IssueAnalysis> {
        let raw: RawAnalysis = self
            .complete_json(prompts::issue_analysis(email, user_feedback))
            .await?;
        Ok(IssueAnalysis {
            issues: raw.issues,
            suggestions: raw.suggestions,
            priority: Priority::from_label(&raw.priority),
        })
    }

    /// Lists what is wrong with an email given the user's complaint.
    pub async fn analyze_issues(&self, email: &EmailDraft, user_feedback: &str) -> Outcome<IssueAnalysis> {
        Outcome::from_result(
            self.try_analyze_issues(email, user_feedback).await,
            "issue analysis",
            IssueAnalysis::fallback,
        )
    }

    /// Analyzes a rejected email once, picks regenerate or improve from the
    /// analysis, and rewrites the email with that same analysis.
    pub async fn handle_rejection(&self, request: &RejectionRequest) -> RejectionReport {
        let analysis = self
            .analyze_issues(&request.original_email, &request.user_feedback)
            .await;
        let action = analysis.value.recommended_action();
        tracing::info!(
            project_id = request.project_id,
            %action,
            priority = %analysis.value.priority,
            issues = analysis.value.issues.len(),
            "Handling email rejection"
        );

        let rewritten = self
            .rewrite_email(
                request.project_id,
                &request.lead_info,
                &request.original_email,
                &request.user_feedback,
                &analysis.value,
                request.email_type,
            )
            .await;

        let errors: Vec<String> = [analysis.error.clone(), rewritten.error.clone()]
            .into_iter()
            .flatten()
            .collect();
        let message = match action {
            RejectionAction::Regenerate => REGENERATED_MESSAGE,
            RejectionAction::Improve => IMPROVED_MESSAGE,
        };

        RejectionReport {
            status: if errors.is_empty() {
                Status::Success
            } else {
                Status::Error
            },
            action,
            new_email: rewritten.value,
            improvements: analysis.value.suggestions.clone(),
            analysis: analysis.value,
            message: message.to_string(),
            error: (!errors.is_empty()).then(|| errors.join("; ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::generate::testing::StubCompletion;
    use crate::storage::ContextStore;

    fn generators(llm: Arc<StubCompletion>) -> Generators {
        Generators::new(llm, Arc::new(ContextStore::new()), None, Duration::from_secs(1))
    }

    fn request() -> RejectionRequest {
        RejectionRequest {
            project_id: 1,
            lead_info: json!({"name": "넥슨"}),
            original_email: EmailDraft::new("안녕하세요", "긴 본문"),
            user_feedback: "너무 길어요".to_string(),
            email_type: EmailType::Initial,
        }
    }

    #[tokio::test]
    async fn test_analysis_parses_priority() {
        let llm = Arc::new(StubCompletion::fixed(
            r#"{"issues":["제목이 일반적임"],"suggestions":["구체화"],"priority":"HIGH"}"#,
        ));
        let outcome = generators(llm)
            .analyze_issues(&EmailDraft::new("S", "B"), "별로")
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.value.priority, Priority::High);
        assert_eq!(outcome.value.issues, vec!["제목이 일반적임"]);
    }

    #[tokio::test]
    async fn test_analysis_null_priority_keeps_issues() {
        let llm = Arc::new(StubCompletion::fixed(
            r#"{"issues":["a"],"suggestions":["b"],"priority":null}"#,
        ));
        let outcome = generators(llm)
            .analyze_issues(&EmailDraft::new("S", "B"), "별로")
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.value.issues, vec!["a"]);
        assert_eq!(outcome.value.suggestions, vec!["b"]);
        assert_eq!(outcome.value.priority, Priority::Medium);
    }

    #[tokio::test]
    async fn test_analysis_failure_returns_fallback() {
        let llm = Arc::new(StubCompletion::failing());
        let outcome = generators(llm)
            .analyze_issues(&EmailDraft::new("S", "B"), "별로")
            .await;
        assert_eq!(outcome.value, IssueAnalysis::fallback());
    }

    #[tokio::test]
    async fn test_minor_issues_improve() {
        let llm = Arc::new(StubCompletion::scripted(&[
            r#"{"issues":["길다"],"suggestions":["줄이기"],"priority":"low"}"#,
            r#"{"subject":"짧은 제목","body":"짧은 본문"}"#,
        ]));
        let report = generators(llm.clone()).handle_rejection(&request()).await;

        assert_eq!(report.status, Status::Success);
        assert_eq!(report.action, RejectionAction::Improve);
        assert_eq!(report.message, IMPROVED_MESSAGE);
        assert_eq!(report.new_email, EmailDraft::new("짧은 제목", "짧은 본문"));
        assert_eq!(report.improvements, vec!["줄이기"]);
        // The analysis is computed once and fed into the rewrite.
        assert_eq!(llm.call_count(), 2);
        assert!(llm.user_prompts()[1].contains("길다"));
    }

    #[tokio::test]
    async fn test_serious_issues_regenerate() {
        let llm = Arc::new(StubCompletion::scripted(&[
            r#"{"issues":["a","b","c"],"suggestions":[],"priority":"medium"}"#,
            r#"{"subject":"새 제목","body":"새 본문"}"#,
        ]));
        let report = generators(llm).handle_rejection(&request()).await;

        assert_eq!(report.action, RejectionAction::Regenerate);
        assert_eq!(report.message, REGENERATED_MESSAGE);
    }

    #[tokio::test]
    async fn test_failures_still_produce_email() {
        let llm = Arc::new(StubCompletion::failing());
        let report = generators(llm).handle_rejection(&request()).await;

        assert_eq!(report.status, Status::Error);
        assert_eq!(report.analysis, IssueAnalysis::fallback());
        assert_eq!(report.action, RejectionAction::Improve);
        assert_eq!(report.new_email, EmailDraft::rewrite_fallback());
        assert!(report.error.is_some());
    }

    #[test]
    fn test_request_email_type_defaults_to_initial() {
        let request: RejectionRequest = serde_json::from_value(json!({
            "project_id": 1,
            "lead_info": {},
            "original_email": {"subject": "S", "body": "B"},
            "user_feedback": "별로"
        }))
        .unwrap();
        assert_eq!(request.email_type, EmailType::Initial);
    }
}
