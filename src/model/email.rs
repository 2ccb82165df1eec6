use super::types::{Priority, RejectionAction, ResponseType};
use serde::{Deserialize, Serialize};

/// A generated `{subject, body}` pair. Never mutated in place; a rewrite
/// produces a new draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn initial_fallback() -> Self {
        Self::new(
            "제안드립니다",
            "안녕하세요, 고객님의 상황을 고려한 제안을 드리고자 연락드립니다...",
        )
    }

    pub fn followup_fallback() -> Self {
        Self::new("개선된 제안", "피드백을 반영하여 메일을 개선했습니다.")
    }

    pub fn rewrite_fallback() -> Self {
        Self::new("개선된 제안", "사용자 피드백을 반영하여 이메일을 개선했습니다.")
    }

    /// Fills blank fields from `fallback` so both fields are always populated.
    pub fn or_fields_of(self, fallback: EmailDraft) -> Self {
        let subject = if self.subject.trim().is_empty() {
            fallback.subject
        } else {
            self.subject
        };
        let body = if self.body.trim().is_empty() {
            fallback.body
        } else {
            self.body
        };
        Self { subject, body }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub summary: String,
    pub response_type: ResponseType,
}

impl FeedbackSummary {
    pub fn fallback() -> Self {
        Self {
            summary: "요약 실패".to_string(),
            response_type: ResponseType::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueAnalysis {
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub priority: Priority,
}

impl IssueAnalysis {
    pub fn fallback() -> Self {
        Self {
            issues: vec!["분석 중 오류가 발생했습니다".to_string()],
            suggestions: vec!["이메일을 다시 작성해주세요".to_string()],
            priority: Priority::Medium,
        }
    }

    /// Serious problems get a full rewrite, minor ones an improvement.
    pub fn recommended_action(&self) -> RejectionAction {
        if self.priority == Priority::High || self.issues.len() > 2 {
            RejectionAction::Regenerate
        } else {
            RejectionAction::Improve
        }
    }
}
