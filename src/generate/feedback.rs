use serde::Deserialize;

use super::{Generators, Outcome};
use crate::error::Result;
use crate::model::{FeedbackSummary, ResponseType};
use crate::prompts;

#[derive(Debug, Deserialize)]
struct RawSummary {
    #[serde(default, deserialize_with = "super::null_as_default")]
    summary: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    response_type: String,
}

impl Generators {
    async fn try_summarize_feedback(&self, feedback_text: &str) -> Result<FeedbackSummary> {
        let raw: RawSummary = self
            .complete_json(prompts::feedback_summary(feedback_text))
            .await?;
        let summary = if raw.summary.trim().is_empty() {
            FeedbackSummary::fallback().summary
        } else {
            raw.summary
        };
        Ok(FeedbackSummary {
            summary,
            response_type: ResponseType::from_label(&raw.response_type),
        })
    }

    /// One or two sentence summary of a customer reply plus its sentiment.
    pub async fn summarize_feedback(&self, feedback_text: &str) -> Outcome<FeedbackSummary> {
        Outcome::from_result(
            self.try_summarize_feedback(feedback_text).await,
            "feedback summary",
            FeedbackSummary::fallback,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::generate::testing::StubCompletion;
    use crate::storage::ContextStore;

    fn generators(llm: Arc<StubCompletion>) -> Generators {
        Generators::new(llm, Arc::new(ContextStore::new()), None, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_summary_parsed_from_prose() {
        let llm = Arc::new(StubCompletion::fixed(
            "요약입니다:\n```json\n{\"summary\": \"가격이 부담됨\", \"response_type\": \"negative\"}\n```",
        ));
        let outcome = generators(llm).summarize_feedback("너무 비싸요").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.value.summary, "가격이 부담됨");
        assert_eq!(outcome.value.response_type, ResponseType::Negative);
    }

    #[tokio::test]
    async fn test_unrecognized_label_is_neutral() {
        let llm = Arc::new(StubCompletion::fixed(
            r#"{"summary":"부재중","response_type":"out-of-office"}"#,
        ));
        let outcome = generators(llm).summarize_feedback("부재중입니다").await;
        assert_eq!(outcome.value.response_type, ResponseType::Neutral);
    }

    #[tokio::test]
    async fn test_null_response_type_is_neutral() {
        let llm = Arc::new(StubCompletion::fixed(r#"{"summary":"검토 중","response_type":null}"#));
        let outcome = generators(llm).summarize_feedback("검토해볼게요").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.value.summary, "검토 중");
        assert_eq!(outcome.value.response_type, ResponseType::Neutral);
    }

    #[tokio::test]
    async fn test_summary_is_stable_for_same_input() {
        let llm = Arc::new(StubCompletion::fixed(
            r#"{"summary":"관심 있음","response_type":"positive"}"#,
        ));
        let generators = generators(llm.clone());
        let first = generators.summarize_feedback("관심 있어요").await;
        let second = generators.summarize_feedback("관심 있어요").await;

        assert_eq!(first, second);
        assert_eq!(llm.call_count(), 2);
        assert_eq!(llm.user_prompts()[0], llm.user_prompts()[1]);
    }

    #[tokio::test]
    async fn test_failure_returns_fallback() {
        let llm = Arc::new(StubCompletion::fixed("알 수 없음"));
        let outcome = generators(llm).summarize_feedback("...").await;
        assert_eq!(outcome.value, FeedbackSummary::fallback());
        assert!(outcome.error.is_some());
    }
}
