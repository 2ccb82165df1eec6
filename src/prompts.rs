//! Message builders for every generation task.
//!
//! Each function is a pure function of its inputs. System instructions are
//! fixed; the user message carries the request-specific data.

use serde_json::Value;

use crate::llm::Message;
use crate::model::{EmailDraft, EmailType, FeedbackSummary, INDUSTRIES, Intent, IssueAnalysis};

const EMAIL_ELEMENTS: &str = "\
이메일에는 다음 요소를 포함해:
- 고객 상황 언급
- 우리 사업/서비스의 핵심 가치 제안
- 기대 효과 2~3가지
- 회신 유도 문구";

const FOLLOWUP_ELEMENTS: &str = "\
후속 이메일에는 다음 요소를 포함해:
- 이전 제안에 대한 추가 정보
- 고객의 우려사항 해결
- 구체적인 다음 단계 제시";

const INITIAL_EMAIL_SYSTEM: &str = "\
너는 B2B 세일즈 이메일 작성을 전문으로 하는 AI야.
다음 JSON 형식으로만 응답해. 설명은 포함하지 마.
{
  \"subject\": \"이메일 제목\",
  \"body\": \"이메일 본문 내용\"
}";

const FOLLOWUP_EMAIL_SYSTEM: &str = "\
너는 B2B 후속 이메일 작성 전문가야. 고객 피드백을 기반으로 다음 JSON 형식으로만 응답해.
{
  \"subject\": \"후속 메일 제목\",
  \"body\": \"본문 내용\"
}";

const FEEDBACK_SUMMARY_SYSTEM: &str = "\
너는 B2B 고객 피드백 분석 전문가야.
고객 응답을 1~2문장으로 요약하고, 긍정적/중립적/부정적 응답인지 분류해.
반드시 아래 JSON 형식으로만 응답해. 그 외 문장은 절대 포함하지 마.
{
  \"summary\": \"가격이 부담스럽다는 응답\",
  \"response_type\": \"negative\"
}
response_type은 반드시 positive, neutral, negative 중 하나여야 해.";

const ISSUE_ANALYSIS_SYSTEM: &str = "\
너는 B2B 이메일 품질 분석 전문가야.
사용자의 피드백을 바탕으로 이메일의 문제점을 분석하고 개선 방안을 제시해.
반드시 아래 JSON 형식으로만 응답해. 그 외 문장은 절대 포함하지 마.
{
  \"issues\": [\"제목이 너무 일반적임\", \"본문이 너무 길어서 읽기 어려움\"],
  \"suggestions\": [\"더 구체적인 제목으로 변경\", \"본문을 2-3문단으로 축약\"],
  \"priority\": \"high\"
}
priority 값은 high, medium, low 중 하나여야 해.";

const REWRITE_INITIAL_SYSTEM: &str = "\
너는 B2B 세일즈 이메일 재작성 전문가야.
사용자의 피드백을 바탕으로 이메일을 개선해.
다음 JSON 형식으로만 응답해. 설명은 포함하지 마.
{
  \"subject\": \"개선된 이메일 제목\",
  \"body\": \"개선된 이메일 본문\"
}";

const REWRITE_FOLLOWUP_SYSTEM: &str = "\
너는 B2B 세일즈 후속 이메일 재작성 전문가야.
사용자의 피드백을 바탕으로 후속 이메일을 개선해.
다음 JSON 형식으로만 응답해. 설명은 포함하지 마.
{
  \"subject\": \"개선된 후속 이메일 제목\",
  \"body\": \"개선된 후속 이메일 본문\"
}";

const LEAD_EXTRACTION_SYSTEM: &str = "\
사용자의 프롬프트에서 기업 정보(companyName, industry, contactEmail, contactName)를 추출해 JSON 형식으로 응답해.
절대 설명하지 말고 JSON만 반환해. 예시:
{\"companyName\":\"삼성전자\", \"industry\":\"AI\", \"contactEmail\":\"kim@ss.com\", \"contactName\":\"김영수\"}";

pub fn initial_email(context: &str, lead: &Value) -> Vec<Message> {
    vec![
        Message::system(format!("{}\n\n{}", INITIAL_EMAIL_SYSTEM, EMAIL_ELEMENTS)),
        Message::user(format!(
            "사업 설명: {}\n고객 정보: {}\n위 조건을 기반으로 이메일 초안을 JSON 형식으로 작성해줘.",
            context, lead
        )),
    ]
}

pub fn followup_email(context: &str, lead: &Value, feedback: &FeedbackSummary) -> Vec<Message> {
    vec![
        Message::system(format!("{}\n\n{}", FOLLOWUP_EMAIL_SYSTEM, FOLLOWUP_ELEMENTS)),
        Message::user(format!(
            "사업 설명: {}\n고객 정보: {}\n피드백 요약: {}\n응답 유형: {}",
            context, lead, feedback.summary, feedback.response_type
        )),
    ]
}

pub fn feedback_summary(feedback_text: &str) -> Vec<Message> {
    vec![
        Message::system(FEEDBACK_SUMMARY_SYSTEM),
        Message::user(format!("고객 응답: {}", feedback_text)),
    ]
}

pub fn issue_analysis(email: &EmailDraft, user_feedback: &str) -> Vec<Message> {
    vec![
        Message::system(ISSUE_ANALYSIS_SYSTEM),
        Message::user(format!(
            "이메일 내용:\n제목: {}\n본문: {}\n\n사용자 피드백: {}\n\n위 내용을 바탕으로 이메일의 문제점을 분석해줘.",
            email.subject, email.body, user_feedback
        )),
    ]
}

pub fn rewrite(
    context: &str,
    lead: &Value,
    original: &EmailDraft,
    user_feedback: &str,
    analysis: &IssueAnalysis,
    email_type: EmailType,
) -> Vec<Message> {
    let system = match email_type {
        EmailType::Initial => format!("{}\n\n{}", REWRITE_INITIAL_SYSTEM, EMAIL_ELEMENTS),
        EmailType::Followup => format!("{}\n\n{}", REWRITE_FOLLOWUP_SYSTEM, FOLLOWUP_ELEMENTS),
    };
    vec![
        Message::system(system),
        Message::user(format!(
            "사업 설명: {}\n고객 정보: {}\n원본 이메일:\n제목: {}\n본문: {}\n사용자 피드백: {}\n분석된 문제점: {}\n개선 제안: {}\n\n위 정보를 바탕으로 개선된 이메일을 작성해줘.",
            context,
            lead,
            original.subject,
            original.body,
            user_feedback,
            analysis.issues.join(", "),
            analysis.suggestions.join(", ")
        )),
    ]
}

pub fn intent_classification(prompt: &str) -> Vec<Message> {
    let intents: Vec<&str> = Intent::ALL.iter().map(Intent::as_str).collect();
    let system = format!(
        "\
아래 사용자 요청의 의도(intent)를 분류하고 필요한 정보를 추출해 아래 JSON만 반환해. 설명 없이 JSON만.
{{
  \"intent\": \"{}\",
  \"params\": {{ \"project_id\": 1, \"email_type\": \"initial\", \"user_feedback\": \"...\" }}
}}
intent는 위 목록 중 정확히 하나여야 하고, 해당하지 않으면 unknown으로 답해.
params에는 요청에서 확실히 알 수 있는 값만 넣어.
예시:
\"교육용 챗봇 플랫폼 사업 등록해줘\" → register_project
\"프로젝트 1번에 테크스타트업 3곳에 메일 보내줘\" → initial_email
\"후속 메일 작성\" → followup_email
\"이 메일 별로야, 다시 써줘\" → email_rewrite_request
\"이메일 품질 분석해줘\" → analyze_email
\"1번 프로젝트에 기업 자동 연결\" → connect_leads
\"사업 리스트 보여줘\" → list_projects
\"기업 리스트 보여줘\" → list_leads",
        intents.join("|")
    );
    vec![Message::system(system), Message::user(prompt)]
}

pub fn project_extraction(text: &str) -> Vec<Message> {
    let system = format!(
        "\
사용자의 프롬프트에서 사업 정보(name, description, industry)를 추출해 JSON 형식으로 응답해.

요구사항:
- description은 사용자가 입력한 내용을 요약하되 전체 내용을 포함해서 정제해줘.
- industry는 아래 리스트 중 하나로만 선택해: [{}]

반드시 JSON만 반환하며, 추가 설명을 붙이지 말 것.
예시:
{{\"name\":\"AI 마케팅\", \"description\":\"AI 기반 마케팅 자동화 솔루션.\\n목표는 매출 20% 증가\", \"industry\":\"마케팅\"}}",
        quoted_industries()
    );
    vec![Message::system(system), Message::user(text)]
}

pub fn lead_extraction(text: &str) -> Vec<Message> {
    let system = format!(
        "{}\nindustry는 아래 리스트 중 하나로만 골라라: [{}]",
        LEAD_EXTRACTION_SYSTEM,
        quoted_industries()
    );
    vec![Message::system(system), Message::user(text)]
}

fn quoted_industries() -> String {
    INDUSTRIES
        .iter()
        .map(|i| format!("\"{}\"", i))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use crate::model::Priority;
    use serde_json::json;

    #[test]
    fn test_initial_email_embeds_context_and_lead() {
        let messages = initial_email("AI CRM", &json!({"id": 1, "name": "넥슨"}));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("\"subject\""));
        assert!(messages[1].content.contains("AI CRM"));
        assert!(messages[1].content.contains("넥슨"));
    }

    #[test]
    fn test_rewrite_system_depends_on_email_type() {
        let analysis = IssueAnalysis {
            issues: vec!["too long".to_string()],
            suggestions: vec!["shorten".to_string()],
            priority: Priority::Low,
        };
        let original = EmailDraft::new("S", "B");
        let initial = rewrite("ctx", &json!({}), &original, "fb", &analysis, EmailType::Initial);
        let followup = rewrite("ctx", &json!({}), &original, "fb", &analysis, EmailType::Followup);

        assert_ne!(initial[0].content, followup[0].content);
        assert!(followup[0].content.contains("후속"));
        assert!(initial[1].content.contains("too long"));
        assert!(initial[1].content.contains("shorten"));
    }

    #[test]
    fn test_classification_lists_every_intent() {
        let messages = intent_classification("메일 써줘");
        for intent in Intent::ALL {
            assert!(messages[0].content.contains(intent.as_str()));
        }
        assert_eq!(messages[1].content, "메일 써줘");
    }

    #[test]
    fn test_project_extraction_lists_industries() {
        let messages = project_extraction("AI 마케팅 사업");
        assert!(messages[0].content.contains("\"헬스케어\""));
    }
}
