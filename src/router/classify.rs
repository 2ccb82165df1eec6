//! Keyword classification.
//!
//! Rules are checked in order against the lowercased prompt and the first
//! match wins.

use crate::model::Intent;

const REGISTER_WORDS: &[&str] = &["등록", "register"];
const BUSINESS_WORDS: &[&str] = &["사업"];
const LAUNCH_WORDS: &[&str] = &[
    "등록", "추가", "할거야", "시작", "신규", "추진", "개발", "런칭", "설립", "오픈",
];
const LEAD_WORDS: &[&str] = &["기업", "회사", "리드", "고객", "lead"];
const EMAIL_WORDS: &[&str] = &["메일", "email", "mail"];
const WRITE_WORDS: &[&str] = &[
    "작성", "보내", "써", "초안", "생성", "만들어", "write", "send", "draft", "generate",
];
const PROPOSAL_EMAIL: &str = "제안 메일";
pub(crate) const FOLLOWUP_WORDS: &[&str] = &["후속", "팔로업", "follow-up", "followup", "follow up"];
const REWRITE_WORDS: &[&str] = &[
    "다시", "재작성", "고쳐", "수정", "개선", "별로", "거부", "rewrite", "improve",
];
const ANALYZE_WORDS: &[&str] = &["분석", "품질", "진단", "analy"];
const CONNECT_WORDS: &[&str] = &["연결", "매칭", "connect"];
const MULTI_WORDS: &[&str] = &["다중", "여러"];
const LIST_WORDS: &[&str] = &["리스트", "목록", "보여", "전체", "list", "show"];
const PROJECT_WORDS: &[&str] = &["사업", "프로젝트", "project"];
const ADD_WORDS: &[&str] = &["추가", "add"];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

pub fn classify_keywords(prompt: &str) -> Intent {
    let text = prompt.to_lowercase();
    let has = |words: &[&str]| contains_any(&text, words);

    if (has(BUSINESS_WORDS) && has(LAUNCH_WORDS)) || (has(REGISTER_WORDS) && !has(LEAD_WORDS)) {
        return Intent::RegisterProject;
    }
    let asks_for_email =
        (has(EMAIL_WORDS) && has(WRITE_WORDS)) || text.contains(PROPOSAL_EMAIL);
    if asks_for_email && !has(FOLLOWUP_WORDS) && !has(REWRITE_WORDS) {
        if has(MULTI_WORDS) {
            return Intent::GenerateInitialEmails;
        }
        return Intent::InitialEmail;
    }
    if has(FOLLOWUP_WORDS) {
        return Intent::FollowupEmail;
    }
    if has(REWRITE_WORDS) {
        return Intent::EmailRewriteRequest;
    }
    if has(ANALYZE_WORDS) {
        return Intent::AnalyzeEmail;
    }
    if has(CONNECT_WORDS) {
        return Intent::ConnectLeads;
    }
    if has(MULTI_WORDS) && (has(EMAIL_WORDS) || has(LEAD_WORDS)) {
        return Intent::GenerateInitialEmails;
    }
    if has(LIST_WORDS) {
        if has(LEAD_WORDS) {
            return Intent::ListLeads;
        }
        if has(PROJECT_WORDS) {
            return Intent::ListProjects;
        }
    }
    if has(LEAD_WORDS) && (has(ADD_WORDS) || has(REGISTER_WORDS)) {
        return Intent::AddLead;
    }
    Intent::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register() {
        assert_eq!(
            classify_keywords("교육용 챗봇 플랫폼 사업 등록해줘"),
            Intent::RegisterProject
        );
        assert_eq!(classify_keywords("Register my project"), Intent::RegisterProject);
    }

    #[test]
    fn test_initial_email() {
        assert_eq!(
            classify_keywords("프로젝트 1번에 테크스타트업 3곳에 메일 보내줘"),
            Intent::InitialEmail
        );
        assert_eq!(classify_keywords("Write an EMAIL to them"), Intent::InitialEmail);
    }

    #[test]
    fn test_followup_beats_initial() {
        assert_eq!(classify_keywords("후속 메일 작성해줘"), Intent::FollowupEmail);
        assert_eq!(classify_keywords("send a follow-up email"), Intent::FollowupEmail);
    }

    #[test]
    fn test_register_wins_over_email() {
        assert_eq!(
            classify_keywords("사업 등록하고 메일도 보내줘"),
            Intent::RegisterProject
        );
    }

    #[test]
    fn test_secondary_rules() {
        assert_eq!(classify_keywords("이 메일 별로야, 다시 써줘"), Intent::EmailRewriteRequest);
        assert_eq!(classify_keywords("이메일 품질 분석해줘"), Intent::AnalyzeEmail);
        assert_eq!(classify_keywords("1번 프로젝트에 기업 자동 연결"), Intent::ConnectLeads);
        assert_eq!(classify_keywords("사업 리스트 보여줘"), Intent::ListProjects);
        assert_eq!(classify_keywords("기업 목록 보여줘"), Intent::ListLeads);
        assert_eq!(classify_keywords("새 기업 추가해줘"), Intent::AddLead);
        assert_eq!(classify_keywords("리드 등록"), Intent::AddLead);
    }

    #[test]
    fn test_sample_prompts() {
        let cases = [
            ("AI 마케팅 사업 시작할거야", Intent::RegisterProject),
            ("교육용 챗봇 플랫폼 개발 사업 등록해줘", Intent::RegisterProject),
            ("건설 프로젝트 신규 사업 추진", Intent::RegisterProject),
            (
                "삼성전자 기업 등록. 산업은 AI, 담당자 김민수, 이메일 minsu@samsung.com",
                Intent::AddLead,
            ),
            ("하나은행을 리드로 추가", Intent::AddLead),
            ("게임회사 넥슨 lead 등록", Intent::AddLead),
            ("1번 프로젝트에 2,3번 기업 자동 연결", Intent::ConnectLeads),
            ("메일 써줘", Intent::InitialEmail),
            ("제안 메일 부탁해", Intent::InitialEmail),
            ("메일 초안 좀", Intent::InitialEmail),
            ("후속 메일 작성", Intent::FollowupEmail),
            ("이메일 품질 분석해줘", Intent::AnalyzeEmail),
            ("메일 거부 처리해줘", Intent::EmailRewriteRequest),
            ("이 메일 별로야", Intent::EmailRewriteRequest),
            ("다중 기업에 메일 보내줘", Intent::GenerateInitialEmails),
            ("여러 리드 한번에", Intent::GenerateInitialEmails),
            ("사업 리스트 보여줘", Intent::ListProjects),
            ("기업 리스트 보여줘", Intent::ListLeads),
            ("고객 전체 목록", Intent::ListLeads),
        ];
        for (prompt, expected) in cases {
            assert_eq!(classify_keywords(prompt), expected, "{}", prompt);
        }
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_keywords("오늘 날씨 어때?"), Intent::Unknown);
        assert_eq!(classify_keywords(""), Intent::Unknown);
    }
}
