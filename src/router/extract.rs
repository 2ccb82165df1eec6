//! Deterministic parameter extraction and merging.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value, json};

use super::classify::FOLLOWUP_WORDS;
use crate::model::Intent;
use crate::validation;

static PROJECT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)프로젝트\s*(\d+)\s*번|(\d+)\s*번\s*프로젝트|project\s*#?\s*(\d+)")
        .expect("project id pattern is valid")
});

static LEAD_IDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:\d+\s*,\s*)*\d+)\s*번\s*(?:기업|리드|고객사)").expect("lead ids pattern is valid")
});

static LEAD_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*곳|(\d+)\s*leads?\b").expect("lead count pattern is valid")
});

static FEEDBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)피드백\s*[:：]\s*(.+)").expect("feedback pattern is valid"));

fn first_group(re: &Regex, text: &str) -> Option<String> {
    let captures = re.captures(text)?;
    captures
        .iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

/// Parameters that can be read off the prompt text without the LLM.
pub fn extract_params(prompt: &str) -> Map<String, Value> {
    let mut params = Map::new();

    if let Some(id) = first_group(&PROJECT_ID_RE, prompt).and_then(|s| s.parse::<i64>().ok()) {
        params.insert("project_id".to_string(), json!(id));
    }

    if let Some(list) = first_group(&LEAD_IDS_RE, prompt) {
        let ids: Vec<i64> = list
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        if !ids.is_empty() {
            params.insert("lead_ids".to_string(), json!(ids));
        }
    }

    if let Some(count) = first_group(&LEAD_COUNT_RE, prompt).and_then(|s| s.parse::<u64>().ok()) {
        params.insert("lead_count".to_string(), json!(count));
    }

    let lowered = prompt.to_lowercase();
    if FOLLOWUP_WORDS.iter().any(|w| lowered.contains(w)) {
        params.insert("email_type".to_string(), json!("followup"));
    }

    if let Some(feedback) = first_group(&FEEDBACK_RE, prompt) {
        let feedback = feedback.trim();
        if !feedback.is_empty() {
            params.insert("user_feedback".to_string(), json!(feedback));
        }
    }

    params
}

/// Later layers win; null values never overwrite.
pub fn merge_params(layers: &[&Map<String, Value>]) -> Map<String, Value> {
    let mut merged = Map::new();
    for layer in layers {
        for (key, value) in layer.iter() {
            if !value.is_null() {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

fn copy_if_missing(params: &mut Map<String, Value>, to: &str, from: &str) {
    if validation::is_present(params.get(to)) {
        return;
    }
    let Some(value) = params
        .get(from)
        .filter(|v| validation::is_present(Some(*v)))
        .cloned()
    else {
        return;
    };
    params.insert(to.to_string(), value);
}

/// Fills fields the intent needs from what the request already carries.
///
/// Feedback may arrive as `feedback` or `user_feedback` and either one
/// satisfies the other. A project registration without a description uses
/// the prompt itself.
pub fn fill_intent_params(intent: Intent, prompt: &str, params: &mut Map<String, Value>) {
    match intent {
        Intent::FollowupEmail | Intent::GenerateFollowupEmails => {
            copy_if_missing(params, "feedback", "user_feedback");
        }
        Intent::EmailRewriteRequest
        | Intent::GenerateFeedbackEmails
        | Intent::ImproveEmail
        | Intent::AnalyzeEmail => {
            copy_if_missing(params, "user_feedback", "feedback");
        }
        Intent::RegisterProject => {
            if !validation::is_present(params.get("description")) && !prompt.trim().is_empty() {
                params.insert("description".to_string(), json!(prompt.trim()));
            }
        }
        _ => {}
    }
}
