use crate::error::{AutosalesError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Sentiment of a customer's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl ResponseType {
    /// Lenient conversion used when reading LLM output: anything unrecognized
    /// becomes `Neutral`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseType::Positive => write!(f, "positive"),
            ResponseType::Neutral => write!(f, "neutral"),
            ResponseType::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for ResponseType {
    type Err = AutosalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(ResponseType::Positive),
            "neutral" => Ok(ResponseType::Neutral),
            "negative" => Ok(ResponseType::Negative),
            _ => Err(AutosalesError::Parse(format!("Invalid response type: {}", s))),
        }
    }
}

/// Severity assigned by the issue analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = AutosalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" | "normal" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(AutosalesError::Parse(format!("Invalid priority: {}", s))),
        }
    }
}

/// Which kind of email a rewrite is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    #[default]
    Initial,
    Followup,
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailType::Initial => write!(f, "initial"),
            EmailType::Followup => write!(f, "followup"),
        }
    }
}

impl FromStr for EmailType {
    type Err = AutosalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "initial" => Ok(EmailType::Initial),
            "followup" | "follow-up" | "follow_up" => Ok(EmailType::Followup),
            _ => Err(AutosalesError::Parse(format!("Invalid email type: {}", s))),
        }
    }
}

/// Label returned by the rejection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionAction {
    Regenerate,
    Improve,
}

impl fmt::Display for RejectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionAction::Regenerate => write!(f, "regenerate"),
            RejectionAction::Improve => write!(f, "improve"),
        }
    }
}

/// Per-item status in generation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}
