//! LLM access: the completion capability and the completion text parser.
//!
//! Everything above this module talks to a [`CompletionClient`]: a list of
//! role-tagged [`Message`]s goes in, one completion string comes out. The
//! production implementation is [`OpenAiClient`]; tests substitute stubs.

mod openai;
pub mod parse;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use openai::OpenAiClient;
pub use parse::{extract_json, parse_completion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One request/response round trip against a text-completion model.
///
/// Implementations do not retry. Timeouts are applied by the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}
