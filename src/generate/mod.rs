//! LLM-backed generators.
//!
//! Every generator follows the same path: resolve business context, build
//! messages, call the completion client under a timeout, pull JSON out of the
//! completion, and map it onto a typed result. Each one has an internal
//! `try_*` form that returns [`Result`] and a public form that returns an
//! [`Outcome`]: the value on success, or the generator's fixed fallback plus
//! the error text on any failure. Nothing here ever returns an error to the
//! caller.

mod analysis;
mod batch;
mod classify;
mod context;
mod email;
mod extract;
mod feedback;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AutosalesError, Result};
use crate::gateway::{DataService, NewEmail};
use crate::llm::{CompletionClient, Message, parse_completion};
use crate::model::{EmailDraft, Status};
use crate::storage::ContextStore;

pub use analysis::{RejectionReport, RejectionRequest};
pub use batch::{BatchItem, BatchReport, EmailReport};
pub use classify::LlmClassification;
pub use context::{ContextResolver, NO_CONTEXT_PLACEHOLDER};

/// Reads an explicit `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A generator result that is always usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    /// The single adapter between internal results and the fallback contract.
    pub fn from_result(result: Result<T>, task: &str, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => {
                tracing::warn!(task, error = %e, "Generation failed, using fallback");
                Self {
                    value: fallback(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn status(&self) -> Status {
        if self.is_success() {
            Status::Success
        } else {
            Status::Error
        }
    }
}

pub struct Generators {
    llm: Arc<dyn CompletionClient>,
    context: ContextResolver,
    gateway: Option<Arc<dyn DataService>>,
    timeout: Duration,
}

impl Generators {
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        store: Arc<ContextStore>,
        gateway: Option<Arc<dyn DataService>>,
        timeout: Duration,
    ) -> Self {
        Self {
            llm,
            context: ContextResolver::new(store, gateway.clone()),
            gateway,
            timeout,
        }
    }

    pub fn context(&self) -> &ContextResolver {
        &self.context
    }

    /// One bounded completion call followed by JSON extraction.
    async fn complete_json<T: DeserializeOwned>(&self, messages: Vec<Message>) -> Result<T> {
        let text = tokio::time::timeout(self.timeout, self.llm.complete(&messages))
            .await
            .map_err(|_| AutosalesError::Timeout(self.timeout))??;
        tracing::debug!(chars = text.len(), "Received completion");
        parse_completion(&text)
    }

    /// Stores a generated draft upstream when the lead has an id. Failures
    /// are logged only; the draft is returned to the caller regardless.
    async fn persist_draft(&self, project_id: i64, lead: &Value, draft: &EmailDraft) {
        let Some(gateway) = &self.gateway else {
            return;
        };
        let Some(lead_id) = lead.get("id").and_then(Value::as_i64) else {
            return;
        };
        let email = NewEmail {
            project_id,
            lead_id,
            subject: draft.subject.clone(),
            body: draft.body.clone(),
        };
        if let Err(e) = gateway.save_email(&email).await {
            tracing::warn!(project_id, lead_id, error = %e, "Failed to save email draft");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub collaborators shared by generator and router tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::error::{AutosalesError, Result};
    use crate::gateway::{DataService, NewEmail, NewFeedback};
    use crate::llm::{CompletionClient, Message};
    use crate::model::{LeadInfo, ProjectInfo};

    type Responder = Box<dyn Fn(usize, &[Message]) -> Result<String> + Send + Sync>;

    /// Completion stub that records every call.
    pub struct StubCompletion {
        responder: Responder,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl StubCompletion {
        /// Answers every call with `text`.
        pub fn fixed(text: &str) -> Self {
            let text = text.to_string();
            Self::with(move |_, _| Ok(text.clone()))
        }

        /// Fails every call.
        pub fn failing() -> Self {
            Self::with(|_, _| Err(AutosalesError::Completion("stub failure".to_string())))
        }

        /// Answers calls in order; calls past the end fail.
        pub fn scripted(responses: &[&str]) -> Self {
            let queue: Mutex<VecDeque<String>> =
                Mutex::new(responses.iter().map(|r| r.to_string()).collect());
            Self::with(move |_, _| {
                queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .ok_or_else(|| AutosalesError::Completion("script exhausted".to_string()))
            })
        }

        /// Full control: the closure receives the zero-based call index.
        pub fn with<F>(responder: F) -> Self
        where
            F: Fn(usize, &[Message]) -> Result<String> + Send + Sync + 'static,
        {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// System message of every call, in order.
        pub fn system_prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|messages| {
                    messages
                        .first()
                        .map(|m| m.content.clone())
                        .unwrap_or_default()
                })
                .collect()
        }

        pub fn user_prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|messages| {
                    messages
                        .last()
                        .map(|m| m.content.clone())
                        .unwrap_or_default()
                })
                .collect()
        }
    }

    #[async_trait]
    impl CompletionClient for StubCompletion {
        async fn complete(&self, messages: &[Message]) -> Result<String> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(messages.to_vec());
                calls.len() - 1
            };
            (self.responder)(index, messages)
        }
    }

    /// Data service stub with canned projects and a call counter.
    #[derive(Default)]
    pub struct StubDataService {
        pub calls: AtomicUsize,
        pub saved_emails: Mutex<Vec<NewEmail>>,
        pub feedbacks: Mutex<Vec<NewFeedback>>,
        pub created_projects: Mutex<Vec<ProjectInfo>>,
        pub fail: bool,
    }

    impl StubDataService {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AutosalesError::DataService {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DataService for StubDataService {
        async fn create_project(&self, project: &ProjectInfo) -> Result<Value> {
            self.hit()?;
            self.created_projects.lock().unwrap().push(project.clone());
            Ok(json!({"id": 42, "name": project.name, "description": project.description}))
        }

        async fn list_projects(&self) -> Result<Value> {
            self.hit()?;
            Ok(json!([{"id": 1, "name": "AI CRM"}]))
        }

        async fn get_project(&self, project_id: i64) -> Result<Value> {
            self.hit()?;
            Ok(json!({"id": project_id, "description": format!("remote project {}", project_id)}))
        }

        async fn create_lead(&self, lead: &LeadInfo) -> Result<Value> {
            self.hit()?;
            Ok(json!({"id": 7, "companyName": lead.company_name}))
        }

        async fn list_leads(&self) -> Result<Value> {
            self.hit()?;
            Ok(json!([{"id": 1, "companyName": "넥슨"}]))
        }

        async fn get_lead(&self, lead_id: i64) -> Result<Value> {
            self.hit()?;
            Ok(json!({"id": lead_id}))
        }

        async fn auto_connect_leads(&self, project_id: i64) -> Result<Value> {
            self.hit()?;
            Ok(json!({"projectId": project_id, "connected": 3}))
        }

        async fn save_email(&self, email: &NewEmail) -> Result<Value> {
            self.hit()?;
            self.saved_emails.lock().unwrap().push(email.clone());
            Ok(json!({"id": 100}))
        }

        async fn submit_feedback(&self, feedback: &NewFeedback) -> Result<Value> {
            self.hit()?;
            self.feedbacks.lock().unwrap().push(feedback.clone());
            Ok(json!({"id": 200}))
        }
    }
}
