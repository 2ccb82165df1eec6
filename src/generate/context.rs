use std::sync::Arc;

use crate::gateway::{DataService, project_description};
use crate::storage::ContextStore;

/// Used when no description is known for a project.
pub const NO_CONTEXT_PLACEHOLDER: &str = "등록된 사업 설명이 없습니다.";

/// Resolves the business description generators put into their prompts.
///
/// The data service is asked first when one is configured, then the local
/// store. Resolution never fails; an unknown project yields the placeholder.
pub struct ContextResolver {
    store: Arc<ContextStore>,
    gateway: Option<Arc<dyn DataService>>,
}

impl ContextResolver {
    pub fn new(store: Arc<ContextStore>, gateway: Option<Arc<dyn DataService>>) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub async fn describe(&self, project_id: i64) -> String {
        if let Some(gateway) = &self.gateway {
            match gateway.get_project(project_id).await {
                Ok(project) => {
                    if let Some(description) = project_description(&project) {
                        return description;
                    }
                }
                Err(e) => {
                    tracing::warn!(project_id, error = %e, "Project lookup failed, using local context");
                }
            }
        }
        self.store
            .description(project_id)
            .unwrap_or_else(|| NO_CONTEXT_PLACEHOLDER.to_string())
    }
}
