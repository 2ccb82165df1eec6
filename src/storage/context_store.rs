use crate::{error::Result, model::ProjectRecord, validation};
use dashmap::DashMap;

/// In-process registry of project descriptions keyed by project id.
///
/// Constructed once at startup and shared through `Arc`. Writes to different
/// ids never contend; concurrent writes to the same id are last-write-wins.
#[derive(Debug, Default)]
pub struct ContextStore {
    projects: DashMap<i64, ProjectRecord>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the description for `project_id`.
    pub fn register(&self, project_id: i64, description: &str) -> Result<ProjectRecord> {
        validation::validate_description(description)?;

        let record = ProjectRecord::new(project_id, description.trim().to_string());
        let replaced = self.projects.insert(project_id, record.clone()).is_some();
        tracing::info!(project_id, replaced, "Registered project description");
        Ok(record)
    }

    pub fn description(&self, project_id: i64) -> Option<String> {
        self.projects
            .get(&project_id)
            .map(|record| record.description.clone())
    }

    pub fn contains(&self, project_id: i64) -> bool {
        self.projects.contains_key(&project_id)
    }

    /// All registered projects ordered by id.
    pub fn list(&self) -> Vec<ProjectRecord> {
        let mut records: Vec<ProjectRecord> = self
            .projects
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| r.project_id);
        records
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
