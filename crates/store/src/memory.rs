//! In-memory store implementations.
//!
//! Used by the dev server (templates loaded from a JSON directory at
//! startup) and by the test suites. Production deployments substitute
//! database-backed implementations of the same traits.

use crate::error::{StoreError, StoreResult};
use crate::progress::{Identity, ProgressRecord};
use crate::traits::{IdentityProvider, ProgressStore, TemplateStore};
use async_trait::async_trait;
use intake_types::{AnswerSet, Template};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// Template store backed by a map of form code to template.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, Template>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, template: Template) -> StoreResult<()> {
        if template.code.trim().is_empty() {
            return Err(StoreError::MissingTemplateCode(
                template.title.clone().unwrap_or_default(),
            ));
        }
        let mut templates = self.templates.write().await;
        templates.insert(template.code.clone(), template);
        Ok(())
    }

    /// Loads every `*.json` file in `dir` as a template row.
    ///
    /// Files that fail to parse or whose template carries no code are
    /// skipped with a warning so a single bad export cannot take the whole
    /// directory down. Returns the number of templates loaded.
    pub async fn load_dir(&self, dir: &Path) -> StoreResult<usize> {
        let mut loaded = 0usize;
        let entries = std::fs::read_dir(dir).map_err(StoreError::FileRead)?;
        for entry in entries {
            let entry = entry.map_err(StoreError::FileRead)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = std::fs::read_to_string(&path).map_err(StoreError::FileRead)?;
            let template: Template = match serde_json::from_str(&contents) {
                Ok(template) => template,
                Err(err) => {
                    tracing::warn!("skipping template {}: {}", path.display(), err);
                    continue;
                }
            };
            match self.insert(template).await {
                Ok(()) => loaded += 1,
                Err(err) => {
                    tracing::warn!("skipping template {}: {}", path.display(), err);
                }
            }
        }
        Ok(loaded)
    }

    pub async fn len(&self) -> usize {
        self.templates.read().await.len()
    }

    pub async fn codes(&self) -> Vec<String> {
        self.templates.read().await.keys().cloned().collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.templates.read().await.is_empty()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn get_by_code(&self, code: &str) -> StoreResult<Option<Template>> {
        let templates = self.templates.read().await;
        Ok(templates.get(code).cloned())
    }
}

/// Progress store backed by a (patient, form) keyed map.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    records: RwLock<HashMap<(i64, String), ProgressRecord>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stand-in for the external provisioning process that links a patient
    /// to a form. The navigator itself never calls this.
    pub async fn provision(&self, patient_id: i64, form_code: &str) {
        let mut records = self.records.write().await;
        records
            .entry((patient_id, form_code.to_string()))
            .or_insert_with(|| ProgressRecord::provisioned(patient_id, form_code));
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn get_progress(
        &self,
        patient_id: i64,
        form_code: &str,
    ) -> StoreResult<Option<ProgressRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&(patient_id, form_code.to_string())).cloned())
    }

    async fn merge_step(
        &self,
        patient_id: i64,
        form_code: &str,
        step_code: &str,
        answers: &AnswerSet,
    ) -> StoreResult<()> {
        let mut records = self.records.write().await;
        match records.get_mut(&(patient_id, form_code.to_string())) {
            Some(record) => {
                record.merge_step(step_code, answers);
                Ok(())
            }
            // Never create a record here; provisioning is external.
            None => {
                tracing::debug!(patient_id, form_code, "merge skipped, no progress record");
                Ok(())
            }
        }
    }
}

/// Identity provider returning a fixed identity, or none.
///
/// The dev server configures this from the environment; production swaps
/// in a session-backed provider.
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity(Option<Identity>);

impl FixedIdentity {
    pub fn patient(patient_id: i64) -> Self {
        Self(Some(Identity { patient_id }))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_identity(&self) -> Option<Identity> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::AnswerValue;

    fn answers(entries: &[(&str, &str)]) -> AnswerSet {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), AnswerValue::from(*v)))
            .collect()
    }

    #[tokio::test]
    async fn test_template_store_round_trip() {
        let store = MemoryTemplateStore::new();
        let template: Template = serde_json::from_str(
            r#"{"code": "qualification", "title": "Q", "pages": [{"code": "intro"}]}"#,
        )
        .unwrap();
        store.insert(template).await.unwrap();

        let found = store.get_by_code("qualification").await.unwrap().unwrap();
        assert_eq!(found.pages.len(), 1);
        assert!(store.get_by_code("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_template_without_code_is_rejected() {
        let store = MemoryTemplateStore::new();
        let template: Template = serde_json::from_str(r#"{"title": "anonymous"}"#).unwrap();
        assert!(store.insert(template).await.is_err());
    }

    #[tokio::test]
    async fn test_load_dir_skips_bad_files_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("qual.json"),
            r#"{"code": "qualification", "pages": [{"code": "intro"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a template").unwrap();
        // A malformed export must not take the rest of the directory down.
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let store = MemoryTemplateStore::new();
        let loaded = store.load_dir(dir.path()).await.unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get_by_code("qualification").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_merge_requires_existing_record() {
        let store = MemoryProgressStore::new();
        store
            .merge_step(1, "qualification", "goal", &answers(&[("type", "x")]))
            .await
            .unwrap();
        // No record was created by the merge.
        assert!(store.get_progress(1, "qualification").await.unwrap().is_none());

        store.provision(1, "qualification").await;
        store
            .merge_step(1, "qualification", "goal", &answers(&[("type", "x")]))
            .await
            .unwrap();
        let record = store.get_progress(1, "qualification").await.unwrap().unwrap();
        assert_eq!(record.last_step.as_deref(), Some("goal"));
        assert_eq!(record.response["goal"], answers(&[("type", "x")]));
    }

    #[tokio::test]
    async fn test_merge_is_idempotent_per_step() {
        let store = MemoryProgressStore::new();
        store.provision(9, "qualification").await;

        let first = answers(&[("type", "weight-loss"), ("age", "41")]);
        store.merge_step(9, "qualification", "goal", &first).await.unwrap();
        store.merge_step(9, "qualification", "goal", &first).await.unwrap();

        let record = store.get_progress(9, "qualification").await.unwrap().unwrap();
        assert_eq!(record.response.len(), 1);
        assert_eq!(record.response["goal"], first);

        // A later submission replaces the step's slot outright.
        let revised = answers(&[("type", "other")]);
        store.merge_step(9, "qualification", "goal", &revised).await.unwrap();
        let record = store.get_progress(9, "qualification").await.unwrap().unwrap();
        assert_eq!(record.response["goal"], revised);
    }

    #[tokio::test]
    async fn test_fixed_identity() {
        assert_eq!(
            FixedIdentity::patient(5).current_identity().await,
            Some(Identity { patient_id: 5 })
        );
        assert_eq!(FixedIdentity::anonymous().current_identity().await, None);
    }
}
