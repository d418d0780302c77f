//! Server-side step navigation.
//!
//! Wraps the pure next-step algorithm with I/O: template lookup, step
//! validation, prev/next computation and (on submission) progress
//! persistence. The navigator decides *what* to persist; whether a
//! progress record exists at all is the provisioning process's business,
//! and the navigator never creates one.

use crate::error::NavigateError;
use intake_engine::{next_step, PageLookup};
use intake_store::{IdentityProvider, ProgressStore, TemplateStore};
use intake_types::{AnswerSet, Template, TemplatePage};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything the read path knows about one step of a form.
#[derive(Debug, Clone)]
pub struct StepView {
    pub template: Template,
    /// The requested page, when the step code is valid.
    pub page: Option<TemplatePage>,
    pub total: usize,
    pub first_step: String,
    pub current_step: String,
    /// Whether the requested step exists; redirect policy on `false`
    /// belongs to the caller.
    pub valid: bool,
    pub prev_step: Option<String>,
    pub next_step: Option<String>,
    /// All page codes in template order.
    pub all_steps: Vec<String>,
    /// Codes of pages with at least one question.
    pub question_steps: Vec<String>,
    /// Page-id to page-code map for client-side rule resolution.
    pub pages_by_id: HashMap<String, String>,
}

/// Result of a step submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub next_step: Option<String>,
    pub persisted: bool,
}

/// The I/O-bound navigator over the store collaborators.
///
/// Store handles are injected at construction; the navigator owns no
/// connections and holds no locks of its own.
#[derive(Clone)]
pub struct StepNavigator {
    templates: Arc<dyn TemplateStore>,
    progress: Arc<dyn ProgressStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl StepNavigator {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        progress: Arc<dyn ProgressStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            templates,
            progress,
            identity,
        }
    }

    async fn load_template(&self, form_code: &str) -> Result<Template, NavigateError> {
        let template = self
            .templates
            .get_by_code(form_code)
            .await?
            .ok_or_else(|| NavigateError::TemplateNotFound(form_code.to_string()))?;
        if template.pages.is_empty() {
            return Err(NavigateError::EmptyTemplate(form_code.to_string()));
        }
        Ok(template)
    }

    /// Read path: resolves a step request to the page plus navigation
    /// metadata. An empty `step` means the first page. Next-step here is
    /// computed without answers, so only the static tiers are reachable.
    pub async fn view_step(&self, form_code: &str, step: &str) -> Result<StepView, NavigateError> {
        let form_code = form_code.trim();
        if form_code.is_empty() {
            return Err(NavigateError::MissingFormCode);
        }
        let template = self.load_template(form_code).await?;

        let lookup = PageLookup::new(&template.pages);
        let first_step = lookup.first().unwrap_or_default().to_string();
        let step = step.trim();
        let current_step = if step.is_empty() {
            first_step.clone()
        } else {
            step.to_string()
        };

        let index = lookup.index_of(&current_step);
        let valid = index.is_some();
        let page = index.map(|i| template.pages[i].clone());

        let prev_step = index
            .filter(|i| *i > 0)
            .map(|i| template.pages[i - 1].code.clone());
        let next = page
            .as_ref()
            .and_then(|p| next_step(&lookup, &current_step, &p.next_page, None));

        let question_steps = template
            .pages
            .iter()
            .filter(|p| p.has_questions())
            .map(|p| p.code.clone())
            .collect();

        Ok(StepView {
            total: template.pages.len(),
            first_step,
            current_step,
            valid,
            prev_step,
            next_step: next,
            all_steps: lookup.codes().to_vec(),
            question_steps,
            pages_by_id: lookup.id_to_code().clone(),
            page,
            template,
        })
    }

    /// Write path: computes the next step for a submission and persists
    /// progress when there is someone to persist for.
    ///
    /// Persistence happens only when an identity is present *and* a
    /// progress record already exists for (patient, form). A store failure
    /// while persisting is reported as `persisted: false` and logged; it
    /// never blocks the navigation decision.
    pub async fn submit_step(
        &self,
        form_code: &str,
        step: &str,
        answers: &AnswerSet,
    ) -> Result<SubmitOutcome, NavigateError> {
        let form_code = form_code.trim();
        if form_code.is_empty() {
            return Err(NavigateError::MissingFormCode);
        }
        let step = step.trim();
        if step.is_empty() {
            return Err(NavigateError::MissingStep);
        }

        let template = self.load_template(form_code).await?;
        let lookup = PageLookup::new(&template.pages);
        let index = lookup
            .index_of(step)
            .ok_or_else(|| NavigateError::InvalidStep {
                form: form_code.to_string(),
                step: step.to_string(),
            })?;

        let page = &template.pages[index];
        let next = next_step(&lookup, step, &page.next_page, Some(answers));

        let persisted = self.persist_progress(form_code, step, answers).await;

        Ok(SubmitOutcome {
            next_step: next,
            persisted,
        })
    }

    async fn persist_progress(&self, form_code: &str, step: &str, answers: &AnswerSet) -> bool {
        let Some(identity) = self.identity.current_identity().await else {
            return false;
        };

        match self.progress.get_progress(identity.patient_id, form_code).await {
            Ok(Some(_)) => {
                match self
                    .progress
                    .merge_step(identity.patient_id, form_code, step, answers)
                    .await
                {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::error!(
                            patient_id = identity.patient_id,
                            form_code,
                            step,
                            "failed to persist intake progress: {err}"
                        );
                        false
                    }
                }
            }
            Ok(None) => {
                tracing::debug!(
                    patient_id = identity.patient_id,
                    form_code,
                    "no progress record provisioned; navigation continues unpersisted"
                );
                false
            }
            Err(err) => {
                tracing::error!(
                    patient_id = identity.patient_id,
                    form_code,
                    "failed to read intake progress: {err}"
                );
                false
            }
        }
    }
}
