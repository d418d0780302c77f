//! Collaborator contracts consumed by the step navigator.

use crate::error::StoreResult;
use crate::progress::{Identity, ProgressRecord};
use async_trait::async_trait;
use intake_types::{AnswerSet, Template};

/// Read-only template lookup, keyed by form code.
///
/// Templates are treated as effectively immutable per request; reads are
/// cacheable and idempotent.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn get_by_code(&self, code: &str) -> StoreResult<Option<Template>>;
}

/// Per-patient, per-form progress persistence.
///
/// `merge_step` is only called for records that already exist; the
/// navigator never creates progress rows. Concurrent submissions for the
/// same patient and form are last-write-wins on the response document —
/// an accepted limitation, not a guarantee.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get_progress(
        &self,
        patient_id: i64,
        form_code: &str,
    ) -> StoreResult<Option<ProgressRecord>>;

    async fn merge_step(
        &self,
        patient_id: i64,
        form_code: &str,
        step_code: &str,
        answers: &AnswerSet,
    ) -> StoreResult<()>;
}

/// Opaque session lookup for the requesting patient.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> Option<Identity>;
}
