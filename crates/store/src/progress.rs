//! Persisted intake progress for one (patient, form) pair.

use chrono::{DateTime, Utc};
use intake_types::AnswerSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An authenticated patient identity, as surfaced by the session layer.
///
/// Session issuance and verification are out of scope; the navigator only
/// needs to know *which* patient, if any, is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub patient_id: i64,
}

/// Cumulative answer state for one patient on one form.
///
/// Created only by an external provisioning process when the patient is
/// linked to a form config; the navigator merges into existing records and
/// never creates or deletes them, which keeps orphaned rows impossible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub patient_id: i64,
    pub form_code: String,
    /// The last step the patient submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_step: Option<String>,
    /// Step code to that step's answer set.
    #[serde(default)]
    pub response: BTreeMap<String, AnswerSet>,
    pub updated_at: DateTime<Utc>,
}

impl ProgressRecord {
    /// A freshly provisioned, empty record.
    pub fn provisioned(patient_id: i64, form_code: impl Into<String>) -> Self {
        Self {
            patient_id,
            form_code: form_code.into(),
            last_step: None,
            response: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Merges one step's answers: last write wins for the step's slot, and
    /// `last_step` tracks the merge.
    pub fn merge_step(&mut self, step_code: &str, answers: &AnswerSet) {
        self.response.insert(step_code.to_string(), answers.clone());
        self.last_step = Some(step_code.to_string());
        self.updated_at = Utc::now();
    }
}
