//! Cache-only navigation for a disconnected client.
//!
//! The browser keeps a snapshot of what the read path served (ordered step
//! codes, the id-to-code map, the first step) plus a local cache of the
//! visitor's answers, and navigates without a round trip when nothing needs
//! persisting. The next-step decision delegates to the exact same
//! [`next_step`](crate::next_step::next_step) the server uses; any
//! divergence between the two would be a correctness bug, not a tuning
//! choice.

use crate::next_step;
use crate::resolve::PageLookup;
use crate::validation;
use intake_types::{AnswerSet, NextPageEntry, TemplatePage};
use std::collections::{BTreeMap, HashMap};

/// The client-held copy of a form's navigation metadata, exactly the
/// payload the read path serves.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub form_code: String,
    pub first_step: String,
    /// All page codes, in template order.
    pub all_steps: Vec<String>,
    /// Codes of pages with at least one question (progress-bar indexing).
    pub question_steps: Vec<String>,
    /// Page-id to page-code map for resolving id-based rule targets.
    pub pages_by_id: HashMap<String, String>,
}

/// An I/O-free step navigator over a cached form snapshot.
#[derive(Debug, Clone)]
pub struct ClientNavigator {
    snapshot: FormSnapshot,
    lookup: PageLookup,
    cached: AnswerSet,
}

impl ClientNavigator {
    pub fn new(snapshot: FormSnapshot) -> Self {
        let lookup = PageLookup::from_parts(
            snapshot.all_steps.clone(),
            snapshot.pages_by_id.clone(),
        );
        Self {
            snapshot,
            lookup,
            cached: AnswerSet::new(),
        }
    }

    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    /// The step immediately before `current` in template order.
    pub fn prev_step(&self, current: &str) -> Option<&str> {
        let index = self.lookup.index_of(current)?;
        if index == 0 {
            return None;
        }
        self.snapshot.all_steps.get(index - 1).map(String::as_str)
    }

    /// Computes the next step for the current page.
    ///
    /// `next_page` is the current page's declaration list (part of the page
    /// payload) and `answers` the just-collected answers for it; pass
    /// `None` to get the static (no-answers) decision, e.g. for a
    /// prefetched "Continue" hint.
    pub fn next_step(
        &self,
        current: &str,
        next_page: &[NextPageEntry],
        answers: Option<&AnswerSet>,
    ) -> Option<String> {
        next_step::next_step(&self.lookup, current, next_page, answers)
    }

    /// One-based progress position of `current` among question steps, for
    /// the progress bar. Content-only pages do not count.
    pub fn progress_position(&self, current: &str) -> usize {
        self.snapshot
            .question_steps
            .iter()
            .position(|code| code == current)
            .map(|i| i + 1)
            .unwrap_or(1)
    }

    /// Validates `answers` against `page` before advancing; an empty map
    /// means the page may proceed to [`next_step`](Self::next_step).
    pub fn validate(&self, page: &TemplatePage, answers: &AnswerSet) -> BTreeMap<String, String> {
        validation::validation_errors(&page.questions, answers)
    }

    /// Caches the answers belonging to `page`, keyed by question code.
    ///
    /// Only values for codes actually present on the page are written, so a
    /// stray key can never shadow another page's answer.
    pub fn record_answers(&mut self, page: &TemplatePage, answers: &AnswerSet) {
        for question in &page.questions {
            let Some(key) = question.key() else { continue };
            if let Some(value) = answers.get(key) {
                self.cached.insert(key.to_string(), value.clone());
            }
        }
    }

    /// Cached answers for the questions on `page`, for prefilling inputs
    /// when the visitor navigates back.
    pub fn prefill(&self, page: &TemplatePage) -> AnswerSet {
        page.questions
            .iter()
            .filter_map(|q| q.key())
            .filter_map(|key| {
                self.cached
                    .get(key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }

    pub fn cached_answers(&self) -> &AnswerSet {
        &self.cached
    }
}
