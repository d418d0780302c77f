//! Intake form templates and their branching declarations.
//!
//! A template is an ordered list of pages; the order is significant because
//! it is the fallback traversal order when no branching rule fires. Each
//! page may declare a `nextPage` list mixing literal page codes with
//! conditional rules.

use crate::answer::AnswerValue;
use crate::question::Question;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The target of a branching rule: a numeric page id or a page code.
///
/// Numeric-looking strings are disambiguated at resolution time (id lookup
/// first, then literal code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageTarget {
    Id(i64),
    Code(String),
}

/// A conditional branching clause attached to a page's `nextPage` list.
///
/// `field` is a dotted `"<stepCode>.<questionCode>"` path. Only fields of
/// the current page's answers are evaluable; cross-page lookback is a
/// deliberate non-feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPageRule {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<AnswerValue>,
    pub page: PageTarget,
}

/// One element of a page's `nextPage` list: a literal page-code string or a
/// branching rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextPageEntry {
    Code(String),
    Rule(NextPageRule),
}

/// One screen of the form.
///
/// A page with zero questions is a pure content/interstitial page; it still
/// participates in navigation but not in the progress bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_page: Vec<NextPageEntry>,
}

impl TemplatePage {
    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }
}

/// A named intake form definition consisting of ordered pages.
///
/// Created and edited by an external admin tool; read-only to the engine.
/// Invariant: page codes are unique within one template (the admin tool
/// enforces this; the engine's lookups assume it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub require_consent: bool,
    #[serde(default)]
    pub show_thankyou_page: bool,
    #[serde(default = "default_version")]
    pub version: i64,
    #[serde(default, deserialize_with = "deserialize_pages")]
    pub pages: Vec<TemplatePage>,
}

fn default_version() -> i64 {
    1
}

fn deserialize_pages<'de, D>(deserializer: D) -> Result<Vec<TemplatePage>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(normalize_pages(&raw))
}

/// Normalizes the raw `pages` column of a template row.
///
/// Older rows store pages as a JSON-encoded string rather than a JSON
/// array; both are accepted. Entries without a string `code` are dropped,
/// and anything unparseable degrades to an empty page list rather than a
/// hard failure.
pub fn normalize_pages(raw: &Value) -> Vec<TemplatePage> {
    let parsed;
    let array = match raw {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                parsed = value;
                &parsed
            }
            Err(_) => return Vec::new(),
        },
        other => other,
    };

    let Value::Array(entries) = array else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|entry| entry.get("code").map(Value::is_string).unwrap_or(false))
        .filter_map(|entry| serde_json::from_value::<TemplatePage>(entry.clone()).ok())
        .collect()
}
