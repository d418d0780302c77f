//! Answer values submitted for one page of a form.
//!
//! Templates are authored against loosely typed JSON, so an answer can be a
//! string, a number, a boolean, an array (multi-select), or a file-metadata
//! object captured in place of raw upload bytes. This module gives those
//! shapes a tagged union that still round-trips plain JSON via untagged
//! serde.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata recorded for an uploaded file.
///
/// The intake flow never stores file bytes alongside answers; only the
/// name/size/type triple is kept so branching rules and the review page can
/// refer to the upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// One submitted answer value.
///
/// Variant order matters for untagged deserialization: `File` must be tried
/// before `Array` so `{name,size,type}` objects are not rejected, and `Null`
/// first so JSON `null` lands on the unit variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    File(FileMeta),
    Array(Vec<AnswerValue>),
}

/// Answers for one page, keyed by question code.
///
/// Scoped to a single page submission; the progress store merges these into
/// a cumulative response document keyed by step code.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

impl AnswerValue {
    /// True for values a required-field check treats as "not answered":
    /// null, whitespace-only strings and empty arrays.
    pub fn is_empty_value(&self) -> bool {
        match self {
            AnswerValue::Null => true,
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_owned())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}
