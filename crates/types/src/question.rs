//! Question definitions within a template page.
//!
//! Question JSON comes from a template editor that has been through several
//! iterations, so the model is deliberately permissive: every field except
//! the type is optional, the stable key may live under `code` or the legacy
//! `name`, and the question text may live under any of half a dozen keys.

use serde::{Deserialize, Serialize};

/// A choice offered by a radio/checkbox/dropdown question.
///
/// Older templates use bare strings; newer ones use value/label objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionOption {
    Text(String),
    Detailed {
        value: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sublabel: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

impl QuestionOption {
    /// The submitted value for this option.
    pub fn value(&self) -> &str {
        match self {
            QuestionOption::Text(s) => s,
            QuestionOption::Detailed { value, .. } => value,
        }
    }
}

/// Canonical question types supported by the intake renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Text,
    Email,
    Number,
    Textarea,
    Date,
    Radio,
    Checkbox,
    Dropdown,
    SearchableDropdown,
    Document,
    Phone,
    YesNo,
    Toggle,
}

impl QuestionType {
    /// Normalizes a raw template type name to the supported set.
    ///
    /// Template editors have emitted several aliases over time
    /// (`select`, `tel`, `yes/no`, `searchable-dropdown`, ...); anything
    /// unrecognized degrades to a plain text input.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "" => QuestionType::Text,
            "email" => QuestionType::Email,
            "number" => QuestionType::Number,
            "textarea" => QuestionType::Textarea,
            "date" => QuestionType::Date,
            "radio" => QuestionType::Radio,
            "checkbox" => QuestionType::Checkbox,
            "dropdown" | "select" => QuestionType::Dropdown,
            "searchabledropdown" | "searchable-dropdown" => QuestionType::SearchableDropdown,
            "document" | "file" | "upload" => QuestionType::Document,
            "phone" | "tel" | "phone number" => QuestionType::Phone,
            "yesno" | "yes/no" | "boolean" => QuestionType::YesNo,
            "toggle" => QuestionType::Toggle,
            _ => QuestionType::Text,
        }
    }

    /// Boolean inputs answer with `true`/`false`; a required check on them
    /// only fails when the answer is absent entirely.
    pub fn is_boolean(self) -> bool {
        matches!(self, QuestionType::YesNo | QuestionType::Toggle)
    }
}

/// One input field definition on a template page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable key for answers; prefer `code`, fall back to legacy `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filetype: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files_allowed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,

    /// UI hint suppressing single-question auto-advance until the named
    /// answer is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_followup_when: Option<String>,
}

impl Question {
    /// The stable answer key: `code`, or legacy `name` when no code is set.
    pub fn key(&self) -> Option<&str> {
        self.code
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.name.as_deref().filter(|n| !n.is_empty()))
    }

    /// The normalized question type.
    pub fn kind(&self) -> QuestionType {
        QuestionType::normalize(self.question_type.as_deref().unwrap_or("text"))
    }

    /// Question text resolved across the key aliases used by older
    /// template editors, in preference order.
    pub fn display_label(&self) -> Option<&str> {
        self.text
            .as_deref()
            .or(self.label.as_deref())
            .or(self.question.as_deref())
            .or(self.question_text.as_deref())
            .or(self.title.as_deref())
            .or(self.code.as_deref())
    }
}
