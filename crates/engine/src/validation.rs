//! Answer validation against a page's question definitions.
//!
//! Required and pattern checks run before the client navigator advances,
//! mirroring what the form renderer enforces. Invalid template-authored
//! patterns are ignored rather than failing the submission; template
//! authors get no exceptions from here.

use intake_types::{AnswerSet, Question};
use std::collections::BTreeMap;

const DEFAULT_REQUIRED_ERROR: &str = "This field is required";
const DEFAULT_PATTERN_ERROR: &str = "Invalid format";

/// Validates one page's answers, returning per-question error messages
/// keyed by question code. An empty map means the page may advance.
pub fn validation_errors(questions: &[Question], answers: &AnswerSet) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();

    for question in questions {
        let Some(key) = question.key() else { continue };
        let value = answers.get(key);

        if question.required {
            // Boolean inputs are only "missing" when absent; false is an
            // answer.
            let missing = if question.kind().is_boolean() {
                value.is_none()
            } else {
                value.map_or(true, |v| v.is_empty_value())
            };
            if missing {
                errors.insert(
                    key.to_string(),
                    question
                        .required_error
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REQUIRED_ERROR.to_string()),
                );
                continue;
            }
        }

        if let (Some(pattern), Some(text)) = (question.pattern.as_deref(), value.and_then(|v| v.as_str())) {
            match regex::Regex::new(pattern) {
                Ok(re) => {
                    if !re.is_match(text) {
                        errors.insert(
                            key.to_string(),
                            question
                                .pattern_error
                                .clone()
                                .unwrap_or_else(|| DEFAULT_PATTERN_ERROR.to_string()),
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(question = key, %err, "ignoring invalid template pattern");
                }
            }
        }
    }

    errors
}
