//! Branching-rule evaluation.
//!
//! Templates were historically evaluated by a JavaScript interpreter, and
//! admins have authored rules against its coercion behaviour (loose `==`
//! between numbers and strings, truthy membership checks, and so on). The
//! comparison functions here make those coercions explicit instead of
//! relying on any host-language equality, and they never panic: malformed
//! operators or operands degrade to `false` or the documented default.
//!
//! An absent answer and an explicit JSON `null` are distinct inputs: they
//! loose-equal each other but are not strictly equal, matching the
//! `undefined` / `null` split the rule authors rely on.

use intake_types::{AnswerSet, AnswerValue};

/// Resolves a rule's dotted field path against the current page's answers.
///
/// The prefix before the first `.` must equal the current step's code,
/// otherwise the field resolves to nothing — rules cannot read other pages'
/// answers. The remainder (which may itself contain dots) is an exact key
/// into the answer set; there is no nested traversal.
pub fn field_value<'a>(
    field: &str,
    current_step: &str,
    answers: &'a AnswerSet,
) -> Option<&'a AnswerValue> {
    let (step_code, key) = field.split_once('.')?;
    if step_code != current_step {
        return None;
    }
    answers.get(key)
}

/// Evaluates one branching condition.
///
/// Operators are case-insensitive; an unknown or missing operator behaves
/// as `"=="`. `lhs` is `None` when the field did not resolve, `rhs` is
/// `None` when the rule declares no comparison value.
pub fn evaluate(lhs: Option<&AnswerValue>, operator: Option<&str>, rhs: Option<&AnswerValue>) -> bool {
    let op = operator.unwrap_or("==").trim().to_ascii_lowercase();
    match op.as_str() {
        "===" => strict_eq(lhs, rhs),
        "==" | "=" => loose_eq(lhs, rhs),
        "!=" => !loose_eq(lhs, rhs),
        "in" => match rhs {
            Some(AnswerValue::Array(items)) => contains_strict(items, lhs),
            _ => false,
        },
        // Vacuously true when rhs is not a list. Historical behaviour,
        // asserted as-is by tests.
        "not-in" => match rhs {
            Some(AnswerValue::Array(items)) => !contains_strict(items, lhs),
            _ => true,
        },
        "contains" => match lhs {
            Some(AnswerValue::Array(items)) => contains_strict(items, rhs),
            Some(AnswerValue::Text(haystack)) => haystack.contains(&display_or_undefined(rhs)),
            _ => false,
        },
        "not-contains" => match lhs {
            Some(AnswerValue::Array(items)) => !contains_strict(items, rhs),
            Some(AnswerValue::Text(haystack)) => !haystack.contains(&display_or_undefined(rhs)),
            _ => true,
        },
        ">" | "<" | ">=" | "<=" => {
            let a = to_number(lhs);
            let b = to_number(rhs);
            if !a.is_finite() || !b.is_finite() {
                return false;
            }
            match op.as_str() {
                ">" => a > b,
                "<" => a < b,
                ">=" => a >= b,
                _ => a <= b,
            }
        }
        _ => loose_eq(lhs, rhs),
    }
}

/// Strict equality: same variant, equal contents. An absent value strictly
/// equals only another absent value, never an explicit null.
fn strict_eq(lhs: Option<&AnswerValue>, rhs: Option<&AnswerValue>) -> bool {
    match (lhs, rhs) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Membership by strict equality, as array `includes` does.
fn contains_strict(items: &[AnswerValue], needle: Option<&AnswerValue>) -> bool {
    match needle {
        Some(value) => items.iter().any(|item| item == value),
        None => false,
    }
}

/// Loose equality with explicit cross-type coercions.
///
/// - absent and null are mutually equal and equal nothing else
/// - booleans coerce to numbers before comparing
/// - number vs string parses the string (blank string parses to 0)
/// - an array compares against a primitive via its joined string form
/// - file metadata and array-vs-array comparisons are never equal
fn loose_eq(lhs: Option<&AnswerValue>, rhs: Option<&AnswerValue>) -> bool {
    let a = match lhs {
        None | Some(AnswerValue::Null) => return matches!(rhs, None | Some(AnswerValue::Null)),
        Some(value) => value,
    };
    let b = match rhs {
        None | Some(AnswerValue::Null) => return false,
        Some(value) => value,
    };

    match (a, b) {
        (AnswerValue::Bool(x), _) => loose_eq(Some(&AnswerValue::Number(bool_to_number(*x))), rhs),
        (_, AnswerValue::Bool(y)) => loose_eq(lhs, Some(&AnswerValue::Number(bool_to_number(*y)))),

        (AnswerValue::Number(x), AnswerValue::Number(y)) => x == y,
        (AnswerValue::Text(x), AnswerValue::Text(y)) => x == y,
        (AnswerValue::Number(x), AnswerValue::Text(y)) => string_to_number(y) == Some(*x),
        (AnswerValue::Text(x), AnswerValue::Number(y)) => string_to_number(x) == Some(*y),

        (AnswerValue::Array(_), AnswerValue::Text(y)) => display_string(a) == *y,
        (AnswerValue::Text(x), AnswerValue::Array(_)) => *x == display_string(b),
        (AnswerValue::Array(_), AnswerValue::Number(y)) => {
            string_to_number(&display_string(a)) == Some(*y)
        }
        (AnswerValue::Number(x), AnswerValue::Array(_)) => {
            string_to_number(&display_string(b)) == Some(*x)
        }

        // Objects and array-vs-array only ever compared by identity in the
        // historical evaluator; distinct values are never equal.
        _ => false,
    }
}

fn bool_to_number(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Numeric coercion used by the comparison operators.
///
/// Returns NaN for anything that has no numeric form; callers reject
/// non-finite results.
fn to_number(value: Option<&AnswerValue>) -> f64 {
    match value {
        None => f64::NAN,
        Some(AnswerValue::Null) => 0.0,
        Some(AnswerValue::Bool(b)) => bool_to_number(*b),
        Some(AnswerValue::Number(n)) => *n,
        Some(AnswerValue::Text(s)) => string_to_number(s).unwrap_or(f64::NAN),
        Some(AnswerValue::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => to_number(Some(single)),
            _ => f64::NAN,
        },
        Some(AnswerValue::File(_)) => f64::NAN,
    }
}

/// Parses a string as a number: blank strings parse to 0, and only plain
/// decimal/scientific notation is accepted (no `inf`/`nan` words).
fn string_to_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if trimmed
        .chars()
        .any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// String form used when a rule compares against text: arrays join with
/// commas (nulls joining as empty), numbers drop a trailing `.0`, file
/// metadata stringifies opaquely.
fn display_string(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Null => String::new(),
        AnswerValue::Bool(b) => b.to_string(),
        AnswerValue::Number(n) => format_number(*n),
        AnswerValue::Text(s) => s.clone(),
        AnswerValue::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        AnswerValue::File(_) => "[object Object]".to_string(),
    }
}

fn display_or_undefined(value: Option<&AnswerValue>) -> String {
    match value {
        Some(AnswerValue::Null) => "null".to_string(),
        Some(other) => display_string(other),
        None => "undefined".to_string(),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
