//! Navigation error taxonomy and HTTP status mapping.
//!
//! Only request-shaped problems are errors here. Malformed rules and
//! unresolvable rule targets are recovered inside the engine (the rule is
//! treated as non-matching); a navigation request always terminates with a
//! decision or one of these errors, never a panic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use intake_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum NavigateError {
    #[error("missing form code")]
    MissingFormCode,
    #[error("missing step code")]
    MissingStep,
    #[error("form template not found: {0}")]
    TemplateNotFound(String),
    #[error("form template has no pages: {0}")]
    EmptyTemplate(String),
    #[error("unknown step '{step}' for form '{form}'")]
    InvalidStep { form: String, step: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl NavigateError {
    pub fn status(&self) -> StatusCode {
        match self {
            NavigateError::MissingFormCode
            | NavigateError::MissingStep
            | NavigateError::InvalidStep { .. } => StatusCode::BAD_REQUEST,
            NavigateError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            NavigateError::EmptyTemplate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NavigateError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NavigateError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Store details stay in the logs, not on the wire.
            NavigateError::Store(err) => {
                tracing::error!("store failure during navigation: {err}");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(serde_json::json!({ "success": false, "message": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(NavigateError::MissingFormCode.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            NavigateError::TemplateNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            NavigateError::EmptyTemplate("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            NavigateError::InvalidStep {
                form: "f".into(),
                step: "s".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
