//! # API REST
//!
//! REST API for the patient-intake form engine.
//!
//! Handles:
//! - HTTP endpoints with axum (`GET`/`POST /intake/{form_code}/{step}`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status mapping)
//!
//! The server-side step navigator lives here too: it wraps the pure
//! `intake-engine` algorithm with template lookup, step validation and
//! progress persistence against the `intake-store` collaborators.

#![warn(rust_2018_idioms)]

pub mod bootstrap;
pub mod error;
pub mod navigator;
pub mod routes;

pub use bootstrap::{build_state, ServiceConfig};
pub use error::NavigateError;
pub use navigator::{StepNavigator, StepView, SubmitOutcome};
pub use routes::{router, AppState};
