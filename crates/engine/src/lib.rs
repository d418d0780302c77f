//! # Intake Engine
//!
//! The dynamic form-branching core for the patient-intake service.
//!
//! Given a template's ordered pages and a set of submitted answers, this
//! crate decides which page to show next. Everything here is pure and
//! synchronous: the same code runs inside the server-side navigator
//! (authoritative, session-bound) and the cache-only client navigator, so
//! the two can never drift.
//!
//! Module map:
//! - [`rules`] — evaluates one branching condition against an answer set
//! - [`resolve`] — resolves a rule target (page id or code) to a page code
//! - [`next_step`] — the tiered next-step algorithm
//! - [`client`] — the cache-only navigator built on the same algorithm
//! - [`validation`] — required/pattern checks for a page's answers
//!
//! **No I/O concerns**: template loading and progress persistence belong in
//! `intake-store` and `api-rest`.

pub mod client;
pub mod next_step;
pub mod resolve;
pub mod rules;
pub mod validation;

pub use client::{ClientNavigator, FormSnapshot};
pub use next_step::next_step;
pub use resolve::PageLookup;
pub use rules::{evaluate, field_value};
pub use validation::validation_errors;
