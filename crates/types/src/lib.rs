//! # Intake Types
//!
//! Shared data model for the patient-intake form engine.
//!
//! This crate contains the pure template/page/question model and the
//! answer-value union used by both the branching engine and the storage
//! layer. It has no I/O and no async: templates arrive as JSON from an
//! external admin tool, and everything here is about giving that JSON a
//! stable, typed shape.
//!
//! **No engine or API concerns**: rule evaluation lives in
//! `intake-engine`; persistence lives in `intake-store`.

mod answer;
mod question;
mod template;

pub use answer::{AnswerSet, AnswerValue, FileMeta};
pub use question::{Question, QuestionOption, QuestionType};
pub use template::{normalize_pages, NextPageEntry, NextPageRule, PageTarget, Template, TemplatePage};
