//! # Intake Store
//!
//! Storage and session interfaces consumed by the intake navigator.
//!
//! The engine treats persistence as an external collaborator: templates are
//! read-only rows keyed by code, progress records are owned by an external
//! provisioning process and only ever merged into, and the current identity
//! is an opaque session lookup. This crate defines those contracts as
//! async traits plus in-memory implementations used by the dev server and
//! the test suites.
//!
//! Store handles are constructed by the caller and passed in (no global
//! connection singletons); lifecycle belongs to whoever built them.

mod error;
mod memory;
mod progress;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{FixedIdentity, MemoryProgressStore, MemoryTemplateStore};
pub use progress::{Identity, ProgressRecord};
pub use traits::{IdentityProvider, ProgressStore, TemplateStore};
