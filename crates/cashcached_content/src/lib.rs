//! CashCached static content
//!
//! Read once at construction, never mutated:
//! - `faq`: the question/answer catalog behind the FAQ section (YAML)
//! - `forms`: field schemas and user-visible text of the contact and consultation forms

mod error;
mod faq;
mod forms;

pub use error::ContentError;
pub use faq::{FaqCatalog, FaqEntry, MAX_FAQ_ENTRIES};
pub use forms::{consultation_copy, consultation_schema, contact_copy, contact_schema};
