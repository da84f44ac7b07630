//! Core types, form model, and payload construction for feedback submission.

pub mod config;
pub mod form;
pub mod payload;
pub mod record;

pub use config::IngestConfig;
pub use form::{AttributeRow, FormError, SubmissionForm, ValidSubmission};
pub use payload::{PayloadBuilder, format_timestamp, reference_id};
pub use record::{Attributes, BatchEnvelope, SubmissionRecord};
