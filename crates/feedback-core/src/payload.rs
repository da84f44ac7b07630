//! Batch payload construction.
//!
//! Turns an already-validated submission into the fixed-shape envelope the
//! ingestion API accepts. Pure apart from reading the clock, and
//! [`PayloadBuilder::build_at`] takes the clock as an argument.
//!
//! # Reference ids
//!
//! `reference_id(m) = "msg-" + hex(sha256(trim(m)))[..16]`
//!
//! The id depends on the trimmed message text only, so resubmitting the same
//! message yields the same id regardless of timestamp, source or attributes.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::IngestConfig;
use crate::form::ValidSubmission;
use crate::record::{Attributes, BatchEnvelope, SubmissionRecord};

const REFERENCE_PREFIX: &str = "msg-";
const REFERENCE_HEX_LEN: usize = 16;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Derive the content-addressed reference id for a message.
pub fn reference_id(message: &str) -> String {
    let digest = Sha256::digest(message.trim().as_bytes());
    // 16 hex chars = first 8 bytes.
    let hex = hex::encode(&digest[..REFERENCE_HEX_LEN / 2]);
    format!("{REFERENCE_PREFIX}{hex}")
}

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SSZ` (no fractional seconds).
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds [`BatchEnvelope`]s for one ingestion target.
pub struct PayloadBuilder<'a> {
    config: &'a IngestConfig,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(config: &'a IngestConfig) -> Self {
        Self { config }
    }

    /// Build an envelope stamped with the current UTC time.
    ///
    /// Callers are expected to have trimmed `message` and checked it is
    /// non-empty, resolved the default source, and dropped blank attribute
    /// keys. None of that is re-checked here.
    pub fn build(
        &self,
        message: &str,
        source: &str,
        attributes: &Attributes,
        score: Option<u8>,
    ) -> BatchEnvelope {
        self.build_at(message, source, attributes, score, Utc::now())
    }

    /// Like [`build`](Self::build) with an explicit timestamp.
    pub fn build_at(
        &self,
        message: &str,
        source: &str,
        attributes: &Attributes,
        score: Option<u8>,
        now: DateTime<Utc>,
    ) -> BatchEnvelope {
        let unique_id = reference_id(message);
        let ticket_id = self.config.emit_ticket_id.then(|| unique_id.clone());

        let record = SubmissionRecord {
            message: message.to_string(),
            ds: format_timestamp(now),
            unique_id,
            ticket_id,
            source: source.to_string(),
            filters: attributes.clone(),
            score,
            score_scale: score.map(|_| self.config.score_scale),
        };
        debug!(
            unique_id = %record.unique_id,
            attributes = record.filters.len(),
            scored = record.score.is_some(),
            "built submission record"
        );

        BatchEnvelope {
            project_id: self.config.project_id.clone(),
            taxonomy_id: self.config.taxonomy_id.clone(),
            skip_steps: self.config.skip_steps.clone(),
            batch: vec![record],
        }
    }

    /// Build from the output of [`SubmissionForm::validate`](crate::SubmissionForm::validate).
    pub fn build_submission(&self, submission: &ValidSubmission) -> BatchEnvelope {
        self.build(
            &submission.message,
            &submission.source,
            &submission.attributes,
            submission.score,
        )
    }
}
