//! Wire types for the ingestion API's batch body.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form key/value attributes, kept in the order they were entered.
pub type Attributes = IndexMap<String, String>;

/// One feedback record inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub message: String,
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`.
    pub ds: String,
    pub unique_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub source: String,
    pub filters: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_scale: Option<u8>,
}

/// Top-level document POSTed to the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEnvelope {
    pub project_id: String,
    pub taxonomy_id: String,
    pub skip_steps: Map<String, Value>,
    pub batch: Vec<SubmissionRecord>,
}

impl BatchEnvelope {
    /// The single record every envelope carries.
    pub fn record(&self) -> Option<&SubmissionRecord> {
        self.batch.first()
    }
}
