//! Ingestion configuration shared by the payload builder and the submitter.

use std::fmt;

use serde_json::{Map, Value};

pub const DEFAULT_PROJECT_ID: &str = "hrdf-care";
pub const DEFAULT_TAXONOMY_ID: &str = "default";
pub const DEFAULT_API_URL: &str = "https://public-api.anecdoteai.com/inject";

/// Upper bound of the score widget; sent alongside every score.
pub const SCORE_SCALE: u8 = 5;

/// Immutable settings for one ingestion target.
///
/// Built once at startup and handed to [`PayloadBuilder`](crate::PayloadBuilder)
/// and the submitter. Nothing in here changes between submissions.
#[derive(Clone)]
pub struct IngestConfig {
    pub project_id: String,
    pub taxonomy_id: String,
    /// Always empty; the ingestion API expects the key to be present.
    pub skip_steps: Map<String, Value>,
    pub score_scale: u8,
    pub api_url: String,
    pub api_token: String,
    /// Also emit `ticket_id` on each record (extended record layout).
    pub emit_ticket_id: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            taxonomy_id: DEFAULT_TAXONOMY_ID.to_string(),
            skip_steps: Map::new(),
            score_scale: SCORE_SCALE,
            api_url: DEFAULT_API_URL.to_string(),
            api_token: String::new(),
            emit_ticket_id: false,
        }
    }
}

impl IngestConfig {
    /// Whether an endpoint is configured at all. A blank URL disables sending.
    pub fn sending_enabled(&self) -> bool {
        !self.api_url.trim().is_empty()
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("project_id", &self.project_id)
            .field("taxonomy_id", &self.taxonomy_id)
            .field("skip_steps", &self.skip_steps)
            .field("score_scale", &self.score_scale)
            .field("api_url", &self.api_url)
            .field("api_token", &"<redacted>")
            .field("emit_ticket_id", &self.emit_ticket_id)
            .finish()
    }
}
