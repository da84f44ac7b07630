//! HTTP submitter for pushing feedback batches to the ingestion endpoint.

use feedback_core::{BatchEnvelope, IngestConfig};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

/// Message returned when no endpoint URL is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "API_URL is not set. (Sending is disabled.)";

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("API_URL is not set. (Sending is disabled.)")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Response body as returned by the endpoint: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

/// Raw outcome of a request that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalised result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// No endpoint configured; nothing was sent.
    Disabled { message: String },
    /// The request never produced a response (DNS, connect, TLS, timeout).
    Transport { message: String },
    /// The server answered, successfully or not.
    Response {
        ok: bool,
        status: u16,
        body: ResponseBody,
    },
}

impl SendOutcome {
    /// `true` only for a 2xx response.
    pub fn ok(&self) -> bool {
        matches!(self, Self::Response { ok: true, .. })
    }

    /// HTTP status, absent when no response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, or the error message for the two no-response shapes.
    pub fn body(&self) -> ResponseBody {
        match self {
            Self::Disabled { message } | Self::Transport { message } => {
                ResponseBody::Text(message.clone())
            }
            Self::Response { body, .. } => body.clone(),
        }
    }
}

impl From<Result<SubmitResponse, SubmitError>> for SendOutcome {
    fn from(result: Result<SubmitResponse, SubmitError>) -> Self {
        match result {
            Ok(resp) => Self::Response {
                ok: resp.is_success(),
                status: resp.status,
                body: resp.body,
            },
            Err(err @ SubmitError::NotConfigured) => Self::Disabled {
                message: err.to_string(),
            },
            Err(SubmitError::Http(err)) => Self::Transport {
                message: err.to_string(),
            },
        }
    }
}

/// Client for the ingestion endpoint.
pub struct Submitter {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

impl Submitter {
    /// Create a submitter for the endpoint and token in `config`.
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim().to_string(),
            api_token: config.api_token.clone(),
        }
    }

    /// POST the envelope once and return whatever the server said.
    ///
    /// Fails with [`SubmitError::NotConfigured`] before touching the network
    /// when the URL is blank. Non-2xx responses are not errors here.
    pub async fn try_send(&self, payload: &BatchEnvelope) -> Result<SubmitResponse, SubmitError> {
        if self.api_url.is_empty() {
            return Err(SubmitError::NotConfigured);
        }

        info!(url = %self.api_url, records = payload.batch.len(), "submitting batch");
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(payload)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        let response = SubmitResponse {
            status,
            body: ResponseBody::from_text(text),
        };
        if response.is_success() {
            info!(status, "batch accepted");
        } else {
            warn!(status, "batch rejected");
        }
        Ok(response)
    }

    /// Submit and fold every result into a [`SendOutcome`]. Never retries.
    pub async fn send(&self, payload: &BatchEnvelope) -> SendOutcome {
        let result = self.try_send(payload).await;
        if let Err(SubmitError::Http(err)) = &result {
            warn!(error = %err, "transport failure");
        }
        result.into()
    }
}
