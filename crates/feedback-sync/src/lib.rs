//! Delivery layer: submits built feedback batches to the remote ingestion endpoint.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{ResponseBody, SendOutcome, SubmitError, SubmitResponse, Submitter};
