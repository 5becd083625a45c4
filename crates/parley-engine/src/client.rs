//! HTTP transport client for the completion endpoint.
//!
//! Performs exactly one request/response exchange per call. All failure
//! modes (connect error, timeout, non-2xx status, malformed body) are
//! normalized into a single [`ClientError`] whose `Display` is suitable
//! for direct presentation. No retries, no batching, no caching.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chat::Message;
use crate::config::Config;

/// Path of the completion endpoint, relative to the base URL.
const COMPLETE_PATH: &str = "/api/chat/complete";

/// Request body for the completion endpoint.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [Message],
    #[serde(rename = "useRag")]
    use_rag: bool,
}

/// Success body returned by the completion endpoint.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    response: String,
}

/// Client for the remote completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Build a client from the given configuration.
    ///
    /// The request timeout is applied to every call so a hung endpoint
    /// settles as [`ClientError::Timeout`] instead of hanging forever.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL this client talks to (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one request/response exchange with the completion endpoint.
    ///
    /// Sends the full ordered history plus the RAG flag and returns the
    /// assistant's reply text.
    pub async fn complete(
        &self,
        messages: &[Message],
        use_rag: bool,
    ) -> Result<String, ClientError> {
        let url = format!("{}{COMPLETE_PATH}", self.base_url);
        let request = CompletionRequest { messages, use_rag };

        debug!(%url, message_count = messages.len(), use_rag, "sending completion request");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "completion request failed");
                if err.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Http(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "completion endpoint returned an error status");
            return Err(ClientError::Status(status));
        }

        let body: CompletionResponse = response.json().await.map_err(|err| {
            warn!(error = %err, "completion response body could not be parsed");
            if err.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::MalformedResponse
            }
        })?;

        Ok(body.response)
    }

    /// Check whether the endpoint answers at all.
    ///
    /// Issues a GET against the base URL (the backend serves a status
    /// document there). Used by `parley doctor`, never by the chat path.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Http(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        Ok(())
    }
}

/// Errors that can occur talking to the completion endpoint.
///
/// The state manager presents `Display` output directly, so every variant
/// reads as one self-contained sentence.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never completed (connection refused, DNS, ...).
    #[error("failed to reach the completion endpoint: {0}")]
    Http(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("the completion request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("the completion endpoint returned {0}")]
    Status(reqwest::StatusCode),

    /// The endpoint answered 2xx but the body had no usable reply.
    #[error("the completion endpoint returned an unexpected body")]
    MalformedResponse,
}
