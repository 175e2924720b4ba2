//! Transport seam between the session client and the chat server.
//!
//! `ChatTransport` is the only way the widget reaches the network, so tests
//! can swap in a scripted double. `HttpTransport` is the real implementation
//! over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use gamepal_core::config::ServerConfig;
use gamepal_core::types::{
    ChatReply, ChatRequest, ClearRequest, HealthReport, HistoryEntry, HistoryResponse, SessionId,
    SessionStats, StatsResponse,
};
use serde::de::DeserializeOwned;

use crate::error::ChatError;

/// Calls made by the session client against the chat server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// `GET /api/health`.
    async fn health(&self) -> Result<HealthReport, ChatError>;

    /// `POST /api/chat`. Any decodable body is returned, whatever the status.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;

    /// `POST /api/clear`. Succeeds on any 2xx status.
    async fn clear(&self, request: &ClearRequest) -> Result<(), ChatError>;

    /// `GET /api/history`.
    async fn history(&self, session_id: &SessionId) -> Result<Vec<HistoryEntry>, ChatError>;

    /// `GET /api/stats`.
    async fn stats(&self, session_id: &SessionId) -> Result<SessionStats, ChatError>;
}

/// `ChatTransport` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`.
    ///
    /// A zero `timeout` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ChatError::Config("server base URL is empty".to_string()));
        }

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ChatError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a body as JSON regardless of the HTTP status.
    async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ChatError> {
        let status = response.status();
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(status = %status, error = %e, "Response body is not the expected JSON");
            ChatError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn health(&self) -> Result<HealthReport, ChatError> {
        let response = self.client.get(self.url("/api/health")).send().await?;
        Self::decode_body(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await?;
        Self::decode_body(response).await
    }

    async fn clear(&self, request: &ClearRequest) -> Result<(), ChatError> {
        let response = self
            .client
            .post(self.url("/api/clear"))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }
        Ok(())
    }

    async fn history(&self, session_id: &SessionId) -> Result<Vec<HistoryEntry>, ChatError> {
        let response = self
            .client
            .get(self.url("/api/history"))
            .query(&[("session_id", session_id.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let body: HistoryResponse = Self::decode_body(response).await?;
        Ok(body.history)
    }

    async fn stats(&self, session_id: &SessionId) -> Result<SessionStats, ChatError> {
        let response = self
            .client
            .get(self.url("/api/stats"))
            .query(&[("session_id", session_id.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let body: StatsResponse = Self::decode_body(response).await?;
        Ok(body.stats)
    }
}
