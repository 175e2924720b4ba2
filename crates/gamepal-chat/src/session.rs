//! Session client: owns the session identifier and the in-flight flag, and
//! mediates every call to the chat server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use gamepal_core::types::{ChatRequest, ClearRequest, HistoryEntry, SessionId, SessionStats};

use crate::error::ChatError;
use crate::transport::ChatTransport;

/// Shown in place of a reply when the server cannot be reached or answers
/// with something that is not JSON.
pub const CONNECTION_FALLBACK: &str =
    "❌ Failed to connect to the assistant. Please check your connection and try again.";

/// Question put to the user before the history is cleared.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the chat history?";

const UNKNOWN_ERROR: &str = "Unknown error occurred";

// =============================================================================
// Outcomes
// =============================================================================

/// Result of the start-up health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Server healthy and assistant configured.
    Online,
    /// Server reachable but not reporting ready.
    NotConfigured,
    /// Server unreachable or answered garbage.
    ConnectionError,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Online => "AI Assistant Ready",
            HealthStatus::NotConfigured => "AI Assistant Not Configured",
            HealthStatus::ConnectionError => "Connection Error",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, HealthStatus::Online)
    }
}

/// What a chat request produced, ready to be rendered as an assistant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `{success: true, response}`.
    Answer(String),
    /// `{success: false, error}`; holds the server's error text.
    ServerError(String),
    /// Network failure or undecodable body.
    ConnectionFailed,
}

impl Reply {
    /// Text of the assistant message for this reply.
    pub fn text(&self) -> String {
        match self {
            Reply::Answer(text) => text.clone(),
            Reply::ServerError(error) => format!("Error: {}", error),
            Reply::ConnectionFailed => CONNECTION_FALLBACK.to_string(),
        }
    }

    /// Whether the reply carries the assistant's own words.
    pub fn is_answer(&self) -> bool {
        matches!(self, Reply::Answer(_))
    }
}

/// Blocking yes/no question asked before a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a clear request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The user said no; nothing was sent.
    Declined,
    /// History cleared; the client now uses a fresh session identifier.
    Cleared { previous: SessionId },
}

// =============================================================================
// SessionClient
// =============================================================================

/// Per-widget client for the chat server.
///
/// At most one chat request is outstanding at a time: `begin_send` refuses
/// while another send holds the in-flight flag, and the flag is released when
/// the returned `PendingSend` is dropped, whatever the outcome.
pub struct SessionClient<T> {
    transport: T,
    session_id: Mutex<SessionId>,
    busy: AtomicBool,
}

impl<T: ChatTransport> SessionClient<T> {
    /// Create a client with a freshly generated session identifier.
    pub fn new(transport: T) -> Self {
        Self::with_session_id(transport, SessionId::generate())
    }

    pub fn with_session_id(transport: T, session_id: SessionId) -> Self {
        tracing::debug!(session_id = %session_id, "Session client created");
        Self {
            transport,
            session_id: Mutex::new(session_id),
            busy: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current session identifier.
    pub fn session_id(&self) -> SessionId {
        self.lock_session().clone()
    }

    /// Whether a chat request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Ask the server whether the assistant is ready. Runs once, no retry.
    pub async fn health_check(&self) -> HealthStatus {
        match self.transport.health().await {
            Ok(report) if report.is_ready() => {
                tracing::info!("Assistant ready");
                HealthStatus::Online
            }
            Ok(report) => {
                tracing::warn!(
                    status = %report.status,
                    assistant_ready = report.assistant_ready,
                    "Assistant not configured"
                );
                HealthStatus::NotConfigured
            }
            Err(e) => {
                tracing::error!(error = %e, "Health check failed");
                HealthStatus::ConnectionError
            }
        }
    }

    /// Validate a message and claim the in-flight flag.
    ///
    /// Fails with `EmptyMessage` for empty or whitespace-only text and with
    /// `Busy` while another send is pending. Neither failure touches the
    /// network.
    pub fn begin_send(&self, message: &str) -> Result<PendingSend<'_, T>, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Send ignored: request already in flight");
            return Err(ChatError::Busy);
        }
        Ok(PendingSend {
            client: self,
            message: message.to_string(),
        })
    }

    /// Validate, send, and wait for the reply in one step.
    pub async fn send(&self, message: &str, game: &str) -> Result<Reply, ChatError> {
        let pending = self.begin_send(message)?;
        Ok(pending.dispatch(game).await)
    }

    /// Clear the server-side history after confirmation.
    ///
    /// The session identifier is replaced only when the server accepts the
    /// request; on failure the old identifier stays and the error is returned.
    pub async fn clear(&self, confirm: &dyn Confirm) -> Result<ClearOutcome, ChatError> {
        if !confirm.confirm(CLEAR_PROMPT) {
            tracing::debug!("Clear declined");
            return Ok(ClearOutcome::Declined);
        }

        let previous = self.session_id();
        let request = ClearRequest {
            session_id: previous.clone(),
        };

        match self.transport.clear(&request).await {
            Ok(()) => {
                let fresh = SessionId::generate();
                tracing::info!(previous = %previous, session_id = %fresh, "Chat history cleared");
                *self.lock_session() = fresh;
                Ok(ClearOutcome::Cleared { previous })
            }
            Err(e) => {
                tracing::error!(session_id = %previous, error = %e, "Failed to clear chat history");
                Err(e)
            }
        }
    }

    /// Stored exchanges for the current session.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ChatError> {
        let session_id = self.session_id();
        self.transport.history(&session_id).await
    }

    /// Usage numbers for the current session.
    pub async fn stats(&self) -> Result<SessionStats, ChatError> {
        let session_id = self.session_id();
        self.transport.stats(&session_id).await
    }

    fn lock_session(&self) -> MutexGuard<'_, SessionId> {
        self.session_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// PendingSend
// =============================================================================

/// A validated message holding the client's in-flight flag.
///
/// Dropping it, with or without dispatching, releases the flag.
pub struct PendingSend<'a, T: ChatTransport> {
    client: &'a SessionClient<T>,
    message: String,
}

impl<T: ChatTransport> PendingSend<'_, T> {
    /// Trimmed message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Post the message with the given game context and map the outcome.
    ///
    /// The in-flight flag stays held until `self` is dropped, so callers can
    /// finish rendering the reply first.
    pub async fn dispatch(&self, game: &str) -> Reply {
        let request = ChatRequest {
            message: self.message.clone(),
            game: game.to_string(),
            session_id: self.client.session_id(),
        };

        tracing::debug!(
            session_id = %request.session_id,
            game = %request.game,
            message_len = request.message.len(),
            "Sending chat message"
        );

        match self.client.transport.chat(&request).await {
            Ok(reply) if reply.success => {
                Reply::Answer(reply.response.unwrap_or_default())
            }
            Ok(reply) => {
                let error = reply.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                tracing::warn!(error = %error, "Server reported a chat failure");
                Reply::ServerError(error)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error sending message");
                Reply::ConnectionFailed
            }
        }
    }
}

impl<T: ChatTransport> Drop for PendingSend<'_, T> {
    fn drop(&mut self) {
        self.client.busy.store(false, Ordering::Release);
    }
}

// =============================================================================
// Tests
// =============================================================================
