//! Wire types for the chat server API and the session identifier.

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the random base-36 suffix of a session identifier.
const SESSION_SUFFIX_LEN: usize = 9;

// =============================================================================
// Session identifier
// =============================================================================

/// Opaque client-generated token correlating chat turns on the server.
///
/// Formatted as `session_<unix-millis>_<base36 suffix>`. Uniqueness is
/// best-effort (time plus randomness), not cryptographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier from the current time and thread RNG.
    pub fn generate() -> Self {
        Self::generate_with(Utc::now().timestamp_millis(), &mut rand::rng())
    }

    /// Generate an identifier from an explicit timestamp and RNG.
    pub fn generate_with<R: Rng + ?Sized>(timestamp_millis: i64, rng: &mut R) -> Self {
        let suffix: String = (0..SESSION_SUFFIX_LEN)
            .map(|_| {
                let digit = rng.random_range(0..36u32);
                std::char::from_digit(digit, 36).unwrap_or('0')
            })
            .collect();
        Self(format!("session_{}_{}", timestamp_millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// Roles
// =============================================================================

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub game: String,
    pub session_id: SessionId,
}

/// Body of `POST /api/clear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearRequest {
    pub session_id: SessionId,
}

// =============================================================================
// Responses
// =============================================================================

/// Body of a `/api/chat` response, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatReply {
    pub fn answer(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Body of a `/api/health` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assistant_ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HealthReport {
    /// `true` when the server is healthy and its assistant is configured.
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.assistant_ready
    }
}

/// One stored exchange from `/api/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    pub assistant: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default = "default_game")]
    pub game: String,
}

/// Body of a `/api/history` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub success: bool,
}

/// Per-session usage numbers from `/api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    #[serde(default)]
    pub total_messages: usize,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub games_discussed: Vec<String>,
}

/// Body of a `/api/stats` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub stats: SessionStats,
    #[serde(default)]
    pub success: bool,
}

fn default_game() -> String {
    crate::config::GENERAL_GAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_session_id_format() {
        let id = SessionId::generate_with(1_700_000_000_000, &mut StdRng::seed_from_u64(7));
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1], "1700000000000");
        assert_eq!(parts[2].len(), SESSION_SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_session_ids_differ() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_id_serializes_as_plain_string() {
        let id = SessionId::from("session_1_abc".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"session_1_abc\"");
        assert_eq!(id.to_string(), "session_1_abc");
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let req = ChatRequest {
            message: "best build?".to_string(),
            game: "Elden Ring".to_string(),
            session_id: SessionId::from("session_1_x".to_string()),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message": "best build?",
                "game": "Elden Ring",
                "session_id": "session_1_x"
            })
        );
    }

    #[test]
    fn test_chat_reply_parses_both_shapes() {
        let ok: ChatReply =
            serde_json::from_str(r#"{"success": true, "response": "Go left", "timestamp": "t"}"#)
                .unwrap();
        assert!(ok.success);
        assert_eq!(ok.response.as_deref(), Some("Go left"));

        let err: ChatReply =
            serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("boom"));

        // Server's 400 body carries no success flag at all.
        let bare: ChatReply =
            serde_json::from_str(r#"{"error": "Message cannot be empty"}"#).unwrap();
        assert!(!bare.success);
    }

    #[test]
    fn test_health_report_readiness() {
        let ready: HealthReport =
            serde_json::from_str(r#"{"status": "healthy", "assistant_ready": true}"#).unwrap();
        assert!(ready.is_ready());

        let unconfigured: HealthReport =
            serde_json::from_str(r#"{"status": "healthy", "assistant_ready": false}"#).unwrap();
        assert!(!unconfigured.is_ready());

        let odd: HealthReport = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!odd.is_ready());
    }

    #[test]
    fn test_history_entry_defaults_game() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"user": "hi", "assistant": "hello"}"#).unwrap();
        assert_eq!(entry.game, "general");
        assert!(entry.timestamp.is_empty());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
