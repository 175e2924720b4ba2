//! Error types for the chat widget.

use gamepal_core::error::GamepalError;

/// Errors from the chat client and voice bridge.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a request is already in flight")]
    Busy,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("voice capability unavailable")]
    VoiceUnavailable,
    #[error("voice error: {0}")]
    Voice(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<GamepalError> for ChatError {
    fn from(err: GamepalError) -> Self {
        match err {
            GamepalError::Config(msg) => ChatError::Config(msg),
            GamepalError::Serialization(msg) => ChatError::Decode(msg),
            other => ChatError::Transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ChatError::Status(status.as_u16())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(ChatError::Busy.to_string(), "a request is already in flight");
        assert_eq!(
            ChatError::Transport("refused".to_string()).to_string(),
            "transport error: refused"
        );
        assert_eq!(
            ChatError::Decode("expected value".to_string()).to_string(),
            "decode error: expected value"
        );
        assert_eq!(ChatError::Status(503).to_string(), "server returned status 503");
        assert_eq!(
            ChatError::VoiceUnavailable.to_string(),
            "voice capability unavailable"
        );
        assert_eq!(
            ChatError::Voice("not-allowed".to_string()).to_string(),
            "voice error: not-allowed"
        );
    }

    #[test]
    fn test_chat_error_from_gamepal_error() {
        let err: ChatError = GamepalError::Config("bad url".to_string()).into();
        assert!(matches!(err, ChatError::Config(_)));

        let err: ChatError = GamepalError::Serialization("eof".to_string()).into();
        assert!(matches!(err, ChatError::Decode(_)));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: ChatError = GamepalError::Io(io).into();
        assert!(matches!(err, ChatError::Transport(_)));
        assert!(err.to_string().contains("reset"));
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ChatError::Busy);
        assert!(dbg.contains("Busy"));
    }
}
