//! Test doubles for the transport and speech capabilities.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gamepal_core::types::{
    ChatReply, ChatRequest, ClearRequest, HealthReport, HistoryEntry, SessionId, SessionStats,
};
use tokio::sync::Notify;

use crate::error::ChatError;
use crate::transport::ChatTransport;
use crate::voice::{SpeechRecognizer, SpeechSynthesizer};

/// What the scripted transport answers to `/api/chat`.
#[derive(Debug, Clone)]
pub(crate) enum ChatScript {
    Reply(ChatReply),
    ConnectionRefused,
    Undecodable,
}

/// In-memory `ChatTransport` that records requests and replays a script.
pub(crate) struct ScriptedTransport {
    chat: Mutex<ChatScript>,
    health: Mutex<Option<HealthReport>>,
    clear_ok: AtomicBool,
    gate: Option<Arc<Notify>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub clear_requests: Mutex<Vec<ClearRequest>>,
}

impl ScriptedTransport {
    pub fn replying(text: &str) -> Self {
        Self::with_chat(ChatScript::Reply(ChatReply::answer(text)))
    }

    pub fn with_chat(script: ChatScript) -> Self {
        Self {
            chat: Mutex::new(script),
            health: Mutex::new(Some(HealthReport {
                status: "healthy".to_string(),
                assistant_ready: true,
                timestamp: None,
            })),
            clear_ok: AtomicBool::new(true),
            gate: None,
            chat_requests: Mutex::new(Vec::new()),
            clear_requests: Mutex::new(Vec::new()),
        }
    }

    /// Hold every chat reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_health(&self, report: Option<HealthReport>) {
        *self.health.lock().unwrap() = report;
    }

    pub fn set_clear_ok(&self, ok: bool) {
        self.clear_ok.store(ok, Ordering::SeqCst);
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_requests.lock().unwrap().len()
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn health(&self) -> Result<HealthReport, ChatError> {
        self.health
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ChatError::Transport("connection refused".to_string()))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let script = self.chat.lock().unwrap().clone();
        match script {
            ChatScript::Reply(reply) => Ok(reply),
            ChatScript::ConnectionRefused => {
                Err(ChatError::Transport("connection refused".to_string()))
            }
            ChatScript::Undecodable => Err(ChatError::Decode("expected value".to_string())),
        }
    }

    async fn clear(&self, request: &ClearRequest) -> Result<(), ChatError> {
        self.clear_requests.lock().unwrap().push(request.clone());
        if self.clear_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ChatError::Status(500))
        }
    }

    async fn history(&self, _session_id: &SessionId) -> Result<Vec<HistoryEntry>, ChatError> {
        Ok(vec![HistoryEntry {
            user: "hi".to_string(),
            assistant: "hello".to_string(),
            timestamp: "2026-01-01T00:00:00".to_string(),
            game: "general".to_string(),
        }])
    }

    async fn stats(&self, session_id: &SessionId) -> Result<SessionStats, ChatError> {
        Ok(SessionStats {
            total_messages: self.chat_calls(),
            session_id: session_id.to_string(),
            games_discussed: vec!["general".to_string()],
        })
    }
}

/// Call log shared between a fake capability and the test body.
#[derive(Debug, Default)]
pub(crate) struct CapabilityLog {
    pub starts: usize,
    pub stops: usize,
    pub spoken: Vec<String>,
    pub cancels: usize,
    pub speaking: bool,
    pub fail_start: bool,
}

pub(crate) type SharedLog = Arc<Mutex<CapabilityLog>>;

pub(crate) struct FakeRecognizer(pub SharedLog);

impl SpeechRecognizer for FakeRecognizer {
    fn start(&mut self) -> Result<(), ChatError> {
        let mut log = self.0.lock().unwrap();
        if log.fail_start {
            return Err(ChatError::Voice("not-allowed".to_string()));
        }
        log.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.0.lock().unwrap().stops += 1;
    }
}

pub(crate) struct FakeSynthesizer(pub SharedLog);

impl SpeechSynthesizer for FakeSynthesizer {
    fn speak(&mut self, text: &str) {
        let mut log = self.0.lock().unwrap();
        log.spoken.push(text.to_string());
        log.speaking = true;
    }

    fn cancel(&mut self) {
        let mut log = self.0.lock().unwrap();
        log.cancels += 1;
        log.speaking = false;
    }

    fn is_speaking(&self) -> bool {
        self.0.lock().unwrap().speaking
    }
}
