//! Voice bridge between optional speech capabilities and the chat flow.
//!
//! Speech recognition and synthesis are injected as trait objects and may be
//! absent. Absence is decided once, at construction, and disables the
//! matching control for the lifetime of the bridge. Listening follows a small
//! state machine:
//! - Idle -> Listening (toggle on, recognizer started)
//! - Listening -> Idle (toggle off, Escape, end of input, error, transcript)
//!
//! Speech output is an independent on/off flag.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ChatError;

/// Recognition error codes that end listening without telling the user.
const SILENT_ERRORS: &[&str] = &["no-speech", "aborted"];

/// Decorative symbols never handed to the synthesizer.
static DECORATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[🎮🎯💡⚡🔥❌⏳⏱👋🎤✅⚠🚀⭐✨🏆👍😊🙂\u{FE0F}\u{200D}]")
        .expect("Invalid decoration regex")
});

// =============================================================================
// Capabilities
// =============================================================================

/// Speech-to-text capability.
pub trait SpeechRecognizer: Send {
    /// Begin capturing speech. Results arrive later as `RecognitionEvent`s.
    fn start(&mut self) -> Result<(), ChatError>;
    /// Stop capturing; an `End` event may still follow.
    fn stop(&mut self);
}

/// Text-to-speech capability.
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, text: &str);
    fn cancel(&mut self);
    fn is_speaking(&self) -> bool;
}

/// Callback delivered by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Final transcript of what was said.
    Transcript(String),
    /// Capability error code (`no-speech`, `aborted`, `network`, ...).
    Error(String),
    /// Recognizer stopped on its own.
    End,
}

/// What the widget should do after the bridge handled an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEffect {
    None,
    /// Put the transcript in the input and send it.
    Send(String),
    /// Show a one-line notice in the transcript.
    Notice(String),
}

// =============================================================================
// ListenState
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenState {
    Idle,
    Listening,
}

impl fmt::Display for ListenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenState::Idle => write!(f, "Idle"),
            ListenState::Listening => write!(f, "Listening"),
        }
    }
}

impl ListenState {
    pub fn can_transition_to(&self, target: &ListenState) -> bool {
        matches!(
            (self, target),
            (ListenState::Idle, ListenState::Listening) | (ListenState::Listening, ListenState::Idle)
        )
    }
}

// =============================================================================
// VoiceBridge
// =============================================================================

pub struct VoiceBridge {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    listen: ListenState,
    speak_replies: bool,
}

impl fmt::Debug for VoiceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceBridge")
            .field("has_recognizer", &self.recognizer.is_some())
            .field("has_synthesizer", &self.synthesizer.is_some())
            .field("listen", &self.listen)
            .field("speak_replies", &self.speak_replies)
            .finish()
    }
}

impl VoiceBridge {
    pub fn new(
        recognizer: Option<Box<dyn SpeechRecognizer>>,
        synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    ) -> Self {
        if recognizer.is_none() {
            tracing::info!("Speech recognition not supported; voice input disabled");
        }
        if synthesizer.is_none() {
            tracing::info!("Speech synthesis not supported; replies will not be read aloud");
        }
        Self {
            recognizer,
            synthesizer,
            listen: ListenState::Idle,
            speak_replies: false,
        }
    }

    /// Bridge with neither capability.
    pub fn unsupported() -> Self {
        Self::new(None, None)
    }

    /// Start with speech output on (ignored without a synthesizer).
    pub fn with_speak_replies(mut self, enabled: bool) -> Self {
        self.speak_replies = enabled && self.synthesizer.is_some();
        self
    }

    pub fn input_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn output_supported(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn listen_state(&self) -> ListenState {
        self.listen
    }

    pub fn is_listening(&self) -> bool {
        self.listen == ListenState::Listening
    }

    pub fn speaks_replies(&self) -> bool {
        self.speak_replies
    }

    /// Start listening when idle, stop when listening.
    ///
    /// Fails with `VoiceUnavailable` without a recognizer, and passes through
    /// a recognizer start failure (staying idle).
    pub fn toggle_listening(&mut self) -> Result<ListenState, ChatError> {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return Err(ChatError::VoiceUnavailable);
        };

        match self.listen {
            ListenState::Idle => {
                recognizer.start()?;
                self.transition(ListenState::Listening);
            }
            ListenState::Listening => {
                recognizer.stop();
                self.transition(ListenState::Idle);
            }
        }
        Ok(self.listen)
    }

    /// Stop listening if active. Returns whether anything was stopped.
    pub fn stop_listening(&mut self) -> bool {
        if !self.is_listening() {
            return false;
        }
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop();
        }
        self.transition(ListenState::Idle);
        true
    }

    /// Handle a recognizer callback. Every event ends listening.
    pub fn handle_recognition(&mut self, event: RecognitionEvent) -> VoiceEffect {
        self.transition(ListenState::Idle);
        match event {
            RecognitionEvent::Transcript(text) => {
                let text = text.trim();
                if text.is_empty() {
                    VoiceEffect::None
                } else {
                    tracing::debug!(text_len = text.len(), "Speech transcribed");
                    VoiceEffect::Send(text.to_string())
                }
            }
            RecognitionEvent::Error(code) => {
                tracing::warn!(code = %code, "Speech recognition error");
                if SILENT_ERRORS.contains(&code.as_str()) {
                    VoiceEffect::None
                } else {
                    VoiceEffect::Notice(format!("Voice input error: {}", code))
                }
            }
            RecognitionEvent::End => VoiceEffect::None,
        }
    }

    /// Flip speech output. Turning it off silences any active utterance.
    ///
    /// Returns the new setting; always `false` without a synthesizer.
    pub fn toggle_speech_output(&mut self) -> bool {
        let Some(synthesizer) = self.synthesizer.as_mut() else {
            return false;
        };
        self.speak_replies = !self.speak_replies;
        if !self.speak_replies && synthesizer.is_speaking() {
            synthesizer.cancel();
        }
        tracing::debug!(enabled = self.speak_replies, "Speech output toggled");
        self.speak_replies
    }

    /// Read a reply aloud when speech output is on.
    ///
    /// Any utterance still playing is cancelled first. Returns whether the
    /// synthesizer was asked to speak.
    pub fn speak_reply(&mut self, text: &str) -> bool {
        if !self.speak_replies {
            return false;
        }
        let Some(synthesizer) = self.synthesizer.as_mut() else {
            return false;
        };
        if synthesizer.is_speaking() {
            synthesizer.cancel();
        }
        let spoken = strip_decorations(text);
        if spoken.is_empty() {
            return false;
        }
        synthesizer.speak(&spoken);
        true
    }

    fn transition(&mut self, target: ListenState) {
        if self.listen.can_transition_to(&target) {
            tracing::debug!("Listen state: {} -> {}", self.listen, target);
            self.listen = target;
        }
    }
}

/// Remove decorative symbols and collapse the leftover whitespace.
pub fn strip_decorations(text: &str) -> String {
    let stripped = DECORATIONS.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// Tests
// =============================================================================
