//! Chat widget components for Gamepal.
//!
//! Provides the session client that talks to the chat server, the transcript
//! that renders messages, the optional voice bridge over injected speech
//! capabilities, and the widget controller that wires them together.

pub mod error;
pub mod keys;
pub mod session;
pub mod tips;
pub mod transcript;
pub mod transport;
pub mod voice;
pub mod widget;

#[cfg(test)]
mod test_support;

pub use error::ChatError;
pub use keys::{Key, KeyAction, KeyPress};
pub use session::{
    ClearOutcome, Confirm, HealthStatus, PendingSend, Reply, SessionClient, CLEAR_PROMPT,
    CONNECTION_FALLBACK,
};
pub use transcript::{Element, ElementId, ElementKind, RenderSink, Transcript};
pub use transport::{ChatTransport, HttpTransport};
pub use voice::{
    ListenState, RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, VoiceBridge, VoiceEffect,
};
pub use widget::{ChatWidget, SubmitOutcome};
