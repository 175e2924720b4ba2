//! Chat widget controller.
//!
//! `ChatWidget` is the per-mount object that wires the session client, the
//! transcript, the status indicator, the selected game and, in the voice
//! variant, the voice bridge. Front ends call its methods from their event
//! handlers; nothing here is global.

use std::sync::{Mutex, MutexGuard, PoisonError};

use gamepal_core::config::{WidgetConfig, WidgetVariant, GENERAL_GAME};
use gamepal_core::types::Role;

use crate::error::ChatError;
use crate::keys::{KeyAction, KeyPress};
use crate::session::{ClearOutcome, Confirm, HealthStatus, Reply, SessionClient};
use crate::transcript::{RenderSink, Transcript};
use crate::transport::ChatTransport;
use crate::voice::{ListenState, RecognitionEvent, VoiceBridge, VoiceEffect};

/// What happened to a submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Empty,
    /// Another request is in flight; nothing happened.
    Busy,
    /// The message was sent and the reply rendered.
    Replied(Reply),
    /// The message was sent but the transcript was reset before the reply
    /// arrived, so the reply was dropped.
    Discarded(Reply),
}

pub struct ChatWidget<T> {
    client: SessionClient<T>,
    config: WidgetConfig,
    transcript: Mutex<Transcript>,
    voice: Option<Mutex<VoiceBridge>>,
    game: Mutex<String>,
    status: Mutex<Option<HealthStatus>>,
}

impl<T: ChatTransport> ChatWidget<T> {
    pub fn new(client: SessionClient<T>, config: WidgetConfig) -> Self {
        let transcript = Transcript::new(&config.welcome_title, &config.welcome_text);
        let game = if config.is_known_game(&config.default_game) {
            config.default_game.clone()
        } else {
            tracing::warn!(game = %config.default_game, "Unknown default game, using general");
            GENERAL_GAME.to_string()
        };
        Self {
            client,
            config,
            transcript: Mutex::new(transcript),
            voice: None,
            game: Mutex::new(game),
            status: Mutex::new(None),
        }
    }

    /// Attach the voice bridge (voice variant only).
    pub fn with_voice(mut self, bridge: VoiceBridge) -> Self {
        if self.config.variant == WidgetVariant::Voice {
            self.voice = Some(Mutex::new(bridge));
        } else {
            tracing::warn!("Voice bridge ignored: widget is not the voice variant");
        }
        self
    }

    /// Mirror transcript changes to `sink`.
    pub fn with_sink(self, sink: Box<dyn RenderSink>) -> Self {
        let Self {
            client,
            config,
            transcript,
            voice,
            game,
            status,
        } = self;
        let transcript = transcript
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .with_sink(sink);
        Self {
            client,
            config,
            transcript: Mutex::new(transcript),
            voice,
            game,
            status,
        }
    }

    pub fn client(&self) -> &SessionClient<T> {
        &self.client
    }

    pub fn variant(&self) -> WidgetVariant {
        self.config.variant
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Result of the last health check, if one ran.
    pub fn status(&self) -> Option<HealthStatus> {
        *lock(&self.status)
    }

    /// Game context tag sent with chat requests.
    pub fn game(&self) -> String {
        match self.config.variant {
            WidgetVariant::GameSelect => lock(&self.game).clone(),
            WidgetVariant::Voice => GENERAL_GAME.to_string(),
        }
    }

    /// Run `f` against the transcript.
    pub fn with_transcript<R>(&self, f: impl FnOnce(&Transcript) -> R) -> R {
        f(&lock(&self.transcript))
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        !self.client.is_busy()
    }

    /// Run the start-up health check and record the status.
    pub async fn start(&self) -> HealthStatus {
        let status = self.client.health_check().await;
        *lock(&self.status) = Some(status);
        status
    }

    /// Pick the game context (game-select variant only).
    ///
    /// Matching is case-insensitive; the configured spelling is kept.
    pub fn select_game(&self, name: &str) -> Result<String, ChatError> {
        if self.config.variant != WidgetVariant::GameSelect {
            return Err(ChatError::Config(
                "game selection is not available in voice mode".to_string(),
            ));
        }
        let name = name.trim();
        let selected = if name.eq_ignore_ascii_case(GENERAL_GAME) {
            GENERAL_GAME.to_string()
        } else {
            self.config
                .games
                .iter()
                .find(|g| g.eq_ignore_ascii_case(name))
                .cloned()
                .ok_or_else(|| ChatError::Config(format!("unknown game: {}", name)))?
        };
        tracing::info!(game = %selected, "Game context selected");
        *lock(&self.game) = selected.clone();
        Ok(selected)
    }

    /// Send the input as a user message and render the reply.
    ///
    /// The user message and a loading placeholder are shown before the
    /// request goes out. The reply replaces the placeholder only if the
    /// placeholder is still there when it arrives.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let pending = match self.client.begin_send(input) {
            Ok(pending) => pending,
            Err(ChatError::EmptyMessage) => return SubmitOutcome::Empty,
            Err(_) => return SubmitOutcome::Busy,
        };

        let loading = {
            let mut transcript = lock(&self.transcript);
            transcript.append(Role::User, pending.message());
            transcript.append_loading()
        };

        let game = self.game();
        let reply = pending.dispatch(&game).await;
        let text = reply.text();

        let rendered = {
            let mut transcript = lock(&self.transcript);
            if transcript.remove(loading) {
                transcript.append(Role::Assistant, &text);
                true
            } else {
                tracing::debug!("Loading placeholder gone; dropping late reply");
                false
            }
        };
        drop(pending);

        if !rendered {
            return SubmitOutcome::Discarded(reply);
        }
        if let Some(voice) = &self.voice {
            lock(voice).speak_reply(&text);
        }
        SubmitOutcome::Replied(reply)
    }

    /// Clear the history after confirmation and show the "welcome back" block.
    ///
    /// On failure the transcript and session are left as they were.
    pub async fn clear(&self, confirm: &dyn Confirm) -> Result<ClearOutcome, ChatError> {
        let outcome = self.client.clear(confirm).await?;
        if let ClearOutcome::Cleared { .. } = outcome {
            lock(&self.transcript).reset(&self.config.cleared_title, &self.config.cleared_text);
        }
        Ok(outcome)
    }

    /// Whether the voice input control is usable.
    pub fn voice_input_supported(&self) -> bool {
        self.voice
            .as_ref()
            .is_some_and(|v| lock(v).input_supported())
    }

    /// Whether the speech output control is usable.
    pub fn voice_output_supported(&self) -> bool {
        self.voice
            .as_ref()
            .is_some_and(|v| lock(v).output_supported())
    }

    pub fn is_listening(&self) -> bool {
        self.voice.as_ref().is_some_and(|v| lock(v).is_listening())
    }

    pub fn speaks_replies(&self) -> bool {
        self.voice.as_ref().is_some_and(|v| lock(v).speaks_replies())
    }

    /// Voice button.
    pub fn toggle_listening(&self) -> Result<ListenState, ChatError> {
        let voice = self.voice.as_ref().ok_or(ChatError::VoiceUnavailable)?;
        lock(voice).toggle_listening()
    }

    /// Escape key. Returns whether listening was active.
    pub fn stop_listening(&self) -> bool {
        self.voice.as_ref().is_some_and(|v| lock(v).stop_listening())
    }

    /// Speaker button. Returns the new setting.
    pub fn toggle_speech_output(&self) -> bool {
        self.voice
            .as_ref()
            .is_some_and(|v| lock(v).toggle_speech_output())
    }

    /// Feed a recognizer callback through the bridge and act on the result.
    ///
    /// Returns the submit outcome when the event produced a transcript.
    pub async fn handle_recognition(&self, event: RecognitionEvent) -> Option<SubmitOutcome> {
        let voice = self.voice.as_ref()?;
        let effect = lock(voice).handle_recognition(event);
        match effect {
            VoiceEffect::Send(text) => Some(self.submit(&text).await),
            VoiceEffect::Notice(text) => {
                lock(&self.transcript).notice(&text);
                None
            }
            VoiceEffect::None => None,
        }
    }

    /// Act on a keyboard shortcut and return the action taken.
    ///
    /// `input` is the current text box content, used for `Send`.
    /// `FocusInput` and `InsertNewline` are left to the front end.
    pub async fn handle_key(
        &self,
        press: KeyPress,
        input: &str,
        confirm: &dyn Confirm,
    ) -> Result<KeyAction, ChatError> {
        let action = KeyAction::for_key(press, self.config.variant);
        match action {
            KeyAction::Send => {
                self.submit(input).await;
            }
            KeyAction::ClearChat => {
                self.clear(confirm).await?;
            }
            KeyAction::StopListening => {
                self.stop_listening();
            }
            KeyAction::FocusInput | KeyAction::InsertNewline | KeyAction::Ignore => {}
        }
        Ok(action)
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Tests
// =============================================================================
