use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GamepalError, Result};

/// Game context tag used when no specific game is selected.
pub const GENERAL_GAME: &str = "general";

/// Top-level configuration for the Gamepal client.
///
/// Loaded from `~/.gamepal/config.toml` by default. Every section falls back
/// to its defaults when missing from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GamepalConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl GamepalConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GamepalConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GamepalError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Chat server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL the `/api/*` paths are resolved against.
    pub base_url: String,
    /// Per-request timeout in seconds. Zero disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Which of the two widget front ends to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetVariant {
    /// Text chat with a user-selected game context.
    #[default]
    GameSelect,
    /// Text and voice chat with the fixed `general` context.
    Voice,
}

/// Chat widget presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub variant: WidgetVariant,
    /// Game context selected at start-up (game-select variant only).
    pub default_game: String,
    /// Games offered for selection in addition to `general`.
    pub games: Vec<String>,
    pub welcome_title: String,
    pub welcome_text: String,
    /// Welcome block shown after the history has been cleared.
    pub cleared_title: String,
    pub cleared_text: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            variant: WidgetVariant::GameSelect,
            default_game: GENERAL_GAME.to_string(),
            games: default_games(),
            welcome_title: "🎮 Welcome to your AI Gaming Assistant!".to_string(),
            welcome_text: "Ask me about strategies, mechanics, builds, or troubleshooting."
                .to_string(),
            cleared_title: "👋 Welcome back!".to_string(),
            cleared_text: "Chat history cleared. Ready for new questions!".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Whether `game` is `general` or one of the configured games
    /// (case-insensitive).
    pub fn is_known_game(&self, game: &str) -> bool {
        game.eq_ignore_ascii_case(GENERAL_GAME)
            || self.games.iter().any(|g| g.eq_ignore_ascii_case(game))
    }
}

/// Speech capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP-47 language tag handed to the recognizer and synthesizer.
    pub language: String,
    /// Read assistant replies aloud from start-up.
    pub speak_replies: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            speak_replies: false,
        }
    }
}

fn default_games() -> Vec<String> {
    [
        "Minecraft",
        "League of Legends",
        "Valorant",
        "Counter-Strike",
        "Dota 2",
        "Fortnite",
        "Apex Legends",
        "Overwatch",
        "Hearthstone",
        "World of Warcraft",
        "Elden Ring",
        "Dark Souls",
        "The Witcher 3",
        "Cyberpunk 2077",
        "GTA V",
        "Red Dead Redemption 2",
        "Baldur's Gate 3",
        "Starcraft 2",
        "Civilization VI",
        "FIFA/FC",
        "NBA 2K",
        "Rocket League",
        "Among Us",
        "Fall Guys",
        "Roblox",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GamepalConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.server.request_timeout_secs, 60);
        assert_eq!(config.widget.variant, WidgetVariant::GameSelect);
        assert_eq!(config.widget.default_game, GENERAL_GAME);
        assert_eq!(config.widget.games.len(), 25);
        assert_eq!(config.voice.language, "en-US");
        assert!(!config.voice.speak_replies);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
base_url = "http://game-box:8080"
request_timeout_secs = 5

[widget]
variant = "voice"
"#
        )
        .unwrap();

        let config = GamepalConfig::load(file.path()).unwrap();
        assert_eq!(config.server.base_url, "http://game-box:8080");
        assert_eq!(config.server.request_timeout_secs, 5);
        assert_eq!(config.widget.variant, WidgetVariant::Voice);
        // Unset fields keep their defaults.
        assert_eq!(config.widget.default_game, GENERAL_GAME);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not [[ toml").unwrap();
        let result = GamepalConfig::load(file.path());
        assert!(matches!(result, Err(GamepalError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = GamepalConfig::load_or_default(Path::new("/nonexistent/gamepal.toml"));
        assert_eq!(config.server.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = GamepalConfig::default();
        config.voice.speak_replies = true;
        config.widget.games = vec!["Tetris".to_string()];
        config.save(&path).unwrap();

        let loaded = GamepalConfig::load(&path).unwrap();
        assert!(loaded.voice.speak_replies);
        assert_eq!(loaded.widget.games, vec!["Tetris"]);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: GamepalConfig = toml::from_str("").unwrap();
        assert_eq!(config.widget.cleared_title, "👋 Welcome back!");
        assert_eq!(config.server.request_timeout_secs, 60);
    }

    #[test]
    fn test_is_known_game() {
        let widget = WidgetConfig::default();
        assert!(widget.is_known_game("general"));
        assert!(widget.is_known_game("GENERAL"));
        assert!(widget.is_known_game("elden ring"));
        assert!(!widget.is_known_game("Pong"));
    }
}
