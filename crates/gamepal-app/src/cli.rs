//! CLI argument definitions for the Gamepal terminal client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Gamepal: chat with an AI gaming assistant from the terminal.
#[derive(Parser, Debug, Default)]
#[command(name = "gamepal", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the chat server.
    #[arg(short = 's', long = "server")]
    pub server: Option<String>,

    /// Game context to start with.
    #[arg(short = 'g', long = "game")]
    pub game: Option<String>,

    /// Run the voice variant (fixed "general" context).
    #[arg(long = "voice")]
    pub voice: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > GAMEPAL_CONFIG env var > ~/.gamepal/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("GAMEPAL_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the chat server base URL.
    ///
    /// Priority: --server flag > GAMEPAL_SERVER env var > config file value.
    pub fn resolve_server(&self, config_url: &str) -> String {
        pick(
            self.server.as_deref(),
            std::env::var("GAMEPAL_SERVER").ok().as_deref(),
            config_url,
        )
    }

    /// Resolve the log level used when RUST_LOG is unset.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        pick(self.log_level.as_deref(), None, config_level)
    }
}

/// First non-blank value of flag, env, fallback.
fn pick(flag: Option<&str>, env: Option<&str>, fallback: &str) -> String {
    [flag, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".gamepal").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".gamepal").join("config.toml");
    }
    PathBuf::from("config.toml")
}
